//! The fixed financial-advice knowledge base.
//!
//! The corpus is a compiled-in constant: [`KnowledgeBase::builtin`] returns
//! the same documents on every call, so re-initialization is idempotent.
//! Runtime insertion and removal are deliberately absent, but nothing here
//! assumes the built-in corpus — [`KnowledgeBase::from_documents`] accepts
//! any document list.

use crate::document::KnowledgeDocument;

/// Category label of the fallback document used for unknown categories.
pub const GENERAL_CATEGORY: &str = "General";

/// Sentinel returned when neither the requested category nor the General
/// fallback exists in the corpus.
pub const NO_ADVICE: &str = "No specific advice available for this category.";

/// The canonical list of advice documents with category-keyed lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBase {
    documents: Vec<KnowledgeDocument>,
}

impl KnowledgeBase {
    /// The built-in financial-advice corpus.
    ///
    /// Deterministic: every call produces the same documents in the same
    /// order.
    pub fn builtin() -> Self {
        Self::from_documents(vec![
            KnowledgeDocument::new(
                "Food",
                "To reduce food expenses, consider meal planning, cooking at home more often, \
                 buying in bulk, using grocery lists, and avoiding impulse purchases. \
                 Track food waste and plan meals around sales and seasonal produce.",
            ),
            KnowledgeDocument::new(
                "Transport",
                "Save on transport by carpooling, using public transportation, combining trips, \
                 maintaining your vehicle properly, and considering fuel-efficient routes. \
                 Walk or bike for short distances when possible.",
            ),
            KnowledgeDocument::new(
                "Bills",
                "Optimize bills by reviewing subscriptions, negotiating rates, switching providers, \
                 using energy-efficient appliances, and setting up automatic payments to avoid late fees. \
                 Consider bundling services for discounts.",
            ),
            KnowledgeDocument::new(
                "Shopping",
                "Reduce shopping expenses by creating a budget, waiting 24 hours before non-essential purchases, \
                 using coupons and cashback apps, buying quality items that last longer, \
                 and distinguishing between wants and needs.",
            ),
            KnowledgeDocument::new(
                "General",
                "Build an emergency fund with 3-6 months of expenses, follow the 50/30/20 rule \
                 (50% needs, 30% wants, 20% savings), track all expenses, and review spending monthly. \
                 Set specific financial goals and automate savings.",
            ),
            KnowledgeDocument::new(
                "Savings",
                "Maximize savings by automating transfers to savings accounts, taking advantage of \
                 employer matching for retirement accounts, reducing high-interest debt first, \
                 and using high-yield savings accounts. Start small if needed but be consistent.",
            ),
            KnowledgeDocument::new(
                "Budget",
                "Create an effective budget by tracking income and expenses, categorizing spending, \
                 identifying areas to cut back, and reviewing regularly. Use budgeting apps or \
                 spreadsheets to monitor progress and adjust as needed.",
            ),
        ])
    }

    /// Create a knowledge base from an arbitrary document list.
    pub fn from_documents(documents: Vec<KnowledgeDocument>) -> Self {
        Self { documents }
    }

    /// All documents, in corpus order.
    pub fn documents(&self) -> &[KnowledgeDocument] {
        &self.documents
    }

    /// Number of documents in the corpus.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Advice for a spending category.
    ///
    /// Matching is case-insensitive exact equality — no partial or fuzzy
    /// matching. Unknown categories fall back to the [`GENERAL_CATEGORY`]
    /// document; if that is also absent, the [`NO_ADVICE`] sentinel is
    /// returned.
    pub fn advice_for_category(&self, category: &str) -> &str {
        self.documents
            .iter()
            .find(|doc| doc.category.eq_ignore_ascii_case(category))
            .or_else(|| self.documents.iter().find(|doc| doc.category == GENERAL_CATEGORY))
            .map(|doc| doc.content.as_str())
            .unwrap_or(NO_ADVICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_deterministic() {
        assert_eq!(KnowledgeBase::builtin(), KnowledgeBase::builtin());
        assert_eq!(KnowledgeBase::builtin().len(), 7);
    }

    #[test]
    fn category_lookup_is_case_insensitive() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.advice_for_category("food"), kb.advice_for_category("Food"));
        assert_eq!(kb.advice_for_category("TRANSPORT"), kb.advice_for_category("Transport"));
    }

    #[test]
    fn unknown_category_falls_back_to_general() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.advice_for_category("Unknown"), kb.advice_for_category("General"));
    }

    #[test]
    fn missing_general_falls_back_to_sentinel() {
        let kb = KnowledgeBase::from_documents(vec![KnowledgeDocument::new(
            "Food",
            "Cook at home.",
        )]);
        assert_eq!(kb.advice_for_category("Travel"), NO_ADVICE);
    }

    #[test]
    fn no_partial_matching() {
        let kb = KnowledgeBase::builtin();
        // "Foo" is not "Food"; it must take the General fallback.
        assert_eq!(kb.advice_for_category("Foo"), kb.advice_for_category("General"));
    }
}
