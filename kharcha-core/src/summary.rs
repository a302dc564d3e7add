//! Aggregate expense statistics and the LLM context digest.

use std::collections::BTreeMap;
use std::fmt;

use crate::expense::ExpenseRecord;

/// Digest returned for an empty expense table.
pub const NO_EXPENSE_DATA: &str = "No expense data available.";

/// Aggregate statistics over a set of expense records.
///
/// Subtotals are keyed by category label; the `BTreeMap` keeps the
/// rendered order deterministic across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSummary {
    /// Sum of all amounts.
    pub total: f64,
    /// Mean amount.
    pub average: f64,
    /// Per-category subtotal, sorted by category label.
    pub by_category: BTreeMap<String, f64>,
}

impl ExpenseSummary {
    /// Compute a summary over `records`.
    ///
    /// Returns `None` for an empty table — there is no meaningful average.
    /// Amounts are summed as given, including negative ones; rejecting
    /// invalid input is the input layer's job.
    pub fn from_records(records: &[ExpenseRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let total: f64 = records.iter().map(|r| r.amount).sum();
        let average = total / records.len() as f64;

        let mut by_category = BTreeMap::new();
        for record in records {
            *by_category.entry(record.category.clone()).or_insert(0.0) += record.amount;
        }

        Some(Self { total, average, by_category })
    }
}

impl fmt::Display for ExpenseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total spending: {:.2} PKR. Average expense: {:.2} PKR. Spending by category: ",
            self.total, self.average
        )?;
        let mut first = true;
        for (category, amount) in &self.by_category {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{category}: {amount:.2} PKR")?;
            first = false;
        }
        Ok(())
    }
}

/// Render `records` as a compact natural-language digest for LLM context.
///
/// An empty table yields [`NO_EXPENSE_DATA`] rather than an error.
pub fn build_context(records: &[ExpenseRecord]) -> String {
    match ExpenseSummary::from_records(records) {
        Some(summary) => summary.to_string(),
        None => NO_EXPENSE_DATA.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(category: &str, amount: f64) -> ExpenseRecord {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        ExpenseRecord::new(date, category, amount, "test entry")
    }

    #[test]
    fn context_formats_totals_and_categories() {
        let records =
            [record("Food", 100.0), record("Food", 50.0), record("Transport", 25.0)];
        let context = build_context(&records);

        assert!(context.starts_with("Total spending: 175.00 PKR. Average expense: 58.33 PKR."));
        assert!(context.contains("Food: 150.00 PKR"));
        assert!(context.contains("Transport: 25.00 PKR"));
    }

    #[test]
    fn empty_table_yields_sentinel() {
        assert_eq!(build_context(&[]), NO_EXPENSE_DATA);
    }

    #[test]
    fn category_order_is_deterministic() {
        let records = [record("Shopping", 10.0), record("Bills", 20.0), record("Food", 30.0)];
        let context = build_context(&records);
        assert!(context.ends_with(
            "Spending by category: Bills: 20.00 PKR, Food: 30.00 PKR, Shopping: 10.00 PKR"
        ));
    }

    #[test]
    fn negative_amounts_are_summed_as_given() {
        let records = [record("Food", 100.0), record("Food", -40.0)];
        let summary = ExpenseSummary::from_records(&records).unwrap();
        assert_eq!(summary.total, 60.0);
        assert_eq!(summary.by_category["Food"], 60.0);
    }
}
