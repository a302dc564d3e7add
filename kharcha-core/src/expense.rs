//! Expense record and history types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single user-entered expense entry.
///
/// Records arrive from the surrounding input layer, which is responsible
/// for validating them; this crate only ever reads aggregates over
/// collections of records and never mutates one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRecord {
    /// Calendar date of the expense.
    pub date: NaiveDate,
    /// Spending category label (e.g. "Food", "Transport").
    pub category: String,
    /// Amount in PKR.
    pub amount: f64,
    /// Free-text description.
    pub description: String,
}

impl ExpenseRecord {
    /// Create a new expense record.
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        amount: f64,
        description: impl Into<String>,
    ) -> Self {
        Self { date, category: category.into(), amount, description: description.into() }
    }
}

/// An append-only sequence of [`ExpenseRecord`]s.
///
/// Entries are never rewritten or removed. A history is per-session state;
/// it must not be shared across sessions without synchronization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExpenseHistory {
    records: Vec<ExpenseRecord>,
}

impl ExpenseHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the history.
    pub fn push(&mut self, record: ExpenseRecord) {
        self.records.push(record);
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the history holds no entries.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, category: &str, amount: f64) -> ExpenseRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        ExpenseRecord::new(date, category, amount, "test entry")
    }

    #[test]
    fn history_preserves_insertion_order() {
        let mut history = ExpenseHistory::new();
        history.push(record(1, "Food", 100.0));
        history.push(record(2, "Transport", 50.0));
        history.push(record(3, "Food", 25.0));

        let categories: Vec<&str> =
            history.records().iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, ["Food", "Transport", "Food"]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn empty_history() {
        let history = ExpenseHistory::new();
        assert!(history.is_empty());
        assert!(history.records().is_empty());
    }
}
