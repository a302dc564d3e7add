//! Core expense domain types for Kharcha.
//!
//! This crate provides:
//! - [`ExpenseRecord`] — a single user-entered expense entry
//! - [`ExpenseHistory`] — an append-only sequence of entries
//! - [`ExpenseSummary`] — aggregate statistics over a set of entries
//! - [`build_context`] — the natural-language digest used as LLM context

mod expense;
mod summary;

pub use expense::{ExpenseHistory, ExpenseRecord};
pub use summary::{ExpenseSummary, NO_EXPENSE_DATA, build_context};
