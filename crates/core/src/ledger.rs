//! Ledger row model and store abstraction.
//!
//! The ledger is the tabular record of every issued card, keyed by card
//! number. First and last name are separate columns; the combined
//! `"{FIRST} {LAST}"` display form is derived at read time, never stored,
//! so partial edits cannot corrupt one half of a name by re-splitting a
//! joined cell.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One ledger row. Names are stored upper-cased; dates serialize as
/// `YYYY-MM-DD`, a missing end date as the empty field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub card_number: String,
    pub first_name: String,
    pub last_name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl LedgerRow {
    /// Combined display name, derived on demand.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Field-by-field correction of an existing row. `None` leaves the stored
/// value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerEdit {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl LedgerEdit {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

/// Tabular ledger store keyed by card number.
pub trait LedgerStore: Send + Sync {
    /// Insert the row, or overwrite every column of the row with the same
    /// card number. Row count is unchanged on overwrite.
    fn upsert(&self, row: &LedgerRow) -> Result<(), CoreError>;

    /// Look up a row by card number.
    fn find(&self, card_number: &str) -> Result<Option<LedgerRow>, CoreError>;

    /// Apply a partial edit to an existing row; unknown card numbers fail
    /// with `NotFound` and nothing is written.
    fn edit(&self, card_number: &str, edit: &LedgerEdit) -> Result<LedgerRow, CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_is_derived() {
        let row = LedgerRow {
            card_number: "3".to_string(),
            first_name: "JAN".to_string(),
            last_name: "KOWALSKI".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            end_date: None,
        };
        assert_eq!(row.full_name(), "JAN KOWALSKI");
    }

    #[test]
    fn default_edit_is_empty() {
        assert!(LedgerEdit::default().is_empty());
        let edit = LedgerEdit {
            last_name: Some("NOWAK".to_string()),
            ..LedgerEdit::default()
        };
        assert!(!edit.is_empty());
    }
}
