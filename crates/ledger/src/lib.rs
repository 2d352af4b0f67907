//! CSV-backed implementation of the card ledger.
//!
//! One file, one row per issued card, keyed by card number:
//!
//! ```text
//! card_number,first_name,last_name,start_date,end_date
//! 1,JAN,KOWALSKI,2024-03-15,
//! 2,ANNA,NOWAK,2024-03-16,2026-04-30
//! ```
//!
//! Every mutation reads the whole table, applies the change in memory, and
//! rewrites the file through a same-directory temp file + rename, so a crash
//! mid-write never leaves a truncated ledger behind. An absent file is an
//! empty ledger; an unreadable one is a ledger error.

use std::fs;
use std::path::{Path, PathBuf};

use karta_core::error::CoreError;
use karta_core::ledger::{LedgerEdit, LedgerRow, LedgerStore};

pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvLedger { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> Result<Vec<LedgerRow>, CoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(ledger_err)?;
        reader
            .deserialize()
            .collect::<Result<Vec<LedgerRow>, _>>()
            .map_err(ledger_err)
    }

    fn write_rows(&self, rows: &[LedgerRow]) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(ledger_err)?;
            }
        }

        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&tmp).map_err(ledger_err)?;
            for row in rows {
                writer.serialize(row).map_err(ledger_err)?;
            }
            writer.flush().map_err(ledger_err)?;
        }
        fs::rename(&tmp, &self.path).map_err(ledger_err)
    }
}

fn ledger_err(err: impl ToString) -> CoreError {
    CoreError::Ledger(err.to_string())
}

impl LedgerStore for CsvLedger {
    fn upsert(&self, row: &LedgerRow) -> Result<(), CoreError> {
        let mut rows = self.read_rows()?;
        match rows.iter_mut().find(|r| r.card_number == row.card_number) {
            Some(existing) => {
                tracing::debug!(card_number = %row.card_number, "overwriting ledger row");
                *existing = row.clone();
            }
            None => rows.push(row.clone()),
        }
        self.write_rows(&rows)
    }

    fn find(&self, card_number: &str) -> Result<Option<LedgerRow>, CoreError> {
        Ok(self
            .read_rows()?
            .into_iter()
            .find(|r| r.card_number == card_number))
    }

    fn edit(&self, card_number: &str, edit: &LedgerEdit) -> Result<LedgerRow, CoreError> {
        let mut rows = self.read_rows()?;
        let row = rows
            .iter_mut()
            .find(|r| r.card_number == card_number)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Card",
                key: card_number.to_string(),
            })?;

        if let Some(first) = &edit.first_name {
            row.first_name = first.clone();
        }
        if let Some(last) = &edit.last_name {
            row.last_name = last.clone();
        }
        if let Some(start) = edit.start_date {
            row.start_date = start;
        }
        if let Some(end) = edit.end_date {
            row.end_date = Some(end);
        }

        let updated = row.clone();
        self.write_rows(&rows)?;
        Ok(updated)
    }
}
