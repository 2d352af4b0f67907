//! Card file persistence.
//!
//! Issued cards live in two places: the authoritative store (source of
//! truth, also scanned for number allocation) and a mirror kept under the
//! served web root. Both hold the identical bytes under the identical
//! canonical filename, and both writes overwrite on conflict.
//!
//! The store is a trait so the issuance pipeline can be tested against an
//! in-memory fake instead of real directories.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, StoreLocation};
use crate::naming;

pub trait CardStore: Send + Sync {
    /// Card numbers currently persisted in the authoritative store.
    fn list_card_numbers(&self) -> Result<Vec<u32>, CoreError>;

    /// Write the card to both sinks; returns the authoritative path.
    ///
    /// If the authoritative write succeeds and the mirror write fails, the
    /// authoritative copy stays in place and the error names the mirror.
    fn persist(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, CoreError>;

    /// Read a card back from the authoritative store, `None` if absent.
    fn read(&self, file_name: &str) -> Result<Option<Vec<u8>>, CoreError>;
}

/// Filesystem-backed store over two directories.
pub struct FsCardStore {
    authoritative: PathBuf,
    mirror: PathBuf,
}

impl FsCardStore {
    pub fn new(authoritative: impl Into<PathBuf>, mirror: impl Into<PathBuf>) -> Self {
        FsCardStore {
            authoritative: authoritative.into(),
            mirror: mirror.into(),
        }
    }

    pub fn authoritative_dir(&self) -> &Path {
        &self.authoritative
    }
}

fn store_err(location: StoreLocation, detail: impl ToString) -> CoreError {
    CoreError::Storage {
        location,
        detail: detail.to_string(),
    }
}

impl CardStore for FsCardStore {
    fn list_card_numbers(&self) -> Result<Vec<u32>, CoreError> {
        // A store that has issued no cards yet has no directory either.
        if !self.authoritative.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.authoritative)
            .map_err(|e| store_err(StoreLocation::Authoritative, e))?;

        let mut numbers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| store_err(StoreLocation::Authoritative, e))?;
            let name = entry.file_name();
            if let Some(number) = name.to_str().and_then(naming::parse_card_number) {
                numbers.push(number);
            }
        }
        Ok(numbers)
    }

    fn persist(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, CoreError> {
        fs::create_dir_all(&self.authoritative)
            .map_err(|e| store_err(StoreLocation::Authoritative, e))?;

        let authoritative_path = self.authoritative.join(file_name);
        fs::write(&authoritative_path, bytes).map_err(|e| {
            store_err(
                StoreLocation::Authoritative,
                format!("writing {}: {e}", authoritative_path.display()),
            )
        })?;

        // No rollback of the authoritative copy on mirror failure; the
        // partial state is surfaced, not masked.
        let mirror_path = self.mirror.join(file_name);
        fs::write(&mirror_path, bytes).map_err(|e| {
            store_err(
                StoreLocation::Mirror,
                format!(
                    "authoritative copy written, mirror write {} failed: {e}",
                    mirror_path.display()
                ),
            )
        })?;

        Ok(authoritative_path)
    }

    fn read(&self, file_name: &str) -> Result<Option<Vec<u8>>, CoreError> {
        match fs::read(self.authoritative.join(file_name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(store_err(StoreLocation::Authoritative, e)),
        }
    }
}
