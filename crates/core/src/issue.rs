//! The card issuance pipeline.
//!
//! One request flows through five stages: photo validation, number
//! allocation, image composition, dual-sink persistence, ledger upsert.
//! The first failing stage aborts the request; nothing is retried and no
//! completed stage is undone. In particular a failure between the file
//! write and the ledger upsert leaves a card file without a ledger row;
//! the two sinks share no transaction.
//!
//! Allocation through ledger upsert runs under a single mutex so concurrent
//! requests cannot scan the same maximum and issue duplicate numbers.

use std::sync::{Mutex, PoisonError};

use chrono::{Local, NaiveDate};

use crate::compose::Composer;
use crate::error::CoreError;
use crate::ledger::{LedgerEdit, LedgerRow, LedgerStore};
use crate::naming;
use crate::numbering;
use crate::photo;
use crate::store::CardStore;

/// A validated issuance request, as handed over by the transport layer.
#[derive(Debug, Clone)]
pub struct IssueCardRequest {
    pub first_name: String,
    pub last_name: String,
    pub photo_bytes: Vec<u8>,
    pub photo_filename: String,
    /// Declared upload length; checked against the 5 MiB cap.
    pub photo_len: u64,
    /// Re-issue / correction under a known number. Collisions overwrite.
    pub explicit_card_number: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Outcome of a successful issuance.
#[derive(Debug, Clone)]
pub struct CardResult {
    /// Card number as an unpadded decimal string.
    pub card_number: String,
    /// Canonical filename under both sinks.
    pub file_name: String,
    /// Path of the authoritative copy.
    pub stored_path: String,
}

/// Orchestrates the issuance stages over injected store, ledger, and
/// composer implementations.
pub struct CardIssuer<S, L, C> {
    store: S,
    ledger: L,
    composer: C,
    /// Guards allocation, persistence, and ledger writes as one unit.
    guard: Mutex<()>,
}

impl<S, L, C> CardIssuer<S, L, C>
where
    S: CardStore,
    L: LedgerStore,
    C: Composer,
{
    pub fn new(store: S, ledger: L, composer: C) -> Self {
        CardIssuer {
            store,
            ledger,
            composer,
            guard: Mutex::new(()),
        }
    }

    /// Run the full issuance pipeline.
    pub fn issue(&self, request: &IssueCardRequest) -> Result<CardResult, CoreError> {
        // Normalization to upper case happens once, here at the boundary;
        // every sink (filename, card text, ledger) sees the same form.
        let first_name = normalize_name(&request.first_name, "First name")?;
        let last_name = normalize_name(&request.last_name, "Last name")?;

        photo::validate_upload(&request.photo_filename, request.photo_len)?;
        let photo = photo::decode_photo(&request.photo_bytes)?;

        // A poisoned lock means another issuance panicked mid-pipeline; the
        // store scan below re-reads persisted truth, so continuing is safe.
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);

        let existing = self.store.list_card_numbers()?;
        let card_number =
            numbering::resolve_card_number(&existing, request.explicit_card_number.as_deref())?;

        if request.explicit_card_number.is_some() && existing.contains(&card_number) {
            tracing::warn!(
                card_number,
                "explicit card number collides with an existing card; overwriting"
            );
        }

        let issued_on = Local::now().date_naive();
        let jpeg = self
            .composer
            .compose(&photo, &first_name, &last_name, card_number, issued_on)?;

        let file_name = naming::card_filename(card_number, &first_name, &last_name);
        let stored_path = self.store.persist(&file_name, &jpeg)?;

        let row = LedgerRow {
            card_number: card_number.to_string(),
            first_name,
            last_name,
            start_date: request.start_date.unwrap_or(issued_on),
            end_date: request.end_date,
        };
        self.ledger.upsert(&row)?;

        tracing::info!(
            card_number = %row.card_number,
            path = %stored_path.display(),
            "card issued"
        );

        Ok(CardResult {
            card_number: row.card_number,
            file_name,
            stored_path: stored_path.display().to_string(),
        })
    }

    /// Correct an existing ledger row. Name fields are normalized to upper
    /// case like everywhere else; unknown card numbers fail with `NotFound`.
    pub fn edit(&self, card_number: &str, edit: &LedgerEdit) -> Result<LedgerRow, CoreError> {
        if edit.is_empty() {
            return Err(CoreError::Validation(
                "At least one field must be supplied".to_string(),
            ));
        }

        let normalized = LedgerEdit {
            first_name: normalize_opt(edit.first_name.as_deref(), "First name")?,
            last_name: normalize_opt(edit.last_name.as_deref(), "Last name")?,
            start_date: edit.start_date,
            end_date: edit.end_date,
        };

        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        self.ledger.edit(card_number, &normalized)
    }

    /// Ledger lookup by card number.
    pub fn find(&self, card_number: &str) -> Result<Option<LedgerRow>, CoreError> {
        self.ledger.find(card_number)
    }
}

fn normalize_name(raw: &str, field: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_uppercase())
}

fn normalize_opt(raw: Option<&str>, field: &str) -> Result<Option<String>, CoreError> {
    raw.map(|value| normalize_name(value, field)).transpose()
}
