//! Card number allocation.
//!
//! Numbers are plain positive integers formatted without padding. Automatic
//! allocation scans the numbers currently persisted in the authoritative
//! store and returns max + 1; the scan and the subsequent writes must run
//! under the issuer's lock so two requests cannot allocate the same number.

use crate::error::CoreError;

/// Next card number for automatic allocation: highest existing number plus
/// one, or `1` for an empty store.
pub fn next_card_number(existing: &[u32]) -> u32 {
    existing.iter().copied().max().unwrap_or(0) + 1
}

/// Resolve the card number for an issuance request.
///
/// An explicitly supplied number is parsed and returned verbatim, whether or
/// not it collides with an existing card; re-issuing under a known number is
/// the supported correction workflow, and the caller logs the overwrite.
/// Non-numeric input is a validation error.
pub fn resolve_card_number(
    existing: &[u32],
    explicit: Option<&str>,
) -> Result<u32, CoreError> {
    match explicit {
        Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
            CoreError::Validation(format!("Card number must be a positive integer, got '{raw}'"))
        }),
        None => Ok(next_card_number(existing)),
    }
}
