//! Handlers for the `/cards` resource.
//!
//! Issuance takes a multipart form (the photo plus text fields) and runs the
//! blocking pipeline on the Tokio blocking pool. Lookup and correction go
//! straight to the ledger.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use karta_core::issue::{CardResult, IssueCardRequest};
use karta_core::ledger::{LedgerEdit, LedgerRow};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Typed response for a successful issuance.
#[derive(Debug, Serialize)]
pub struct CardIssued {
    pub card_number: String,
    pub file_name: String,
    pub stored_path: String,
    /// Where the finished card can be fetched from the mirror.
    pub url: String,
}

impl From<CardResult> for CardIssued {
    fn from(result: CardResult) -> Self {
        let url = format!("/cards/{}", result.file_name);
        CardIssued {
            card_number: result.card_number,
            file_name: result.file_name,
            stored_path: result.stored_path,
            url,
        }
    }
}

/// A ledger row as served to clients; `full_name` is derived, not stored.
#[derive(Debug, Serialize)]
pub struct LedgerEntry {
    pub card_number: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl From<LedgerRow> for LedgerEntry {
    fn from(row: LedgerRow) -> Self {
        let full_name = row.full_name();
        LedgerEntry {
            card_number: row.card_number,
            first_name: row.first_name,
            last_name: row.last_name,
            full_name,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}

// ── Issue ────────────────────────────────────────────────────────────

/// POST /api/v1/cards
///
/// Multipart fields: `photo` (file, required), `first_name`, `last_name`
/// (required), `card_number`, `start_date`, `end_date` (optional).
pub async fn issue(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<CardIssued>>)> {
    let mut photo: Option<(String, Vec<u8>)> = None;
    let mut first_name = None;
    let mut last_name = None;
    let mut card_number = None;
    let mut start_date_raw = None;
    let mut end_date_raw = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("photo") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                photo = Some((filename, data.to_vec()));
            }
            Some("first_name") => first_name = Some(text_field(field).await?),
            Some("last_name") => last_name = Some(text_field(field).await?),
            Some("card_number") => card_number = Some(text_field(field).await?),
            Some("start_date") => start_date_raw = Some(text_field(field).await?),
            Some("end_date") => end_date_raw = Some(text_field(field).await?),
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    let (photo_filename, photo_bytes) =
        photo.ok_or_else(|| AppError::BadRequest("Field 'photo' is required".to_string()))?;
    let first_name = first_name
        .ok_or_else(|| AppError::BadRequest("Field 'first_name' is required".to_string()))?;
    let last_name = last_name
        .ok_or_else(|| AppError::BadRequest("Field 'last_name' is required".to_string()))?;

    let request = IssueCardRequest {
        first_name,
        last_name,
        photo_len: photo_bytes.len() as u64,
        photo_bytes,
        photo_filename,
        explicit_card_number: card_number.filter(|n| !n.trim().is_empty()),
        start_date: parse_opt_date(start_date_raw, "start_date")?,
        end_date: parse_opt_date(end_date_raw, "end_date")?,
    };

    // Image decoding, drawing, and the dual file write are all blocking.
    let issuer = state.issuer.clone();
    let result = tokio::task::spawn_blocking(move || issuer.issue(&request))
        .await
        .map_err(|e| AppError::InternalError(format!("Issuance task failed: {e}")))??;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CardIssued::from(result),
        }),
    ))
}

// ── Lookup ───────────────────────────────────────────────────────────

/// GET /api/v1/cards/{number}
pub async fn get_by_number(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> AppResult<Json<DataResponse<LedgerEntry>>> {
    let issuer = state.issuer.clone();
    let key = number.clone();
    let row = tokio::task::spawn_blocking(move || issuer.find(&number))
        .await
        .map_err(|e| AppError::InternalError(format!("Lookup task failed: {e}")))??
        .ok_or_else(|| {
            AppError::Core(karta_core::error::CoreError::NotFound {
                entity: "Card",
                key,
            })
        })?;

    Ok(Json(DataResponse {
        data: LedgerEntry::from(row),
    }))
}

// ── Edit ─────────────────────────────────────────────────────────────

/// Body for PATCH /api/v1/cards/{number}. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct EditCardRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// PATCH /api/v1/cards/{number}
pub async fn edit(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Json(input): Json<EditCardRequest>,
) -> AppResult<Json<DataResponse<LedgerEntry>>> {
    let edit = LedgerEdit {
        first_name: input.first_name,
        last_name: input.last_name,
        start_date: input.start_date,
        end_date: input.end_date,
    };

    let issuer = state.issuer.clone();
    let row = tokio::task::spawn_blocking(move || issuer.edit(&number, &edit))
        .await
        .map_err(|e| AppError::InternalError(format!("Edit task failed: {e}")))??;

    Ok(Json(DataResponse {
        data: LedgerEntry::from(row),
    }))
}

// ── Helpers ──────────────────────────────────────────────────────────

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

fn parse_opt_date(raw: Option<String>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                AppError::BadRequest(format!("Field '{name}' must be a YYYY-MM-DD date"))
            })
        })
        .transpose()
}
