pub mod cards;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /cards                  issue a card (POST, multipart)
/// /cards/{number}         ledger lookup (GET), ledger correction (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/cards", cards::router())
}
