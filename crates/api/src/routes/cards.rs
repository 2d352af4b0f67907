//! Route definitions for the card resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cards;
use crate::state::AppState;

/// Card routes mounted at `/cards`.
///
/// ```text
/// POST  /           -> issue (multipart form)
/// GET   /{number}   -> get_by_number
/// PATCH /{number}   -> edit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(cards::issue))
        .route("/{number}", get(cards::get_by_number).patch(cards::edit))
}
