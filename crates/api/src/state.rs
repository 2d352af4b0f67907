use std::sync::Arc;

use karta_core::compose::TemplateComposer;
use karta_core::issue::CardIssuer;
use karta_core::store::FsCardStore;
use karta_ledger::CsvLedger;

use crate::config::AppConfig;

/// The concrete issuer used in production: filesystem store, CSV ledger,
/// template composer.
pub type Issuer = CardIssuer<FsCardStore, CsvLedger, TemplateComposer>;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The issuance pipeline; its internal lock serializes issuances.
    pub issuer: Arc<Issuer>,
    /// Application configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the production pipeline from configuration.
    pub fn from_config(config: AppConfig) -> Self {
        let store = FsCardStore::new(&config.paths.authoritative_dir, &config.paths.mirror_dir);
        let ledger = CsvLedger::new(&config.paths.ledger_path);
        let composer = TemplateComposer::new(&config.paths.template_path, &config.paths.font_path);

        AppState {
            issuer: Arc::new(CardIssuer::new(store, ledger, composer)),
            config: Arc::new(config),
        }
    }
}
