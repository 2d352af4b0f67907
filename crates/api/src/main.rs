use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use karta_api::config::AppConfig;
use karta_api::router::build_app_router;
use karta_api::state::AppState;
use karta_core::compose::TemplateComposer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "karta_api=debug,karta_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = AppConfig::from_env();
    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        authoritative = %config.paths.authoritative_dir.display(),
        mirror = %config.paths.mirror_dir.display(),
        "Loaded configuration"
    );

    // --- Composition assets (fail fast on misconfiguration) ---
    TemplateComposer::new(&config.paths.template_path, &config.paths.font_path)
        .verify_assets()
        .expect("Card template or font is missing; check CARD_TEMPLATE_PATH and CARD_FONT_PATH");
    tracing::info!("Card template and font found");

    // --- Mirror web root ---
    std::fs::create_dir_all(&config.paths.mirror_dir)
        .expect("Failed to create the mirror directory");

    // --- State & router ---
    let host = config.server.host.clone();
    let port = config.server.port;
    let state = AppState::from_config(config);
    let app = build_app_router(state);

    let addr = SocketAddr::new(host.parse().expect("Invalid HOST"), port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
