use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
        }
    }
}

/// Filesystem locations of the card pipeline: the two card sinks, the
/// ledger file, and the composition assets. None are hard-coded.
#[derive(Debug, Clone)]
pub struct CardPaths {
    /// Authoritative card store (typically a mounted network share).
    pub authoritative_dir: PathBuf,
    /// Mirror directory, served directly under `/cards`.
    pub mirror_dir: PathBuf,
    /// Tabular ledger file.
    pub ledger_path: PathBuf,
    /// Background template the card is drawn onto.
    pub template_path: PathBuf,
    /// TTF font used for all card text.
    pub font_path: PathBuf,
}

impl CardPaths {
    /// Load card paths from environment variables with defaults.
    ///
    /// | Env Var                 | Default                        |
    /// |-------------------------|--------------------------------|
    /// | `CARD_AUTHORITATIVE_DIR`| `data/cards`                   |
    /// | `CARD_MIRROR_DIR`       | `public/cards`                 |
    /// | `CARD_LEDGER_PATH`      | `data/ledger.csv`              |
    /// | `CARD_TEMPLATE_PATH`    | `assets/karta_a.jpg`           |
    /// | `CARD_FONT_PATH`        | `assets/fonts/DejaVuSans.ttf`  |
    pub fn from_env() -> Self {
        let path = |var: &str, default: &str| {
            PathBuf::from(std::env::var(var).unwrap_or_else(|_| default.into()))
        };

        Self {
            authoritative_dir: path("CARD_AUTHORITATIVE_DIR", "data/cards"),
            mirror_dir: path("CARD_MIRROR_DIR", "public/cards"),
            ledger_path: path("CARD_LEDGER_PATH", "data/ledger.csv"),
            template_path: path("CARD_TEMPLATE_PATH", "assets/karta_a.jpg"),
            font_path: path("CARD_FONT_PATH", "assets/fonts/DejaVuSans.ttf"),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub paths: CardPaths,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            paths: CardPaths::from_env(),
        }
    }
}
