use std::fmt;

/// Which of the two card file sinks an I/O failure came from.
///
/// The authoritative store is the source of truth; the mirror sits under the
/// served web root. A mirror failure after a successful authoritative write
/// leaves the authoritative copy in place, so callers need to know which
/// side failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreLocation {
    Authoritative,
    Mirror,
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::Authoritative => write!(f, "authoritative"),
            StoreLocation::Mirror => write!(f, "mirror"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Missing asset '{asset}' at {path}")]
    MissingAsset { asset: &'static str, path: String },

    #[error("{location} store error: {detail}")]
    Storage {
        location: StoreLocation,
        detail: String,
    },

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Image error: {0}")]
    Image(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
