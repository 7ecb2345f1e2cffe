//! Error types for literer-scholar

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScholarError>;

#[derive(Error, Debug)]
pub enum ScholarError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Semantic Scholar error [{status}]: {message}")]
    Api { status: u16, message: String },

    #[error("'{value}' is not a valid {kind}")]
    InvalidFilter { kind: &'static str, value: String },

    #[error("Top journals for '{0}' have not been compiled yet")]
    UnknownField(String),
}
