use thiserror::Error;

/// Errors from brand lookup and cache-file handling.
#[derive(Debug, Error)]
pub enum BrandError {
    #[error("Brand API request failed: {0}")]
    Transport(String),

    #[error("Brand API returned status {0}")]
    Status(u16),

    #[error("Failed to decode brand response: {0}")]
    Decode(String),

    #[error("Brand cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Brand cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
