//! Error types for ledger verification

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger client errors
///
/// Note that a payment failing to verify is not an error: the verifier
/// returns `Ok(false)` so callers can retry against a later block. Errors
/// here are transport and decoding failures only.
#[derive(Error, Debug)]
pub enum Error {
    /// Request to the ledger service failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Decode(err.to_string())
        } else {
            Error::Transport(err.to_string())
        }
    }
}
