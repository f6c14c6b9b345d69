//! Error types for the reservation engine

use std::fmt;
use thiserror::Error;

/// Result type for reservation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reservation engine errors
#[derive(Error, Debug)]
pub enum Error {
    /// Record store error
    #[error("Store error: {0}")]
    Store(#[from] donation_core::Error),

    /// Ledger client error (transport or decoding, retryable)
    #[error("Ledger error: {0}")]
    Ledger(#[from] ledger_verify::Error),

    /// Referenced entity or pending reservation does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity class (donor, charity, campaign, reservation)
        entity: &'static str,
        /// Missing key
        id: String,
    },

    /// Required input field missing or malformed
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A live pending reservation already occupies this memo slot
    #[error("Memo collision: {0}")]
    MemoCollision(u64),

    /// The ledger block does not record the expected transfer
    ///
    /// Recoverable: the pending reservation is left untouched and the
    /// caller may retry with a later block once the payment propagates.
    #[error("Payment not verified for memo {memo} at block {block}")]
    PaymentNotVerified {
        /// Correlation memo of the reservation
        memo: u64,
        /// Block index that was checked
        block: u64,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Typed missing-entity error
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Check for the missing-entity class
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Store(inner) => inner.is_not_found(),
            _ => false,
        }
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
