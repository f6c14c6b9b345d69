//! Ledger verification
//!
//! Read-only interface to the external transfer ledger: binary account
//! addresses derived from caller identities, a block-query client, and the
//! exact-match payment verifier used to confirm that an off-band transfer
//! was recorded before a reservation is completed.

#![forbid(unsafe_code)]

pub mod address;
pub mod client;
pub mod error;
pub mod types;
pub mod verifier;

pub use address::{AccountAddress, DEFAULT_SUBACCOUNT};
pub use client::{BlockQuery, HttpLedgerClient};
pub use error::{Error, Result};
pub use types::{BlockQueryRequest, BlockQueryResponse, LedgerBlock, TransferOp};
pub use verifier::PaymentVerifier;
