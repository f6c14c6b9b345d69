//! Reservation Engine
//!
//! Implements the donation reservation and payment-verification protocol.
//!
//! # Architecture

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
//!
//! A donation moves through a lease-then-verify lifecycle:
//!
//! 1. **Reserve**: A pending reservation is created under a derived memo
//!    and granted a bounded payment window
//! 2. **Pay**: The donor completes an off-band transfer quoting the memo
//! 3. **Verify**: The external ledger is queried for the exact transfer
//! 4. **Commit**: The reservation atomically becomes a completed donation
//!    and donor, charity and campaign aggregates are updated together
//!
//! Unclaimed reservations expire silently after the window closes; a later
//! completion attempt for their memo fails with a not-found error.
//!
//! # Example
//!
//! ```no_run
//! use reservation_engine::{Config, DonationEngine};
//!
//! #[tokio::main]
//! async fn main() -> reservation_engine::Result<()> {
//!     let store_config = donation_core::Config::default();
//!     let engine = DonationEngine::open(&store_config, &Config::default())?;
//!
//!     // let donation = engine.reserve_donation(...).await?;
//!     // let completed = engine.complete_donation(...).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod aggregates;
pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod locks;
pub mod manager;

// Re-exports
pub use completion::CompletionEngine;
pub use config::{Config, LedgerConfig};
pub use engine::DonationEngine;
pub use error::{Error, Result};
pub use locks::MemoLocks;
pub use manager::ReservationManager;
