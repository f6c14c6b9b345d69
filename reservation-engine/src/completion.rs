//! Reservation completion
//!
//! Converts a verified pending reservation into a permanent donation:
//!
//! ```text
//! PaymentPending ──verify ok──> Completed
//!       │
//!       └──verify fails──> PaymentPending (caller may retry, later block)
//! ```
//!
//! The whole check-verify-remove-commit sequence runs under the per-memo
//! lock, and the pending entry is only consumed inside the atomic commit,
//! so a memo completes at most once: a second attempt, a concurrent
//! attempt, or an attempt after expiry all observe no pending entry and
//! fail with a not-found error.

use crate::{
    aggregates::apply_completion,
    error::{Error, Result},
    locks::MemoLocks,
};
use chrono::Utc;
use donation_core::{
    types::{CallerId, Donation, Memo, PartyId},
    Metrics, Store,
};
use ledger_verify::PaymentVerifier;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Orchestrates verification and commit of pending reservations
pub struct CompletionEngine {
    store: Arc<Store>,
    verifier: PaymentVerifier,
    locks: MemoLocks,
    metrics: Metrics,
}

impl CompletionEngine {
    /// Create completion engine over a store and verifier
    pub fn new(
        store: Arc<Store>,
        verifier: PaymentVerifier,
        locks: MemoLocks,
        metrics: Metrics,
    ) -> Self {
        Self {
            store,
            verifier,
            locks,
            metrics,
        }
    }

    /// Complete a pending reservation after verifying its payment
    ///
    /// `caller` is the identity that made the transfer; the ledger block at
    /// `block_index` must record a transfer from the caller's address to
    /// the reservation's payee for exactly `amount` with the reservation's
    /// memo. On verification failure the reservation is left untouched.
    pub async fn complete(
        &self,
        caller: &CallerId,
        donor_id: &PartyId,
        amount: Decimal,
        block_index: u64,
        memo: Memo,
    ) -> Result<Donation> {
        let lock = self.locks.lock_for(memo.value());
        let guard = lock.lock().await;

        let result = self
            .complete_locked(caller, donor_id, amount, block_index, memo)
            .await;

        drop(guard);
        self.locks.evict(memo.value());

        result
    }

    async fn complete_locked(
        &self,
        caller: &CallerId,
        donor_id: &PartyId,
        amount: Decimal,
        block_index: u64,
        memo: Memo,
    ) -> Result<Donation> {
        let now = Utc::now();

        let pending = match self.store.try_get_pending(memo)? {
            Some(pending) if pending.is_expired(now) => {
                // Lazy expiry: the timer may not have fired yet
                self.store.remove_pending(memo)?;
                self.metrics.record_reservation_expired();
                tracing::debug!(memo = %memo, "Reservation expired on access");
                return Err(Error::not_found("reservation", memo));
            }
            Some(pending) => pending,
            None => return Err(Error::not_found("reservation", memo)),
        };

        if pending.donor_id != *donor_id {
            return Err(Error::InvalidPayload(format!(
                "reservation {} belongs to donor {}",
                memo, pending.donor_id
            )));
        }
        if pending.amount != amount {
            return Err(Error::InvalidPayload(format!(
                "amount {} does not match reserved amount {}",
                amount, pending.amount
            )));
        }

        // All referenced records must still exist before the pending entry
        // is consumed, so a failure here leaves the reservation retryable
        let donor = self
            .store
            .try_get_donor(donor_id)?
            .ok_or_else(|| Error::not_found("donor", donor_id))?;
        let charity = self
            .store
            .try_get_charity(&pending.charity_id)?
            .ok_or_else(|| Error::not_found("charity", &pending.charity_id))?;
        let campaign = self
            .store
            .try_get_campaign(&pending.campaign_id)?
            .ok_or_else(|| Error::not_found("campaign", &pending.campaign_id))?;

        let verified = self
            .verifier
            .verify(
                caller.as_str(),
                pending.payee.as_str(),
                amount,
                block_index,
                memo.value(),
            )
            .await?;

        if !verified {
            self.metrics.record_verification_failure();
            tracing::debug!(
                memo = %memo,
                block = block_index,
                "Payment not verified, reservation left pending"
            );
            return Err(Error::PaymentNotVerified {
                memo: memo.value(),
                block: block_index,
            });
        }

        let completed = pending.into_completed(block_index);
        let (donor, charity, campaign) =
            apply_completion(&completed, donor, charity, campaign, now);

        self.store
            .commit_completion(&completed, &donor, &charity, &campaign)?;
        self.metrics.record_completion();

        tracing::info!(
            memo = %memo,
            donation_id = %completed.donation_id,
            block = block_index,
            amount = %completed.amount,
            "Donation completed"
        );

        Ok(completed)
    }
}
