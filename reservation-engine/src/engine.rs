//! Main donation engine
//!
//! Ties the store, registry, reservation manager, completion engine and
//! ledger verifier into a single API surface for embedding services.

use crate::{
    completion::CompletionEngine,
    config::Config,
    error::{Error, Result},
    locks::MemoLocks,
    manager::ReservationManager,
};
use donation_core::{
    types::{CallerId, Donation, Memo, PartyId},
    Metrics, Registry, Store,
};
use ledger_verify::{BlockQuery, HttpLedgerClient, PaymentVerifier};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// Donation engine
pub struct DonationEngine {
    store: Arc<Store>,
    registry: Registry,
    manager: ReservationManager,
    completion: CompletionEngine,
    verifier: PaymentVerifier,
    metrics: Metrics,
}

impl DonationEngine {
    /// Open the engine with a fresh store and the HTTP ledger client
    pub fn open(store_config: &donation_core::Config, config: &Config) -> Result<Self> {
        let client = HttpLedgerClient::new(
            &config.ledger.endpoint,
            Duration::from_millis(config.ledger.request_timeout_ms),
        )?;

        let store = Arc::new(Store::open(store_config)?);
        Self::with_client(store, config, Arc::new(client))
    }

    /// Build the engine over an existing store and block-query client
    ///
    /// Tests inject in-memory ledger stubs through this constructor.
    pub fn with_client(
        store: Arc<Store>,
        config: &Config,
        client: Arc<dyn BlockQuery>,
    ) -> Result<Self> {
        let metrics =
            Metrics::new().map_err(|e| Error::Other(format!("Metrics init failed: {}", e)))?;
        let locks = MemoLocks::new();
        let verifier = PaymentVerifier::new(client);

        let manager = ReservationManager::new(
            store.clone(),
            locks.clone(),
            metrics.clone(),
            config,
        );
        let completion = CompletionEngine::new(
            store.clone(),
            verifier.clone(),
            locks,
            metrics.clone(),
        );
        let registry = Registry::new(store.clone());

        Ok(Self {
            store,
            registry,
            manager,
            completion,
            verifier,
            metrics,
        })
    }

    /// Reserve an intended donation
    pub async fn reserve_donation(
        &self,
        caller: &CallerId,
        donor_id: &PartyId,
        charity_id: &PartyId,
        campaign_id: &PartyId,
        amount: Decimal,
    ) -> Result<Donation> {
        self.manager
            .reserve(caller, donor_id, charity_id, campaign_id, amount)
            .await
    }

    /// Complete a pending reservation after verifying its payment
    pub async fn complete_donation(
        &self,
        caller: &CallerId,
        donor_id: &PartyId,
        amount: Decimal,
        block_index: u64,
        memo: Memo,
    ) -> Result<Donation> {
        self.completion
            .complete(caller, donor_id, amount, block_index, memo)
            .await
    }

    /// Check a payment against the ledger without touching any reservation
    pub async fn verify_payment(
        &self,
        caller: &CallerId,
        receiver: &CallerId,
        amount: Decimal,
        block_index: u64,
        memo: Memo,
    ) -> Result<bool> {
        Ok(self
            .verifier
            .verify(
                caller.as_str(),
                receiver.as_str(),
                amount,
                block_index,
                memo.value(),
            )
            .await?)
    }

    /// Profile and campaign registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Underlying record store
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Protocol metrics
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
