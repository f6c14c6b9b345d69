//! Reservation management
//!
//! A reservation is a lease: the caller gets a bounded window to complete
//! the off-band payment before the pending entry is removed and its memo
//! slot freed. Expiry is enforced twice over. A one-shot timer performs
//! best-effort cleanup so the pending table cannot grow unbounded with
//! abandoned reservations, and every access checks `expires_at` lazily so
//! correctness never depends on timer delivery.

use crate::{
    config::Config,
    error::{Error, Result},
    locks::MemoLocks,
};
use chrono::Utc;
use donation_core::{
    memo::derive_memo,
    types::{CallerId, Donation, DonationStatus, Memo, PartyId},
    Metrics, Store,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Creates pending reservations and schedules their expiry
pub struct ReservationManager {
    store: Arc<Store>,
    locks: MemoLocks,
    metrics: Metrics,
    ttl: chrono::Duration,
    sleep_ttl: tokio::time::Duration,
}

impl ReservationManager {
    /// Create manager over a store
    pub fn new(store: Arc<Store>, locks: MemoLocks, metrics: Metrics, config: &Config) -> Self {
        Self {
            store,
            locks,
            metrics,
            ttl: chrono::Duration::seconds(config.reservation_ttl_secs as i64),
            sleep_ttl: tokio::time::Duration::from_secs(config.reservation_ttl_secs),
        }
    }

    /// Reserve an intended donation
    ///
    /// Donor, charity and campaign must all exist; they are checked in that
    /// order and the first missing one is reported. On success a pending
    /// reservation is stored under a freshly derived memo, payable by the
    /// donor's owner to the campaign's creator, and its expiry is scheduled.
    pub async fn reserve(
        &self,
        caller: &CallerId,
        donor_id: &PartyId,
        charity_id: &PartyId,
        campaign_id: &PartyId,
        amount: Decimal,
    ) -> Result<Donation> {
        if donor_id.is_empty() || charity_id.is_empty() || campaign_id.is_empty() {
            return Err(Error::InvalidPayload(
                "donor, charity and campaign ids are required".to_string(),
            ));
        }
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidPayload("amount must be positive".to_string()));
        }

        let donor = self
            .store
            .try_get_donor(donor_id)?
            .ok_or_else(|| Error::not_found("donor", donor_id))?;

        if self.store.try_get_charity(charity_id)?.is_none() {
            return Err(Error::not_found("charity", charity_id));
        }

        let campaign = self
            .store
            .try_get_campaign(campaign_id)?
            .ok_or_else(|| Error::not_found("campaign", campaign_id))?;

        let now = Utc::now();
        let memo = derive_memo(donor_id, caller, now.timestamp_nanos_opt().unwrap_or(0));

        // The memo slot must be free; an expired leftover is reclaimed,
        // a live entry is a collision
        if let Some(existing) = self.store.try_get_pending(memo)? {
            if existing.is_expired(now) {
                self.store.remove_pending(memo)?;
                self.metrics.record_reservation_expired();
            } else {
                return Err(Error::MemoCollision(memo.value()));
            }
        }

        let donation = Donation {
            donation_id: Uuid::now_v7(),
            donor_id: donor_id.clone(),
            charity_id: charity_id.clone(),
            campaign_id: campaign_id.clone(),
            payer: donor.owner.clone(),
            payee: campaign.creator.clone(),
            amount,
            status: DonationStatus::PaymentPending,
            memo,
            created_at: now,
            expires_at: now + self.ttl,
            paid_at_block: None,
        };

        self.store.put_pending(&donation)?;
        self.metrics.record_reservation();

        tracing::info!(
            memo = %memo,
            donor = %donor_id,
            campaign = %campaign_id,
            %amount,
            "Reservation created"
        );

        self.schedule_expiry(memo);

        Ok(donation)
    }

    /// Schedule the one-shot expiry callback for a memo
    ///
    /// The callback is idempotent: if the reservation was completed or
    /// already removed by the time it fires, it does nothing. It never
    /// surfaces an error to any caller.
    fn schedule_expiry(&self, memo: Memo) {
        let store = self.store.clone();
        let locks = self.locks.clone();
        let metrics = self.metrics.clone();
        let ttl = self.sleep_ttl;

        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;

            let lock = locks.lock_for(memo.value());
            let guard = lock.lock().await;

            match store.try_get_pending(memo) {
                Ok(Some(_)) => {
                    if let Err(e) = store.remove_pending(memo) {
                        tracing::error!(memo = %memo, "Failed to remove expired reservation: {}", e);
                    } else {
                        metrics.record_reservation_expired();
                        tracing::debug!(memo = %memo, "Reservation expired");
                    }
                }
                // Already completed or reclaimed; nothing to do
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(memo = %memo, "Expiry check failed: {}", e);
                }
            }

            drop(guard);
            locks.evict(memo.value());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donation_core::{Config as StoreConfig, Registry};
    use tempfile::TempDir;

    fn test_manager(ttl_secs: u64) -> (ReservationManager, Registry, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut store_config = StoreConfig::default();
        store_config.data_dir = temp_dir.path().to_path_buf();
        let store = Arc::new(Store::open(&store_config).unwrap());

        let mut config = Config::default();
        config.reservation_ttl_secs = ttl_secs;

        let manager = ReservationManager::new(
            store.clone(),
            MemoLocks::new(),
            Metrics::new().unwrap(),
            &config,
        );
        (manager, Registry::new(store), temp_dir)
    }

    fn seed(registry: &Registry) -> (CallerId, PartyId, PartyId, PartyId) {
        let donor_caller = CallerId::new("alice");
        let charity_caller = CallerId::new("water-org");
        let donor_id = PartyId::new("donor-1");
        let charity_id = PartyId::new("charity-1");
        let campaign_id = PartyId::new("campaign-1");

        registry
            .register_donor(&donor_caller, &donor_id, "Alice", "alice@example.com")
            .unwrap();
        registry
            .register_charity(&charity_caller, &charity_id, "Clean Water", "info@water.example")
            .unwrap();
        registry
            .create_campaign(
                &charity_caller,
                &campaign_id,
                &charity_id,
                "Wells",
                Decimal::new(10_000_00, 2),
            )
            .unwrap();

        (donor_caller, donor_id, charity_id, campaign_id)
    }

    #[tokio::test]
    async fn test_reserve_requires_positive_amount() {
        let (manager, registry, _temp) = test_manager(9600);
        let (caller, donor_id, charity_id, campaign_id) = seed(&registry);

        let err = manager
            .reserve(&caller, &donor_id, &charity_id, &campaign_id, Decimal::ZERO)
            .await;
        assert!(matches!(err, Err(Error::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn test_reserve_rejects_empty_ids() {
        let (manager, registry, _temp) = test_manager(9600);
        let (caller, donor_id, charity_id, _) = seed(&registry);

        let err = manager
            .reserve(&caller, &donor_id, &charity_id, &PartyId::new(""), Decimal::ONE)
            .await;
        assert!(matches!(err, Err(Error::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn test_reserve_sets_payer_payee_and_window() {
        let (manager, registry, _temp) = test_manager(9600);
        let (caller, donor_id, charity_id, campaign_id) = seed(&registry);

        let donation = manager
            .reserve(&caller, &donor_id, &charity_id, &campaign_id, Decimal::new(100_00, 2))
            .await
            .unwrap();

        assert_eq!(donation.status, DonationStatus::PaymentPending);
        assert_eq!(donation.payer, CallerId::new("alice"));
        assert_eq!(donation.payee, CallerId::new("water-org"));
        assert_eq!(donation.paid_at_block, None);
        assert_eq!(
            donation.expires_at - donation.created_at,
            chrono::Duration::seconds(9600)
        );
    }
}
