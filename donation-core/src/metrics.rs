//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for the reservation protocol.
//!
//! # Metrics
//!
//! - `donation_reservations_total` - Reservations created
//! - `donation_reservations_expired_total` - Reservations expired unclaimed
//! - `donation_completions_total` - Donations completed after verification
//! - `donation_verification_failures_total` - Ledger verification mismatches
//! - `donation_pending_reservations` - Currently pending reservations

use prometheus::{IntCounter, IntGauge, Registry};
use std::sync::Arc;

/// Metrics collector
///
/// Counters are registered against an owned registry rather than the
/// process-global default, so independent instances never collide.
#[derive(Clone)]
pub struct Metrics {
    /// Reservations created
    pub reservations_total: IntCounter,

    /// Reservations expired unclaimed
    pub reservations_expired_total: IntCounter,

    /// Donations completed after verification
    pub completions_total: IntCounter,

    /// Ledger verification mismatches
    pub verification_failures_total: IntCounter,

    /// Currently pending reservations
    pub pending_reservations: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let reservations_total = IntCounter::new(
            "donation_reservations_total",
            "Reservations created",
        )?;
        registry.register(Box::new(reservations_total.clone()))?;

        let reservations_expired_total = IntCounter::new(
            "donation_reservations_expired_total",
            "Reservations expired unclaimed",
        )?;
        registry.register(Box::new(reservations_expired_total.clone()))?;

        let completions_total = IntCounter::new(
            "donation_completions_total",
            "Donations completed after verification",
        )?;
        registry.register(Box::new(completions_total.clone()))?;

        let verification_failures_total = IntCounter::new(
            "donation_verification_failures_total",
            "Ledger verification mismatches",
        )?;
        registry.register(Box::new(verification_failures_total.clone()))?;

        let pending_reservations = IntGauge::new(
            "donation_pending_reservations",
            "Currently pending reservations",
        )?;
        registry.register(Box::new(pending_reservations.clone()))?;

        Ok(Self {
            reservations_total,
            reservations_expired_total,
            completions_total,
            verification_failures_total,
            pending_reservations,
            registry,
        })
    }

    /// Record reservation creation
    pub fn record_reservation(&self) {
        self.reservations_total.inc();
        self.pending_reservations.inc();
    }

    /// Record reservation expiry
    pub fn record_reservation_expired(&self) {
        self.reservations_expired_total.inc();
        self.pending_reservations.dec();
    }

    /// Record donation completion
    pub fn record_completion(&self) {
        self.completions_total.inc();
        self.pending_reservations.dec();
    }

    /// Record verification failure
    pub fn record_verification_failure(&self) {
        self.verification_failures_total.inc();
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.reservations_total.get(), 0);
        assert_eq!(metrics.pending_reservations.get(), 0);
    }

    #[test]
    fn test_independent_instances() {
        // Registry-scoped metrics never collide across instances
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();

        a.record_reservation();
        assert_eq!(a.reservations_total.get(), 1);
        assert_eq!(b.reservations_total.get(), 0);
    }

    #[test]
    fn test_pending_gauge_tracks_lifecycle() {
        let metrics = Metrics::new().unwrap();

        metrics.record_reservation();
        metrics.record_reservation();
        assert_eq!(metrics.pending_reservations.get(), 2);

        metrics.record_completion();
        assert_eq!(metrics.pending_reservations.get(), 1);
        assert_eq!(metrics.completions_total.get(), 1);

        metrics.record_reservation_expired();
        assert_eq!(metrics.pending_reservations.get(), 0);
        assert_eq!(metrics.reservations_expired_total.get(), 1);
    }
}
