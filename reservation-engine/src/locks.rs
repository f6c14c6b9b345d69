//! Per-memo mutual exclusion
//!
//! Completion and expiry both target the pending entry for a memo. The
//! check-verify-remove-commit sequence in completion suspends at the ledger
//! call, so without a lock a concurrent attempt (or the expiry callback)
//! could interleave with it and break at-most-once completion. Each memo
//! gets its own async mutex; operations on different memos never contend.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Registry of per-memo async locks
#[derive(Clone, Default)]
pub struct MemoLocks {
    inner: Arc<DashMap<u64, Arc<Mutex<()>>>>,
}

impl MemoLocks {
    /// Create an empty lock registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the lock for a memo
    pub fn lock_for(&self, memo: u64) -> Arc<Mutex<()>> {
        self.inner
            .entry(memo)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry if no task holds or awaits it
    ///
    /// The strong-count check runs under the map shard lock, so it cannot
    /// race a concurrent `lock_for` on the same memo.
    pub fn evict(&self, memo: u64) {
        self.inner
            .remove_if(&memo, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Number of live lock entries
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check for an empty registry
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_memo_same_lock() {
        let locks = MemoLocks::new();

        let a = locks.lock_for(42);
        let b = locks.lock_for(42);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn test_evict_only_when_unheld() {
        let locks = MemoLocks::new();

        let held = locks.lock_for(42);
        locks.evict(42);
        // Still held outside the map, entry survives
        assert_eq!(locks.len(), 1);

        drop(held);
        locks.evict(42);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_lock_serializes_critical_section() {
        let locks = MemoLocks::new();

        let lock = locks.lock_for(7);
        let guard = lock.lock().await;

        // Second attempt on the same memo must not acquire
        let other = locks.lock_for(7);
        assert!(other.try_lock().is_err());

        drop(guard);
        assert!(other.try_lock().is_ok());
    }
}
