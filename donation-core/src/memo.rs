//! Correlation memo derivation
//!
//! A memo ties a pending reservation to the off-band ledger transfer that
//! pays for it: the donor quotes the memo in the transfer, and verification
//! matches on it. Derivation is a pure function of donor, caller and time;
//! uniqueness is probabilistic, carried by the time component changing
//! between calls.

use crate::types::{CallerId, Memo, PartyId};

// Field separator keeps ("ab", "c") and ("a", "bc") from colliding.
const SEP: [u8; 1] = [0x1f];

/// Derive the correlation memo for a reservation
pub fn derive_memo(donor_id: &PartyId, caller: &CallerId, now_nanos: i64) -> Memo {
    let mut hasher = blake3::Hasher::new();
    hasher.update(donor_id.as_str().as_bytes());
    hasher.update(&SEP);
    hasher.update(caller.as_str().as_bytes());
    hasher.update(&SEP);
    hasher.update(&now_nanos.to_le_bytes());

    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[..8]
        .try_into()
        .expect("hash is 32 bytes");

    Memo::new(u64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_memo_is_deterministic() {
        let donor = PartyId::new("donor-1");
        let caller = CallerId::new("alice");

        let a = derive_memo(&donor, &caller, 1_700_000_000_000_000_000);
        let b = derive_memo(&donor, &caller, 1_700_000_000_000_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_memo_varies_with_inputs() {
        let donor = PartyId::new("donor-1");
        let caller = CallerId::new("alice");
        let base = derive_memo(&donor, &caller, 1);

        assert_ne!(base, derive_memo(&donor, &caller, 2));
        assert_ne!(base, derive_memo(&donor, &CallerId::new("bob"), 1));
        assert_ne!(base, derive_memo(&PartyId::new("donor-2"), &caller, 1));
    }

    #[test]
    fn test_memo_field_boundaries() {
        // ("ab", "c") and ("a", "bc") must not produce the same token
        let a = derive_memo(&PartyId::new("ab"), &CallerId::new("c"), 0);
        let b = derive_memo(&PartyId::new("a"), &CallerId::new("bc"), 0);
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn prop_memo_deterministic(donor in "[a-z0-9-]{1,24}", caller in "[a-z0-9-]{1,24}", nanos in 0i64..i64::MAX) {
            let donor = PartyId::new(donor);
            let caller = CallerId::new(caller);
            prop_assert_eq!(
                derive_memo(&donor, &caller, nanos),
                derive_memo(&donor, &caller, nanos)
            );
        }
    }
}
