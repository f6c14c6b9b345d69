//! Core entity types for the donation platform
//!
//! All types are designed for:
//! - Deterministic serialization (bincode)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (Decimal for money)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier for donors, charities and campaigns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyId(String);

impl PartyId {
    /// Create new party ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check for an empty identifier
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ambient caller identity, supplied and trusted by the embedding service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerId(String);

impl CallerId {
    /// Create new caller ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation token linking a reservation to an off-band ledger transfer
///
/// Primary key of the pending table; the same value travels in the memo
/// field of the matching ledger transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Memo(u64);

impl Memo {
    /// Create from raw value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw token value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Big-endian storage key bytes
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Profile lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileStatus {
    /// Profile in good standing
    Active,
    /// Profile deactivated by its owner
    Inactive,
    /// Profile suspended by the operator
    Suspended,
}

/// Donor profile with donation aggregates
///
/// Contact fields are owner-writable; the aggregate fields
/// (`donation_amount`, `donations`, `donations_count`) change only as the
/// side effect of a committed donation completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorProfile {
    /// Donor identifier (storage key)
    pub id: PartyId,

    /// Owning caller identity
    pub owner: CallerId,

    /// Display name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Cumulative amount donated across completed donations
    pub donation_amount: Decimal,

    /// Completed donation IDs
    pub donations: Vec<Uuid>,

    /// Campaigns this donor has accepted
    pub campaigns: Vec<PartyId>,

    /// Number of completed donations
    pub donations_count: u64,

    /// Lifecycle status
    pub status: ProfileStatus,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// Charity profile with receipt aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharityProfile {
    /// Charity identifier (storage key)
    pub id: PartyId,

    /// Owning caller identity
    pub owner: CallerId,

    /// Display name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Cumulative amount received across completed donations
    pub total_received: Decimal,

    /// Completed donation IDs
    pub donations: Vec<Uuid>,

    /// Number of completed donations
    pub donations_count: u64,

    /// Lifecycle status
    pub status: ProfileStatus,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// Campaign status (mutually exclusive states)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignStatus {
    /// Initial state, awaiting first donor acceptance
    Pending,
    /// Open for donations
    Active,
    /// At least one donor has accepted
    Accepted,
    /// Closed by its creator (terminal)
    Completed,
    /// Cancelled by its creator (terminal)
    Cancelled,
}

impl CampaignStatus {
    /// Check if campaign is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, CampaignStatus::Completed | CampaignStatus::Cancelled)
    }
}

/// Fundraising campaign owned by a charity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    /// Campaign identifier (storage key)
    pub id: PartyId,

    /// Owning charity
    pub charity_id: PartyId,

    /// Campaign title
    pub title: String,

    /// Fundraising target
    pub target_amount: Decimal,

    /// Cumulative amount received across completed donations
    pub total_received: Decimal,

    /// Donors who accepted this campaign
    pub donors: Vec<PartyId>,

    /// Current status
    pub status: CampaignStatus,

    /// Creator identity; donations to this campaign are payable to it
    pub creator: CallerId,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

/// Donation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonationStatus {
    /// Reserved, awaiting off-band payment and verification
    PaymentPending,
    /// Payment verified against the ledger (terminal)
    Completed,
}

/// A donation record
///
/// Lives in the pending table (keyed by memo) while payment is outstanding,
/// and moves to the completed table (keyed by donation ID) exactly once,
/// after ledger verification succeeds. Never moves back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    /// Unique donation ID (UUIDv7 for time-ordering)
    pub donation_id: Uuid,

    /// Donating donor
    pub donor_id: PartyId,

    /// Receiving charity
    pub charity_id: PartyId,

    /// Target campaign
    pub campaign_id: PartyId,

    /// Paying identity (the donor's owner)
    pub payer: CallerId,

    /// Paid identity (the campaign's creator)
    pub payee: CallerId,

    /// Reserved amount; the ledger transfer must match it exactly
    pub amount: Decimal,

    /// Current status
    pub status: DonationStatus,

    /// Correlation token (pending-table key)
    pub memo: Memo,

    /// Reservation timestamp
    pub created_at: DateTime<Utc>,

    /// End of the payment window
    pub expires_at: DateTime<Utc>,

    /// Ledger block the payment was verified at (None until completed)
    pub paid_at_block: Option<u64>,
}

impl Donation {
    /// Check whether the payment window has closed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Transition to the completed state with the verified block index
    pub fn into_completed(mut self, block_index: u64) -> Self {
        self.status = DonationStatus::Completed;
        self.paid_at_block = Some(block_index);
        self
    }
}

/// Denormalized donation report record
///
/// Pure record combining donor, charity, campaign and amount; created
/// independently of the reservation lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationReport {
    /// Report identifier (storage key)
    pub report_id: Uuid,

    /// Reported donor
    pub donor_id: PartyId,

    /// Reported charity
    pub charity_id: PartyId,

    /// Reported campaign
    pub campaign_id: PartyId,

    /// Reported amount
    pub amount: Decimal,

    /// Donation status at report time
    pub status: DonationStatus,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_party_id_empty() {
        assert!(PartyId::new("").is_empty());
        assert!(!PartyId::new("donor-1").is_empty());
    }

    #[test]
    fn test_memo_key_bytes() {
        let memo = Memo::new(0x0102_0304_0506_0708);
        assert_eq!(memo.to_be_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(memo.value(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn test_campaign_status_terminal() {
        assert!(!CampaignStatus::Pending.is_terminal());
        assert!(!CampaignStatus::Active.is_terminal());
        assert!(!CampaignStatus::Accepted.is_terminal());
        assert!(CampaignStatus::Completed.is_terminal());
        assert!(CampaignStatus::Cancelled.is_terminal());
    }

    fn test_donation(now: DateTime<Utc>) -> Donation {
        Donation {
            donation_id: Uuid::now_v7(),
            donor_id: PartyId::new("donor-1"),
            charity_id: PartyId::new("charity-1"),
            campaign_id: PartyId::new("campaign-1"),
            payer: CallerId::new("alice"),
            payee: CallerId::new("bob"),
            amount: Decimal::new(100_00, 2),
            status: DonationStatus::PaymentPending,
            memo: Memo::new(42),
            created_at: now,
            expires_at: now + Duration::seconds(9600),
            paid_at_block: None,
        }
    }

    #[test]
    fn test_donation_expiry_window() {
        let now = Utc::now();
        let donation = test_donation(now);

        assert!(!donation.is_expired(now));
        assert!(!donation.is_expired(now + Duration::seconds(9599)));
        assert!(donation.is_expired(now + Duration::seconds(9600)));
    }

    #[test]
    fn test_donation_into_completed() {
        let donation = test_donation(Utc::now());
        let memo = donation.memo;

        let completed = donation.into_completed(7);
        assert_eq!(completed.status, DonationStatus::Completed);
        assert_eq!(completed.paid_at_block, Some(7));
        assert_eq!(completed.memo, memo);
    }
}
