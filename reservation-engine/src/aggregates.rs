//! Side effects of a completed donation
//!
//! Applied to owned copies of the affected records; nothing is persisted
//! here. The caller commits all three together with the completed donation
//! in one atomic batch, so aggregates can never drift from the donation
//! table.

use chrono::{DateTime, Utc};
use donation_core::types::{Campaign, CharityProfile, Donation, DonorProfile};

/// Apply a completed donation to the donor, charity and campaign aggregates
pub fn apply_completion(
    donation: &Donation,
    mut donor: DonorProfile,
    mut charity: CharityProfile,
    mut campaign: Campaign,
    now: DateTime<Utc>,
) -> (DonorProfile, CharityProfile, Campaign) {
    donor.donation_amount += donation.amount;
    donor.donations_count += 1;
    donor.donations.push(donation.donation_id);
    donor.updated_at = now;

    charity.total_received += donation.amount;
    charity.donations_count += 1;
    charity.donations.push(donation.donation_id);
    charity.updated_at = now;

    campaign.total_received += donation.amount;

    (donor, charity, campaign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use donation_core::types::{
        CallerId, CampaignStatus, DonationStatus, Memo, PartyId, ProfileStatus,
    };
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn fixtures(amount: Decimal) -> (Donation, DonorProfile, CharityProfile, Campaign) {
        let now = Utc::now();
        let donation = Donation {
            donation_id: Uuid::now_v7(),
            donor_id: PartyId::new("donor-1"),
            charity_id: PartyId::new("charity-1"),
            campaign_id: PartyId::new("campaign-1"),
            payer: CallerId::new("alice"),
            payee: CallerId::new("water-org"),
            amount,
            status: DonationStatus::Completed,
            memo: Memo::new(42),
            created_at: now,
            expires_at: now,
            paid_at_block: Some(5),
        };
        let donor = DonorProfile {
            id: PartyId::new("donor-1"),
            owner: CallerId::new("alice"),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            donation_amount: Decimal::ZERO,
            donations: vec![],
            campaigns: vec![],
            donations_count: 0,
            status: ProfileStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let charity = CharityProfile {
            id: PartyId::new("charity-1"),
            owner: CallerId::new("water-org"),
            name: "Clean Water".to_string(),
            email: "info@water.example".to_string(),
            total_received: Decimal::ZERO,
            donations: vec![],
            donations_count: 0,
            status: ProfileStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let campaign = Campaign {
            id: PartyId::new("campaign-1"),
            charity_id: PartyId::new("charity-1"),
            title: "Wells".to_string(),
            target_amount: Decimal::new(10_000_00, 2),
            total_received: Decimal::ZERO,
            donors: vec![],
            status: CampaignStatus::Accepted,
            creator: CallerId::new("water-org"),
            created_at: now,
        };
        (donation, donor, charity, campaign)
    }

    #[test]
    fn test_apply_completion_updates_all_sides() {
        let amount = Decimal::new(100_00, 2);
        let (donation, donor, charity, campaign) = fixtures(amount);

        let (donor, charity, campaign) =
            apply_completion(&donation, donor, charity, campaign, Utc::now());

        assert_eq!(donor.donation_amount, amount);
        assert_eq!(donor.donations_count, 1);
        assert_eq!(donor.donations, vec![donation.donation_id]);

        assert_eq!(charity.total_received, amount);
        assert_eq!(charity.donations_count, 1);
        assert_eq!(charity.donations, vec![donation.donation_id]);

        assert_eq!(campaign.total_received, amount);
    }

    proptest! {
        #[test]
        fn prop_totals_grow_by_exactly_the_amount(
            cents in 1u64..1_000_000_00u64,
            prior_cents in 0u64..1_000_000_00u64,
        ) {
            let amount = Decimal::new(cents as i64, 2);
            let prior = Decimal::new(prior_cents as i64, 2);
            let (donation, mut donor, mut charity, mut campaign) = fixtures(amount);
            donor.donation_amount = prior;
            charity.total_received = prior;
            campaign.total_received = prior;

            let (donor, charity, campaign) =
                apply_completion(&donation, donor, charity, campaign, Utc::now());

            prop_assert_eq!(donor.donation_amount, prior + amount);
            prop_assert_eq!(charity.total_received, prior + amount);
            prop_assert_eq!(campaign.total_received, prior + amount);
        }
    }
}
