//! Profile and campaign registry
//!
//! Thin keyed-CRUD layer over the store: donor/charity registration,
//! campaign lifecycle, and denormalized donation reports. Contact fields
//! are owner-writable; aggregate fields only change through donation
//! completion.
//!
//! Campaign state machine:
//!
//! ```text
//! Pending ──accept──> Accepted ──complete──> Completed
//!    │                    │
//!    └───────cancel───────┴──────> Cancelled
//! ```

use crate::{
    error::{Error, Result},
    storage::Store,
    types::{
        CallerId, Campaign, CampaignStatus, CharityProfile, DonationReport, DonationStatus,
        DonorProfile, PartyId, ProfileStatus,
    },
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Registry over donor, charity, campaign and report tables
#[derive(Clone)]
pub struct Registry {
    store: Arc<Store>,
}

impl Registry {
    /// Create registry over a store
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    // Donor operations

    /// Register a new donor profile owned by the caller
    pub fn register_donor(
        &self,
        caller: &CallerId,
        id: &PartyId,
        name: &str,
        email: &str,
    ) -> Result<DonorProfile> {
        if id.is_empty() || name.is_empty() {
            return Err(Error::InvalidPayload(
                "donor id and name are required".to_string(),
            ));
        }
        if self.store.try_get_donor(id)?.is_some() {
            return Err(Error::InvalidPayload(format!(
                "donor {} already registered",
                id
            )));
        }

        let now = Utc::now();
        let donor = DonorProfile {
            id: id.clone(),
            owner: caller.clone(),
            name: name.to_string(),
            email: email.to_string(),
            donation_amount: Decimal::ZERO,
            donations: vec![],
            campaigns: vec![],
            donations_count: 0,
            status: ProfileStatus::Active,
            created_at: now,
            updated_at: now,
        };

        self.store.put_donor(&donor)?;
        tracing::info!(donor = %id, owner = %caller, "Donor registered");

        Ok(donor)
    }

    /// Update a donor's contact fields (owner only)
    pub fn update_donor_contact(
        &self,
        caller: &CallerId,
        id: &PartyId,
        name: &str,
        email: &str,
    ) -> Result<DonorProfile> {
        let mut donor = self.store.get_donor(id)?;

        if &donor.owner != caller {
            return Err(Error::Unauthorized(format!(
                "caller does not own donor {}",
                id
            )));
        }

        donor.name = name.to_string();
        donor.email = email.to_string();
        donor.updated_at = Utc::now();
        self.store.put_donor(&donor)?;

        Ok(donor)
    }

    /// Get donor profile
    pub fn get_donor(&self, id: &PartyId) -> Result<DonorProfile> {
        self.store.get_donor(id)
    }

    // Charity operations

    /// Register a new charity profile owned by the caller
    pub fn register_charity(
        &self,
        caller: &CallerId,
        id: &PartyId,
        name: &str,
        email: &str,
    ) -> Result<CharityProfile> {
        if id.is_empty() || name.is_empty() {
            return Err(Error::InvalidPayload(
                "charity id and name are required".to_string(),
            ));
        }
        if self.store.try_get_charity(id)?.is_some() {
            return Err(Error::InvalidPayload(format!(
                "charity {} already registered",
                id
            )));
        }

        let now = Utc::now();
        let charity = CharityProfile {
            id: id.clone(),
            owner: caller.clone(),
            name: name.to_string(),
            email: email.to_string(),
            total_received: Decimal::ZERO,
            donations: vec![],
            donations_count: 0,
            status: ProfileStatus::Active,
            created_at: now,
            updated_at: now,
        };

        self.store.put_charity(&charity)?;
        tracing::info!(charity = %id, owner = %caller, "Charity registered");

        Ok(charity)
    }

    /// Update a charity's contact fields (owner only)
    pub fn update_charity_contact(
        &self,
        caller: &CallerId,
        id: &PartyId,
        name: &str,
        email: &str,
    ) -> Result<CharityProfile> {
        let mut charity = self.store.get_charity(id)?;

        if &charity.owner != caller {
            return Err(Error::Unauthorized(format!(
                "caller does not own charity {}",
                id
            )));
        }

        charity.name = name.to_string();
        charity.email = email.to_string();
        charity.updated_at = Utc::now();
        self.store.put_charity(&charity)?;

        Ok(charity)
    }

    /// Get charity profile
    pub fn get_charity(&self, id: &PartyId) -> Result<CharityProfile> {
        self.store.get_charity(id)
    }

    // Campaign operations

    /// Create a campaign for an existing charity
    pub fn create_campaign(
        &self,
        caller: &CallerId,
        id: &PartyId,
        charity_id: &PartyId,
        title: &str,
        target_amount: Decimal,
    ) -> Result<Campaign> {
        if id.is_empty() || title.is_empty() {
            return Err(Error::InvalidPayload(
                "campaign id and title are required".to_string(),
            ));
        }
        // Campaign must reference an existing charity
        self.store.get_charity(charity_id)?;

        if self.store.try_get_campaign(id)?.is_some() {
            return Err(Error::InvalidPayload(format!(
                "campaign {} already exists",
                id
            )));
        }

        let campaign = Campaign {
            id: id.clone(),
            charity_id: charity_id.clone(),
            title: title.to_string(),
            target_amount,
            total_received: Decimal::ZERO,
            donors: vec![],
            status: CampaignStatus::Pending,
            creator: caller.clone(),
            created_at: Utc::now(),
        };

        self.store.put_campaign(&campaign)?;
        tracing::info!(campaign = %id, charity = %charity_id, "Campaign created");

        Ok(campaign)
    }

    /// Accept a campaign on behalf of a donor
    ///
    /// Appends the donor to the campaign's donor list and the campaign to
    /// the donor's campaign list, then marks the campaign Accepted. Repeat
    /// acceptance by the same donor is idempotent.
    pub fn accept_campaign(
        &self,
        caller: &CallerId,
        campaign_id: &PartyId,
        donor_id: &PartyId,
    ) -> Result<Campaign> {
        let mut campaign = self.store.get_campaign(campaign_id)?;

        if campaign.status.is_terminal() {
            return Err(Error::InvalidTransition(format!(
                "campaign {} is {:?}",
                campaign_id, campaign.status
            )));
        }

        let mut donor = self.store.get_donor(donor_id)?;
        if &donor.owner != caller {
            return Err(Error::Unauthorized(format!(
                "caller does not own donor {}",
                donor_id
            )));
        }

        if !campaign.donors.contains(donor_id) {
            campaign.donors.push(donor_id.clone());
        }
        if !donor.campaigns.contains(campaign_id) {
            donor.campaigns.push(campaign_id.clone());
            donor.updated_at = Utc::now();
        }
        campaign.status = CampaignStatus::Accepted;

        self.store.put_campaign(&campaign)?;
        self.store.put_donor(&donor)?;
        tracing::info!(campaign = %campaign_id, donor = %donor_id, "Campaign accepted");

        Ok(campaign)
    }

    /// Mark a campaign completed (creator only)
    ///
    /// No precondition on the target amount being reached.
    pub fn complete_campaign(&self, caller: &CallerId, campaign_id: &PartyId) -> Result<Campaign> {
        self.transition_campaign(caller, campaign_id, CampaignStatus::Completed)
    }

    /// Cancel a campaign (creator only, from any non-terminal state)
    pub fn cancel_campaign(&self, caller: &CallerId, campaign_id: &PartyId) -> Result<Campaign> {
        self.transition_campaign(caller, campaign_id, CampaignStatus::Cancelled)
    }

    fn transition_campaign(
        &self,
        caller: &CallerId,
        campaign_id: &PartyId,
        target: CampaignStatus,
    ) -> Result<Campaign> {
        let mut campaign = self.store.get_campaign(campaign_id)?;

        if &campaign.creator != caller {
            return Err(Error::Unauthorized(format!(
                "caller did not create campaign {}",
                campaign_id
            )));
        }
        if campaign.status.is_terminal() {
            return Err(Error::InvalidTransition(format!(
                "campaign {} is {:?}",
                campaign_id, campaign.status
            )));
        }

        campaign.status = target;
        self.store.put_campaign(&campaign)?;
        tracing::info!(campaign = %campaign_id, status = ?target, "Campaign transitioned");

        Ok(campaign)
    }

    /// Get campaign
    pub fn get_campaign(&self, id: &PartyId) -> Result<Campaign> {
        self.store.get_campaign(id)
    }

    // Report operations

    /// Create a donation report record
    pub fn create_report(
        &self,
        donor_id: &PartyId,
        charity_id: &PartyId,
        campaign_id: &PartyId,
        amount: Decimal,
        status: DonationStatus,
    ) -> Result<DonationReport> {
        if donor_id.is_empty() || charity_id.is_empty() || campaign_id.is_empty() {
            return Err(Error::InvalidPayload(
                "donor, charity and campaign ids are required".to_string(),
            ));
        }

        let report = DonationReport {
            report_id: Uuid::new_v4(),
            donor_id: donor_id.clone(),
            charity_id: charity_id.clone(),
            campaign_id: campaign_id.clone(),
            amount,
            status,
            created_at: Utc::now(),
        };

        self.store.put_report(&report)?;

        Ok(report)
    }

    /// Get donation report by ID
    pub fn get_report(&self, report_id: Uuid) -> Result<DonationReport> {
        self.store.get_report(report_id)
    }

    /// List all donation reports
    pub fn list_reports(&self) -> Result<Vec<DonationReport>> {
        self.store.list_reports()
    }
}
