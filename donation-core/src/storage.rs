//! Storage layer using RocksDB
//!
//! # Column Families
//!
//! - `donors` - Donor profiles (key: donor id)
//! - `charities` - Charity profiles (key: charity id)
//! - `campaigns` - Campaigns (key: campaign id)
//! - `pending` - Pending reservations (key: memo, big-endian u64)
//! - `completed` - Completed donations (key: donation id)
//! - `reports` - Donation reports (key: report id)
//!
//! Pending and completed are disjoint partitions of donation records; the
//! `commit_completion` batch moves a record between them atomically together
//! with the aggregate updates it implies.

use crate::{
    config::Config,
    error::{Error, Result},
    types::{Campaign, CharityProfile, Donation, DonationReport, DonorProfile, Memo, PartyId},
};
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBCompactionStyle, IteratorMode, Options,
    WriteBatch, DB,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Column family names
const CF_DONORS: &str = "donors";
const CF_CHARITIES: &str = "charities";
const CF_CAMPAIGNS: &str = "campaigns";
const CF_PENDING: &str = "pending";
const CF_COMPLETED: &str = "completed";
const CF_REPORTS: &str = "reports";

/// Storage wrapper for RocksDB
pub struct Store {
    db: Arc<DB>,
}

impl Store {
    /// Open or create database
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        // Create directory if not exists
        std::fs::create_dir_all(path)?;

        // Database options
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        // Tuning from config
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_target_file_size_base(config.rocksdb.target_file_size_mb * 1024 * 1024);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        // Point-lookup heavy workload
        db_opts.set_compaction_style(DBCompactionStyle::Level);

        if config.rocksdb.enable_statistics {
            db_opts.enable_statistics();
        }

        // Column family descriptors
        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_DONORS, Self::cf_options_profiles()),
            ColumnFamilyDescriptor::new(CF_CHARITIES, Self::cf_options_profiles()),
            ColumnFamilyDescriptor::new(CF_CAMPAIGNS, Self::cf_options_profiles()),
            ColumnFamilyDescriptor::new(CF_PENDING, Self::cf_options_pending()),
            ColumnFamilyDescriptor::new(CF_COMPLETED, Self::cf_options_archive()),
            ColumnFamilyDescriptor::new(CF_REPORTS, Self::cf_options_archive()),
        ];

        // Open database
        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!("Opened RocksDB at {:?}", path);

        Ok(Self { db: Arc::new(db) })
    }

    // Column family options

    fn cf_options_profiles() -> Options {
        let mut opts = Options::default();
        // Profiles are read on every reservation, use LZ4 for speed
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf_options_pending() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        // Memo lookups benefit from bloom filters
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false); // 10 bits per key
        opts.set_block_based_table_factory(&block_opts);
        opts
    }

    fn cf_options_archive() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
        opts
    }

    // Helpers

    fn cf_handle(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", name)))
    }

    fn put_record<T: Serialize>(&self, cf_name: &str, key: &[u8], record: &T) -> Result<()> {
        let cf = self.cf_handle(cf_name)?;
        let value = bincode::serialize(record)?;
        self.db.put_cf(&cf, key, &value)?;
        Ok(())
    }

    fn get_record<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf_handle(cf_name)?;
        match self.db.get_cf(&cf, key)? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Remove a key; removing an absent key is a no-op
    fn remove_record(&self, cf_name: &str, key: &[u8]) -> Result<()> {
        let cf = self.cf_handle(cf_name)?;
        self.db.delete_cf(&cf, key)?;
        Ok(())
    }

    fn list_records<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf_handle(cf_name)?;
        let iter = self.db.iterator_cf(&cf, IteratorMode::Start);

        let mut records = Vec::new();
        for item in iter {
            let (_, value) = item?;
            records.push(bincode::deserialize(&value)?);
        }

        Ok(records)
    }

    // Donor operations

    /// Put donor profile
    pub fn put_donor(&self, donor: &DonorProfile) -> Result<()> {
        self.put_record(CF_DONORS, donor.id.as_str().as_bytes(), donor)?;
        tracing::debug!(donor = %donor.id, "Donor stored");
        Ok(())
    }

    /// Get donor profile by ID
    pub fn get_donor(&self, id: &PartyId) -> Result<DonorProfile> {
        self.try_get_donor(id)?
            .ok_or_else(|| Error::not_found("donor", id))
    }

    /// Get donor profile if present
    pub fn try_get_donor(&self, id: &PartyId) -> Result<Option<DonorProfile>> {
        self.get_record(CF_DONORS, id.as_str().as_bytes())
    }

    /// Remove donor profile (no-op if absent)
    pub fn remove_donor(&self, id: &PartyId) -> Result<()> {
        self.remove_record(CF_DONORS, id.as_str().as_bytes())
    }

    /// List all donor profiles
    pub fn list_donors(&self) -> Result<Vec<DonorProfile>> {
        self.list_records(CF_DONORS)
    }

    // Charity operations

    /// Put charity profile
    pub fn put_charity(&self, charity: &CharityProfile) -> Result<()> {
        self.put_record(CF_CHARITIES, charity.id.as_str().as_bytes(), charity)?;
        tracing::debug!(charity = %charity.id, "Charity stored");
        Ok(())
    }

    /// Get charity profile by ID
    pub fn get_charity(&self, id: &PartyId) -> Result<CharityProfile> {
        self.try_get_charity(id)?
            .ok_or_else(|| Error::not_found("charity", id))
    }

    /// Get charity profile if present
    pub fn try_get_charity(&self, id: &PartyId) -> Result<Option<CharityProfile>> {
        self.get_record(CF_CHARITIES, id.as_str().as_bytes())
    }

    /// Remove charity profile (no-op if absent)
    pub fn remove_charity(&self, id: &PartyId) -> Result<()> {
        self.remove_record(CF_CHARITIES, id.as_str().as_bytes())
    }

    /// List all charity profiles
    pub fn list_charities(&self) -> Result<Vec<CharityProfile>> {
        self.list_records(CF_CHARITIES)
    }

    // Campaign operations

    /// Put campaign
    pub fn put_campaign(&self, campaign: &Campaign) -> Result<()> {
        self.put_record(CF_CAMPAIGNS, campaign.id.as_str().as_bytes(), campaign)?;
        tracing::debug!(campaign = %campaign.id, "Campaign stored");
        Ok(())
    }

    /// Get campaign by ID
    pub fn get_campaign(&self, id: &PartyId) -> Result<Campaign> {
        self.try_get_campaign(id)?
            .ok_or_else(|| Error::not_found("campaign", id))
    }

    /// Get campaign if present
    pub fn try_get_campaign(&self, id: &PartyId) -> Result<Option<Campaign>> {
        self.get_record(CF_CAMPAIGNS, id.as_str().as_bytes())
    }

    /// Remove campaign (no-op if absent)
    pub fn remove_campaign(&self, id: &PartyId) -> Result<()> {
        self.remove_record(CF_CAMPAIGNS, id.as_str().as_bytes())
    }

    /// List all campaigns
    pub fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        self.list_records(CF_CAMPAIGNS)
    }

    // Pending reservation operations

    /// Put pending reservation, keyed by memo
    pub fn put_pending(&self, donation: &Donation) -> Result<()> {
        self.put_record(CF_PENDING, &donation.memo.to_be_bytes(), donation)?;
        tracing::debug!(
            memo = %donation.memo,
            donation_id = %donation.donation_id,
            "Pending reservation stored"
        );
        Ok(())
    }

    /// Get pending reservation by memo, if present
    pub fn try_get_pending(&self, memo: Memo) -> Result<Option<Donation>> {
        self.get_record(CF_PENDING, &memo.to_be_bytes())
    }

    /// Remove pending reservation (no-op if absent)
    pub fn remove_pending(&self, memo: Memo) -> Result<()> {
        self.remove_record(CF_PENDING, &memo.to_be_bytes())
    }

    /// List all pending reservations
    pub fn list_pending(&self) -> Result<Vec<Donation>> {
        self.list_records(CF_PENDING)
    }

    // Completed donation operations

    /// Put completed donation, keyed by donation ID
    pub fn put_completed(&self, donation: &Donation) -> Result<()> {
        self.put_record(CF_COMPLETED, donation.donation_id.as_bytes(), donation)
    }

    /// Get completed donation by ID
    pub fn get_completed(&self, donation_id: Uuid) -> Result<Donation> {
        self.get_record(CF_COMPLETED, donation_id.as_bytes())?
            .ok_or_else(|| Error::not_found("donation", donation_id))
    }

    /// List all completed donations
    pub fn list_completed(&self) -> Result<Vec<Donation>> {
        self.list_records(CF_COMPLETED)
    }

    // Report operations

    /// Put donation report
    pub fn put_report(&self, report: &DonationReport) -> Result<()> {
        self.put_record(CF_REPORTS, report.report_id.as_bytes(), report)
    }

    /// Get donation report by ID
    pub fn get_report(&self, report_id: Uuid) -> Result<DonationReport> {
        self.get_record(CF_REPORTS, report_id.as_bytes())?
            .ok_or_else(|| Error::not_found("report", report_id))
    }

    /// List all donation reports
    pub fn list_reports(&self) -> Result<Vec<DonationReport>> {
        self.list_records(CF_REPORTS)
    }

    // Batch operations (atomic)

    /// Commit a completed donation and its aggregate updates (atomic)
    ///
    /// Deletes the pending entry for the donation's memo and writes the
    /// completed record plus the updated donor, charity and campaign in a
    /// single batch. Either all of it becomes visible or none of it does.
    pub fn commit_completion(
        &self,
        completed: &Donation,
        donor: &DonorProfile,
        charity: &CharityProfile,
        campaign: &Campaign,
    ) -> Result<()> {
        let mut batch = WriteBatch::default();

        let cf_pending = self.cf_handle(CF_PENDING)?;
        batch.delete_cf(&cf_pending, completed.memo.to_be_bytes());

        let cf_completed = self.cf_handle(CF_COMPLETED)?;
        batch.put_cf(
            &cf_completed,
            completed.donation_id.as_bytes(),
            bincode::serialize(completed)?,
        );

        let cf_donors = self.cf_handle(CF_DONORS)?;
        batch.put_cf(
            &cf_donors,
            donor.id.as_str().as_bytes(),
            bincode::serialize(donor)?,
        );

        let cf_charities = self.cf_handle(CF_CHARITIES)?;
        batch.put_cf(
            &cf_charities,
            charity.id.as_str().as_bytes(),
            bincode::serialize(charity)?,
        );

        let cf_campaigns = self.cf_handle(CF_CAMPAIGNS)?;
        batch.put_cf(
            &cf_campaigns,
            campaign.id.as_str().as_bytes(),
            bincode::serialize(campaign)?,
        );

        // Atomic commit
        self.db.write(batch)?;

        tracing::debug!(
            memo = %completed.memo,
            donation_id = %completed.donation_id,
            "Completion committed"
        );

        Ok(())
    }

    // Statistics

    /// Get storage statistics
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            donors: self.approximate_count(CF_DONORS)?,
            charities: self.approximate_count(CF_CHARITIES)?,
            campaigns: self.approximate_count(CF_CAMPAIGNS)?,
            pending: self.approximate_count(CF_PENDING)?,
            completed: self.approximate_count(CF_COMPLETED)?,
        })
    }

    fn approximate_count(&self, cf_name: &str) -> Result<u64> {
        let cf = self.cf_handle(cf_name)?;

        // RocksDB property for approximate count
        let prop = self
            .db
            .property_int_value_cf(&cf, "rocksdb.estimate-num-keys")?
            .unwrap_or(0);

        Ok(prop)
    }

    /// Close database (graceful shutdown)
    pub fn close(self) -> Result<()> {
        drop(self.db);
        tracing::info!("RocksDB closed gracefully");
        Ok(())
    }
}

/// Storage statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Approximate donor count
    pub donors: u64,
    /// Approximate charity count
    pub charities: u64,
    /// Approximate campaign count
    pub campaigns: u64,
    /// Approximate pending reservation count
    pub pending: u64,
    /// Approximate completed donation count
    pub completed: u64,
}
