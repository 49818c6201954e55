//! Pricing queries
//!
//! `PricingClient` runs one query end to end:
//! fetch feed -> extract region entries -> build price records -> merge specs.
//!
//! The fetcher and the specification loader are injected so the pipeline can
//! run against fixed data. Each call builds a fresh `InstanceTypes`; nothing is
//! cached between calls.
//!
//! Only a failed fetch or an unparsable feed fails a query. Entries without a
//! name are logged and skipped.

use crate::builder;
use crate::config::{Config, FeedEndpoints};
use crate::error::Result;
use crate::feed;
use crate::fetch::{FeedFetcher, HttpFetcher};
use crate::merge::merge;
use crate::spec_table::{FileSpecLoader, SpecLoader};
use crate::storage::{self, PiopsPricing};
use crate::types::{InstanceTypes, PriceRecord, ServiceKind};
use tracing::{info, warn};

pub struct PricingClient<F, S> {
    fetcher: F,
    specs: S,
    feeds: FeedEndpoints,
}

impl PricingClient<HttpFetcher, FileSpecLoader> {
    /// Client backed by HTTP and the spec directory from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            HttpFetcher::new(&config.http)?,
            FileSpecLoader::new(&config.spec.dir),
            config.feeds.clone(),
        ))
    }
}

impl<F: FeedFetcher, S: SpecLoader> PricingClient<F, S> {
    pub fn new(fetcher: F, specs: S, feeds: FeedEndpoints) -> Self {
        Self {
            fetcher,
            specs,
            feeds,
        }
    }

    /// EC2 on-demand pricing for a region.
    pub fn compute_pricing(&self, region: &str) -> Result<InstanceTypes> {
        self.instance_pricing(ServiceKind::Compute, region)
    }

    /// RDS (MySQL) pricing for a region.
    pub fn relational_database_pricing(&self, region: &str) -> Result<InstanceTypes> {
        self.instance_pricing(ServiceKind::RelationalDatabase, region)
    }

    /// ElastiCache (Redis) pricing for a region.
    pub fn in_memory_cache_pricing(&self, region: &str) -> Result<InstanceTypes> {
        self.instance_pricing(ServiceKind::InMemoryCache, region)
    }

    /// Pricing for any service, merged with its specification table.
    pub fn instance_pricing(&self, service: ServiceKind, region: &str) -> Result<InstanceTypes> {
        let body = self.fetcher.fetch(self.feeds.for_service(service))?;
        let entries = feed::extract(&body, region, service)?;
        let prices = build_records(&entries, service);
        let specs = self.specs.load(service);

        let result = merge(prices, &specs);
        info!(
            "{} pricing for {}: {} sizes ({} specification entries)",
            service,
            region,
            result.len(),
            specs.len()
        );
        Ok(result)
    }

    /// EC2 gp2 volume price per GB-month.
    pub fn ec2_gp2_storage_price(&self, region: &str) -> Result<Option<f64>> {
        let body = self.fetcher.fetch(&self.feeds.ec2_ebs)?;
        storage::ebs_gp2_price(&body, region)
    }

    /// RDS gp2 storage price per GB-month.
    pub fn rds_gp2_storage_price(&self, region: &str) -> Result<Option<f64>> {
        let body = self.fetcher.fetch(&self.feeds.rds_gp2)?;
        storage::rds_gp2_price(&body, region)
    }

    /// RDS provisioned IOPS storage and IO prices.
    pub fn rds_piops_pricing(&self, region: &str) -> Result<PiopsPricing> {
        let body = self.fetcher.fetch(&self.feeds.rds_piops)?;
        storage::rds_piops_price(&body, region)
    }
}

/// Build price records, skipping entries that have no name.
pub fn build_records(entries: &[feed::RawSizeEntry], service: ServiceKind) -> Vec<PriceRecord> {
    entries
        .iter()
        .filter_map(|entry| match builder::build(entry, service) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping feed entry: {}", e);
                None
            }
        })
        .collect()
}
