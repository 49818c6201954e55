//! Storage add-on prices
//!
//! Block storage is priced per GB-month in its own feeds, shaped differently
//! from the instance feeds:
//!
//! - EBS: `regions[*].types[*]`, one type per volume family, price at `values[0].prices.USD`
//! - RDS gp2: `regions[*].rates[0].prices.USD`
//! - RDS PIOPS: `regions[*].rates[*]` tagged `storageRate` / `piopsRate`
//!
//! A region missing from a feed, or an unparsable price, gives `None`.

use crate::builder::parse_amount;
use crate::error::Result;
use crate::feed::{find_region, parse_feed, scalar_text};
use serde::Serialize;
use serde_json::Value;

/// Volume family name of gp2 in the EBS feed
pub const EBS_GP2_TYPE: &str = "Amazon EBS General Purpose (SSD) volumes";

const PIOPS_STORAGE_RATE: &str = "storageRate";
const PIOPS_IO_RATE: &str = "piopsRate";

/// RDS provisioned IOPS prices: per GB-month of storage and per IOPS-month.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PiopsPricing {
    pub storage_per_gb_month: Option<f64>,
    pub io_per_iops_month: Option<f64>,
}

fn usd_price(holder: &Value) -> Option<f64> {
    let raw = scalar_text(holder.get("prices")?.get("USD")?)?;
    parse_amount(&raw)
}

/// EC2 gp2 volume price per GB-month from the EBS feed.
pub fn ebs_gp2_price(feed_text: &str, region: &str) -> Result<Option<f64>> {
    let doc = parse_feed(feed_text)?;
    let Some(region_entry) = find_region(&doc, region)? else {
        return Ok(None);
    };

    Ok(region_entry
        .get("types")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|t| t.get("name").and_then(Value::as_str) == Some(EBS_GP2_TYPE))
        .filter_map(|t| t.get("values")?.as_array()?.first())
        .filter_map(usd_price)
        .last())
}

/// RDS gp2 storage price per GB-month.
pub fn rds_gp2_price(feed_text: &str, region: &str) -> Result<Option<f64>> {
    let doc = parse_feed(feed_text)?;
    let Some(region_entry) = find_region(&doc, region)? else {
        return Ok(None);
    };

    Ok(region_entry
        .get("rates")
        .and_then(Value::as_array)
        .and_then(|rates| rates.first())
        .and_then(usd_price))
}

/// RDS provisioned IOPS storage and IO prices.
pub fn rds_piops_price(feed_text: &str, region: &str) -> Result<PiopsPricing> {
    let doc = parse_feed(feed_text)?;
    let mut pricing = PiopsPricing::default();
    let Some(region_entry) = find_region(&doc, region)? else {
        return Ok(pricing);
    };

    let rates = region_entry
        .get("rates")
        .and_then(Value::as_array)
        .into_iter()
        .flatten();
    for rate in rates {
        match rate.get("type").and_then(Value::as_str) {
            Some(PIOPS_STORAGE_RATE) => pricing.storage_per_gb_month = usd_price(rate),
            Some(PIOPS_IO_RATE) => pricing.io_per_iops_month = usd_price(rate),
            _ => {}
        }
    }
    Ok(pricing)
}
