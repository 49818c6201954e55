//! Price record construction
//!
//! Turns one raw feed entry into a `PriceRecord`. The size name is the only
//! mandatory field; every other value is parsed tolerantly and left unset when
//! the feed carries a placeholder ("N/A", "Variable", empty string, ...).

use crate::error::{PricingError, Result};
use crate::feed::RawSizeEntry;
use crate::types::{PriceRecord, ServiceKind};

pub const HOURS_PER_DAY: f64 = 24.0;
pub const DAYS_PER_MONTH: f64 = 30.0;

// Slack for f64 products like 0.29 * 24 * 100 = 695.99999...
const CENT_EPSILON: f64 = 1e-6;

/// Derive (per-day, per-month) prices from an hourly price.
///
/// Both are truncated to cents, not rounded, which is how the provider
/// displays day and month prices. A month is 30 days.
pub fn derive_prices(price_per_hour: f64) -> (f64, f64) {
    let day = truncate_cents(price_per_hour * HOURS_PER_DAY);
    let month = truncate_cents(price_per_hour * HOURS_PER_DAY * DAYS_PER_MONTH);
    (day, month)
}

fn truncate_cents(amount: f64) -> f64 {
    ((amount * 100.0) + CENT_EPSILON).floor() / 100.0
}

/// Parse an integer field, tolerating surrounding whitespace.
pub fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

/// Parse a float field. Non-finite values count as unparsable.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Build a `PriceRecord` from one raw feed entry.
///
/// The name is kept verbatim since merging matches it exactly.
pub fn build(entry: &RawSizeEntry, service: ServiceKind) -> Result<PriceRecord> {
    let name_key = service.name_key();
    let name = entry
        .text(name_key)
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| PricingError::MissingField {
            field: name_key.to_string(),
            context: format!("{} entry", service),
        })?;

    let mut record = PriceRecord {
        name,
        ..Default::default()
    };

    match service.engine_label() {
        Some(label) => record.os_or_engine_label = Some(label.to_string()),
        None => {
            record.vcpu_count = entry.text("vCPU").as_deref().and_then(parse_count);
            record.compute_units = entry.text("ECU");
            record.memory_gib = entry.text("memoryGiB").as_deref().and_then(parse_amount);
            record.storage_gb = entry.text("storageGB");
            record.os_or_engine_label = entry
                .first_value_column()
                .and_then(|column| column.get("name"))
                .and_then(|name| name.as_str())
                .map(str::to_string);
        }
    }

    if let Some(hourly) = entry.usd_price().as_deref().and_then(parse_amount) {
        let (daily, monthly) = derive_prices(hourly);
        record.price_per_hour = Some(hourly);
        record.price_per_day = Some(daily);
        record.price_per_month = Some(monthly);
    }

    Ok(record)
}
