//! Price/specification reconciliation
//!
//! Combines the live price records of one (service, region) query with the
//! static specification table into `InstanceTypes`.
//!
//! Rules:
//! - price records are keyed by name; a later duplicate replaces an earlier one
//! - specification records only enrich existing entries, they never add new ones
//! - where both sources carry `vcpu_count` or `memory_gib`, the table wins
//!
//! The merge never fails. Malformed table rows are already filtered out by the
//! specification loader, so every `SpecRecord` here is well-typed.

use crate::types::{InstanceType, InstanceTypes, PriceRecord, SpecRecord};
use tracing::debug;

/// Merge price records with specification records.
pub fn merge<P>(prices: P, specs: &[SpecRecord]) -> InstanceTypes
where
    P: IntoIterator<Item = PriceRecord>,
{
    let mut result = InstanceTypes::new();

    for record in prices {
        if let Some(previous) = result.insert(record.name.clone(), InstanceType::from(record)) {
            debug!("Duplicate size {} in feed, keeping the later entry", previous.name);
        }
    }

    let mut unmatched = 0usize;
    for spec in specs {
        match result.get_mut(&spec.size) {
            Some(instance) => instance.apply_spec(spec),
            None => unmatched += 1,
        }
    }

    if unmatched > 0 {
        debug!(
            "{} specification entries had no priced size and were ignored",
            unmatched
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(name: &str, hourly: f64) -> PriceRecord {
        PriceRecord {
            name: name.to_string(),
            price_per_hour: Some(hourly),
            ..Default::default()
        }
    }

    fn spec(size: &str, vcpu: u32) -> SpecRecord {
        SpecRecord {
            size: size.to_string(),
            vcpu_count: vcpu,
            memory_gib: 8.0,
            network_class: "Moderate".to_string(),
            piops_optimized: None,
        }
    }

    #[test]
    fn test_merge_without_specs_keeps_every_price() {
        let prices = vec![price("a", 0.1), price("b", 0.2), price("c", 0.3)];
        let result = merge(prices, &[]);
        assert_eq!(result.len(), 3);
        assert!(result.values().all(|instance| instance.has_no_spec()));
    }

    #[test]
    fn test_spec_enriches_matching_size() {
        let result = merge(vec![price("db.m4.large", 0.175)], &[spec("db.m4.large", 2)]);
        let instance = &result["db.m4.large"];
        assert_eq!(instance.vcpu_count, Some(2));
        assert_eq!(instance.network_class.as_deref(), Some("Moderate"));
        assert_eq!(instance.price_per_hour, Some(0.175));
    }

    #[test]
    fn test_unmatched_spec_is_dropped() {
        let result = merge(vec![price("db.m4.large", 0.175)], &[spec("db.r3.8xlarge", 32)]);
        assert_eq!(result.len(), 1);
        assert!(!result.contains_key("db.r3.8xlarge"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let result = merge(vec![price("m4.large", 0.1), price("m4.large", 0.2)], &[]);
        assert_eq!(result.len(), 1);
        assert_eq!(result["m4.large"].price_per_hour, Some(0.2));
    }

    #[test]
    fn test_later_spec_overrides_earlier_spec() {
        let result = merge(
            vec![price("cache.m3.large", 0.182)],
            &[spec("cache.m3.large", 1), spec("cache.m3.large", 2)],
        );
        assert_eq!(result["cache.m3.large"].vcpu_count, Some(2));
    }
}
