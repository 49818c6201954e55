//! Result presentation
//!
//! Text output is a table per query; JSON output wraps the results with the
//! service, region and fetch time so saved reports are self-describing.

use crate::error::Result;
use crate::storage::PiopsPricing;
use crate::types::{InstanceType, InstanceTypes, ServiceKind};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, CellAlignment, Table};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Row order for text output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    /// Lexical by size name
    #[default]
    Name,
    /// Cheapest hourly price first, unpriced sizes last
    Price,
}

#[derive(Debug, Serialize)]
pub struct PricingReport {
    pub service: ServiceKind,
    pub region: String,
    pub fetched_at: DateTime<Utc>,
    pub instance_types: BTreeMap<String, InstanceType>,
}

impl PricingReport {
    pub fn new(service: ServiceKind, region: &str, instance_types: InstanceTypes) -> Self {
        Self {
            service,
            region: region.to_string(),
            fetched_at: Utc::now(),
            instance_types: instance_types.into_iter().collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Serialize)]
pub struct StorageReport {
    pub region: String,
    pub fetched_at: DateTime<Utc>,
    pub ec2_gp2_per_gb_month: Option<f64>,
    pub rds_gp2_per_gb_month: Option<f64>,
    pub rds_piops: PiopsPricing,
}

impl StorageReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Sort instance types for display.
pub fn sorted(instance_types: &InstanceTypes, key: SortKey) -> Vec<&InstanceType> {
    let mut rows: Vec<&InstanceType> = instance_types.values().collect();
    match key {
        SortKey::Name => rows.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::Price => rows.sort_by(|a, b| {
            let by_price = match (a.price_per_hour, b.price_per_hour) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_price.then_with(|| a.name.cmp(&b.name))
        }),
    }
    rows
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn money(value: Option<f64>) -> String {
    value
        .map(|v| format!("${:.3}", v))
        .unwrap_or_else(|| "-".to_string())
}

/// Render instance types as a table.
pub fn instance_table(instance_types: &InstanceTypes, key: SortKey) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Size", "vCPU", "ECU", "Memory GiB", "Storage", "System", "Network", "PIOPS", "$/hr",
        "$/day", "$/month",
    ]);

    for instance in sorted(instance_types, key) {
        table.add_row(vec![
            Cell::new(&instance.name),
            Cell::new(opt(instance.vcpu_count)).set_alignment(CellAlignment::Right),
            Cell::new(opt(instance.compute_units.as_deref())),
            Cell::new(opt(instance.memory_gib)).set_alignment(CellAlignment::Right),
            Cell::new(opt(instance.storage_gb.as_deref())),
            Cell::new(opt(instance.os_or_engine_label.as_deref())),
            Cell::new(opt(instance.network_class.as_deref())),
            Cell::new(match instance.piops_optimized {
                Some(true) => "yes",
                Some(false) => "no",
                None => "-",
            }),
            Cell::new(money(instance.price_per_hour)).set_alignment(CellAlignment::Right),
            Cell::new(money(instance.price_per_day)).set_alignment(CellAlignment::Right),
            Cell::new(money(instance.price_per_month)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Render storage prices as a table.
pub fn storage_table(report: &StorageReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Storage", "Price"]);
    table.add_row(vec![
        "EC2 gp2 (per GB-month)".to_string(),
        money(report.ec2_gp2_per_gb_month),
    ]);
    table.add_row(vec![
        "RDS gp2 (per GB-month)".to_string(),
        money(report.rds_gp2_per_gb_month),
    ]);
    table.add_row(vec![
        "RDS PIOPS storage (per GB-month)".to_string(),
        money(report.rds_piops.storage_per_gb_month),
    ]);
    table.add_row(vec![
        "RDS PIOPS IO (per IOPS-month)".to_string(),
        money(report.rds_piops.io_per_iops_month),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(name: &str, hourly: Option<f64>) -> InstanceType {
        InstanceType {
            name: name.to_string(),
            price_per_hour: hourly,
            ..Default::default()
        }
    }

    fn sample() -> InstanceTypes {
        [
            instance("m4.xlarge", Some(0.24)),
            instance("c4.large", Some(0.105)),
            instance("x1.32xlarge", None),
            instance("m4.large", Some(0.12)),
        ]
        .into_iter()
        .map(|i| (i.name.clone(), i))
        .collect()
    }

    #[test]
    fn test_sort_by_name() {
        let types = sample();
        let names: Vec<_> = sorted(&types, SortKey::Name)
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["c4.large", "m4.large", "m4.xlarge", "x1.32xlarge"]);
    }

    #[test]
    fn test_sort_by_price_puts_unpriced_last() {
        let types = sample();
        let names: Vec<_> = sorted(&types, SortKey::Price)
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["c4.large", "m4.large", "m4.xlarge", "x1.32xlarge"]);
    }

    #[test]
    fn test_instance_table_renders_placeholders() {
        let rendered = instance_table(&sample(), SortKey::Name).to_string();
        assert!(rendered.contains("x1.32xlarge"));
        assert!(rendered.contains("$0.105"));
        assert!(rendered.contains('-'));
    }

    #[test]
    fn test_storage_report_json_keeps_missing_prices_null() {
        let report = StorageReport {
            region: "us-east-1".to_string(),
            fetched_at: Utc::now(),
            ec2_gp2_per_gb_month: Some(0.1),
            rds_gp2_per_gb_month: None,
            rds_piops: PiopsPricing::default(),
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["ec2_gp2_per_gb_month"], 0.1);
        assert!(json["rds_gp2_per_gb_month"].is_null());
    }

    #[test]
    fn test_report_json_is_ordered_by_size() {
        let report = PricingReport::new(ServiceKind::Compute, "us-east-1", sample());
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["service"], "ec2");
        assert_eq!(json["region"], "us-east-1");
        let keys: Vec<_> = json["instance_types"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["c4.large", "m4.large", "m4.xlarge", "x1.32xlarge"]);
    }
}
