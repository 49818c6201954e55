//! Shared pricing types
//!
//! `PriceRecord` is what the live feed says about one size, `SpecRecord` is
//! what the local specification table says about it, and `InstanceType` is the
//! merged result. Every attribute except the size name is optional: feeds and
//! tables routinely omit or garble individual fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Final output of a pricing query, keyed by size name.
pub type InstanceTypes = HashMap<String, InstanceType>;

/// Which pricing feed a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    /// EC2 on-demand instances
    #[serde(rename = "ec2")]
    Compute,
    /// RDS (MySQL) standard deployments
    #[serde(rename = "rds")]
    RelationalDatabase,
    /// ElastiCache (Redis) standard deployments
    #[serde(rename = "elasticache")]
    InMemoryCache,
}

impl ServiceKind {
    /// Short service identifier, also the stem of the specification table file.
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Compute => "ec2",
            ServiceKind::RelationalDatabase => "rds",
            ServiceKind::InMemoryCache => "elasticache",
        }
    }

    /// Fixed engine label for tiered services. Compute reads its label from the feed.
    pub fn engine_label(self) -> Option<&'static str> {
        match self {
            ServiceKind::Compute => None,
            ServiceKind::RelationalDatabase => Some("mysql"),
            ServiceKind::InMemoryCache => Some("redis"),
        }
    }

    /// Feed keys leading from a region entry to its size entries: (group, entries).
    pub(crate) fn entry_path(self) -> (&'static str, &'static str) {
        match self {
            ServiceKind::Compute => ("instanceTypes", "sizes"),
            ServiceKind::RelationalDatabase | ServiceKind::InMemoryCache => ("types", "tiers"),
        }
    }

    /// Feed key holding the size name of one entry.
    pub(crate) fn name_key(self) -> &'static str {
        match self {
            ServiceKind::Compute => "size",
            ServiceKind::RelationalDatabase | ServiceKind::InMemoryCache => "name",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One instance size as reported by the live feed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRecord {
    pub name: String,
    pub vcpu_count: Option<u32>,
    /// ECU rating; some rows carry "Variable" instead of a number
    pub compute_units: Option<String>,
    pub memory_gib: Option<f64>,
    /// Instance storage; "EBS only" and similar text is kept verbatim
    pub storage_gb: Option<String>,
    pub os_or_engine_label: Option<String>,
    pub price_per_hour: Option<f64>,
    pub price_per_day: Option<f64>,
    pub price_per_month: Option<f64>,
}

/// One entry from the static specification table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecRecord {
    pub size: String,
    #[serde(rename = "vCPU")]
    pub vcpu_count: u32,
    #[serde(rename = "memoryGiB")]
    pub memory_gib: f64,
    #[serde(rename = "network")]
    pub network_class: String,
    #[serde(
        rename = "piopsOptimized",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub piops_optimized: Option<bool>,
}

/// A size with live pricing merged with its specification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstanceType {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcpu_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_gib: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_gb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_or_engine_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_hour: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piops_optimized: Option<bool>,
}

impl InstanceType {
    /// Overwrite the specification attributes with the table's values.
    pub fn apply_spec(&mut self, spec: &SpecRecord) {
        self.vcpu_count = Some(spec.vcpu_count);
        self.memory_gib = Some(spec.memory_gib);
        self.network_class = Some(spec.network_class.clone());
        self.piops_optimized = spec.piops_optimized;
    }

    /// True when no specification attribute has been filled in.
    pub fn has_no_spec(&self) -> bool {
        self.network_class.is_none() && self.piops_optimized.is_none()
    }
}

impl From<PriceRecord> for InstanceType {
    fn from(record: PriceRecord) -> Self {
        Self {
            name: record.name,
            vcpu_count: record.vcpu_count,
            compute_units: record.compute_units,
            memory_gib: record.memory_gib,
            storage_gb: record.storage_gb,
            os_or_engine_label: record.os_or_engine_label,
            price_per_hour: record.price_per_hour,
            price_per_day: record.price_per_day,
            price_per_month: record.price_per_month,
            network_class: None,
            piops_optimized: None,
        }
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InstanceType {{ name: {}, vcpu: {:?}, memory_gib: {:?}, price_per_hour: {:?}, network: {:?} }}",
            self.name, self.vcpu_count, self.memory_gib, self.price_per_hour, self.network_class
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_identifiers() {
        assert_eq!(ServiceKind::Compute.as_str(), "ec2");
        assert_eq!(ServiceKind::RelationalDatabase.as_str(), "rds");
        assert_eq!(ServiceKind::InMemoryCache.to_string(), "elasticache");
    }

    #[test]
    fn test_engine_labels() {
        assert_eq!(ServiceKind::Compute.engine_label(), None);
        assert_eq!(ServiceKind::RelationalDatabase.engine_label(), Some("mysql"));
        assert_eq!(ServiceKind::InMemoryCache.engine_label(), Some("redis"));
    }

    #[test]
    fn test_apply_spec_overwrites_feed_values() {
        let mut instance = InstanceType::from(PriceRecord {
            name: "db.m4.large".to_string(),
            vcpu_count: Some(4),
            memory_gib: Some(1.0),
            ..Default::default()
        });
        assert!(instance.has_no_spec());

        instance.apply_spec(&SpecRecord {
            size: "db.m4.large".to_string(),
            vcpu_count: 2,
            memory_gib: 8.0,
            network_class: "Moderate".to_string(),
            piops_optimized: Some(true),
        });

        assert_eq!(instance.vcpu_count, Some(2));
        assert_eq!(instance.memory_gib, Some(8.0));
        assert_eq!(instance.network_class.as_deref(), Some("Moderate"));
        assert_eq!(instance.piops_optimized, Some(true));
        assert!(!instance.has_no_spec());
    }

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let instance = InstanceType {
            name: "t2.micro".to_string(),
            price_per_hour: Some(0.013),
            ..Default::default()
        };
        let json = serde_json::to_value(&instance).unwrap();
        assert_eq!(json["name"], "t2.micro");
        assert!(json.get("network_class").is_none());
        assert!(json.get("vcpu_count").is_none());
    }
}
