//! Static instance specification tables
//!
//! The pricing feeds for RDS and ElastiCache carry no hardware details, so a
//! hand-maintained table per service supplies them. Tables live in the spec
//! directory as `<service>.toml`, one array of tables under the service key:
//!
//! ```toml
//! [[rds]]
//! size = "db.m4.large"
//! vCPU = 2
//! memoryGiB = 8.0
//! network = "Moderate"
//! piopsOptimized = true
//! ```
//!
//! A table is optional. A missing file, an unreadable file, or a row with the
//! wrong field types never fails a pricing query: the affected data is simply
//! absent and the merge proceeds with price-only records.

use crate::types::{ServiceKind, SpecRecord};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Source of specification records for a service
pub trait SpecLoader {
    /// Load the table for `service`. Unavailable data yields an empty list.
    fn load(&self, service: ServiceKind) -> Vec<SpecRecord>;
}

/// Reads `<dir>/<service>.toml`
#[derive(Debug, Clone)]
pub struct FileSpecLoader {
    dir: PathBuf,
}

impl FileSpecLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, service: ServiceKind) -> PathBuf {
        self.dir.join(format!("{}.toml", service.as_str()))
    }
}

impl SpecLoader for FileSpecLoader {
    fn load(&self, service: ServiceKind) -> Vec<SpecRecord> {
        let path = self.path_for(service);
        if !path.exists() {
            debug!("No specification table at {}", path.display());
            return Vec::new();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => parse_spec_table(&content, service),
            Err(e) => {
                warn!("Failed to read specification table {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }
}

/// In-memory tables, keyed by service
#[derive(Debug, Clone, Default)]
pub struct StaticSpecs(HashMap<ServiceKind, Vec<SpecRecord>>);

impl StaticSpecs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, service: ServiceKind, records: Vec<SpecRecord>) -> Self {
        self.0.insert(service, records);
        self
    }
}

impl SpecLoader for StaticSpecs {
    fn load(&self, service: ServiceKind) -> Vec<SpecRecord> {
        self.0.get(&service).cloned().unwrap_or_default()
    }
}

/// Parse the table for `service` out of a TOML document.
///
/// Rows that do not deserialize into a `SpecRecord` are skipped with a warning.
pub fn parse_spec_table(content: &str, service: ServiceKind) -> Vec<SpecRecord> {
    let table: toml::Table = match toml::from_str(content) {
        Ok(table) => table,
        Err(e) => {
            warn!("Invalid {} specification table: {}", service, e);
            return Vec::new();
        }
    };

    let Some(rows) = table.get(service.as_str()).and_then(|v| v.as_array()) else {
        debug!("Specification table has no [[{}]] entries", service);
        return Vec::new();
    };

    rows.iter()
        .enumerate()
        .filter_map(|(idx, row)| match row.clone().try_into::<SpecRecord>() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping {} specification entry #{}: {}", service, idx + 1, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RDS_TABLE: &str = r#"
[[rds]]
size = "db.t2.micro"
vCPU = 1
memoryGiB = 1.0
network = "Low"
piopsOptimized = false

[[rds]]
size = "db.m4.large"
vCPU = 2
memoryGiB = 8
network = "Moderate"
piopsOptimized = true
"#;

    #[test]
    fn test_parse_table() {
        let records = parse_spec_table(RDS_TABLE, ServiceKind::RelationalDatabase);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].size, "db.t2.micro");
        assert_eq!(records[1].vcpu_count, 2);
        assert_eq!(records[1].memory_gib, 8.0);
        assert_eq!(records[1].piops_optimized, Some(true));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let content = r#"
[[elasticache]]
size = "cache.t2.micro"
vCPU = "one"
memoryGiB = 0.555
network = "Low to Moderate"

[[elasticache]]
size = "cache.m3.large"
vCPU = 2
memoryGiB = 6.05
network = "Moderate"

[[elasticache]]
vCPU = 4
memoryGiB = 13.3
network = "Moderate"
"#;
        let records = parse_spec_table(content, ServiceKind::InMemoryCache);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].size, "cache.m3.large");
        assert_eq!(records[0].piops_optimized, None);
    }

    #[test]
    fn test_other_service_key_is_ignored() {
        assert!(parse_spec_table(RDS_TABLE, ServiceKind::InMemoryCache).is_empty());
    }

    #[test]
    fn test_invalid_toml_is_empty() {
        assert!(parse_spec_table("[[rds]\nsize = ", ServiceKind::RelationalDatabase).is_empty());
    }

    #[test]
    fn test_file_loader_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let loader = FileSpecLoader::new(temp_dir.path());
        assert!(loader.load(ServiceKind::Compute).is_empty());
    }

    #[test]
    fn test_file_loader_reads_service_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("rds.toml"), RDS_TABLE).unwrap();

        let loader = FileSpecLoader::new(temp_dir.path());
        assert_eq!(
            loader.path_for(ServiceKind::RelationalDatabase),
            temp_dir.path().join("rds.toml")
        );
        assert_eq!(loader.load(ServiceKind::RelationalDatabase).len(), 2);
    }

    #[test]
    fn test_static_specs() {
        let specs = StaticSpecs::new().with(
            ServiceKind::InMemoryCache,
            parse_spec_table(
                "[[elasticache]]\nsize = \"cache.t2.micro\"\nvCPU = 1\nmemoryGiB = 0.555\nnetwork = \"Low\"\n",
                ServiceKind::InMemoryCache,
            ),
        );
        assert_eq!(specs.load(ServiceKind::InMemoryCache).len(), 1);
        assert!(specs.load(ServiceKind::RelationalDatabase).is_empty());
    }
}
