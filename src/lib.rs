//! awspricing library
//!
//! Fetches the public AWS pricing feeds for EC2, RDS and ElastiCache, and
//! merges per-size prices with locally maintained instance specifications.

pub mod builder;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod feed;
pub mod fetch;
pub mod merge;
pub mod pricing;
pub mod report;
pub mod spec_table;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{PricingError, Result};
pub use pricing::PricingClient;
pub use types::{InstanceType, InstanceTypes, PriceRecord, ServiceKind, SpecRecord};
