use crate::error::{ConfigError, PricingError, Result};
use crate::types::ServiceKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_region: String,
    pub feeds: FeedEndpoints,
    pub spec: SpecConfig,
    pub http: HttpConfig,
}

/// Published pricing feed URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedEndpoints {
    pub ec2: String,
    pub rds: String,
    pub elasticache: String,
    /// EBS volume pricing (EC2 gp2 storage)
    pub ec2_ebs: String,
    /// RDS MySQL gp2 storage
    pub rds_gp2: String,
    /// RDS MySQL provisioned IOPS storage
    pub rds_piops: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecConfig {
    /// Directory holding `<service>.toml` specification tables
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FeedEndpoints {
    fn default() -> Self {
        Self {
            ec2: "http://a0.awsstatic.com/pricing/1/ec2/linux-od.min.js".to_string(),
            rds: "http://a0.awsstatic.com/pricing/1/rds/mysql/pricing-standard-deployments.min.js"
                .to_string(),
            elasticache:
                "http://a0.awsstatic.com/pricing/1/elasticache/pricing-standard-deployments-elasticache.min.js"
                    .to_string(),
            ec2_ebs: "https://a0.awsstatic.com/pricing/1/ebs/pricing-ebs.min.js".to_string(),
            rds_gp2: "https://a0.awsstatic.com/pricing/1/rds/mysql/pricing-gp2-standard-deploy.min.js"
                .to_string(),
            rds_piops:
                "https://a0.awsstatic.com/pricing/1/rds/mysql/pricing-piops-standard-deploy.min.js"
                    .to_string(),
        }
    }
}

impl FeedEndpoints {
    /// Instance pricing feed for a service
    pub fn for_service(&self, service: ServiceKind) -> &str {
        match service {
            ServiceKind::Compute => &self.ec2,
            ServiceKind::RelationalDatabase => &self.rds,
            ServiceKind::InMemoryCache => &self.elasticache,
        }
    }

    fn named(&self) -> [(&'static str, &str); 6] {
        [
            ("feeds.ec2", &self.ec2),
            ("feeds.rds", &self.rds),
            ("feeds.elasticache", &self.elasticache),
            ("feeds.ec2_ebs", &self.ec2_ebs),
            ("feeds.rds_gp2", &self.rds_gp2),
            ("feeds.rds_piops", &self.rds_piops),
        ]
    }
}

impl Default for SpecConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("spec"),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("awspricing/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_region: "us-east-1".to_string(),
            feeds: FeedEndpoints::default(),
            spec: SpecConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// Lookup order: explicit path, `./.awspricing.toml`,
    /// `<config dir>/awspricing/config.toml`, built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            let local = PathBuf::from(".awspricing.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("awspricing").join("config.toml"))
                    .unwrap_or(local)
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                ConfigError::ParseError(format!("{}: {}", config_path.display(), e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            if path.is_some() {
                tracing::warn!(
                    "Config file not found: {}, using defaults. Run 'awspricing init' to create one.",
                    config_path.display()
                );
            }
            Ok(Config::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_region.trim().is_empty() {
            return Err(ConfigError::MissingField("default_region".to_string()).into());
        }
        for (field, url) in self.feeds.named() {
            if url.trim().is_empty() {
                return Err(ConfigError::MissingField(field.to_string()).into());
            }
        }
        if self.http.timeout_secs == 0 {
            return Err(PricingError::Config(ConfigError::InvalidValue {
                field: "http.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            }));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}
