//! Exporter configuration, loaded from a YAML file.
//!
//! ```yaml
//! metrics:
//!   - request
//!   - 2xx
//!   - 5xx
//! rate_limit: 15
//! delay_seconds: 360
//! only_include_metrics:
//!   - 5xx
//! custom_query_dimensions:
//!   - projectId: 1234567
//!     domain: a.example.com
//! ```
//!
//! Credentials are not part of the file; they come from the
//! `TENCENT_SECRET_ID` / `TENCENT_SECRET_KEY` environment variables.

use eyre::{
    eyre,
    Result,
    WrapErr,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::path::Path;

/// A CDN query dimension: a domain plus its optional project reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDimension {
    #[serde(default, rename = "projectId")]
    pub project_id: Option<i64>,
    pub domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// CDN metrics to query per domain. `request` is the ratio baseline.
    #[serde(default)]
    pub metrics: Vec<String>,
    /// Aggregate upstream call rate across all concurrent requests.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
    /// How far behind "now" the scrape window sits, to let upstream
    /// aggregation catch up.
    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: i64,
    /// Optional status-label allow-list; absent or empty means emit all.
    #[serde(default)]
    pub only_include_metrics: Option<Vec<String>>,
    #[serde(default)]
    pub custom_query_dimensions: Vec<QueryDimension>,
}

fn default_rate_limit() -> u32 {
    15
}

fn default_delay_seconds() -> i64 {
    360
}

pub fn parse_config(path: &Path) -> Result<ExporterConfig> {
    let bytes = std::fs::read(path).wrap_err_with(|| format!("reading config file {}", path.display()))?;
    let content = String::from_utf8(bytes)?;
    let config = serde_yml::from_str::<ExporterConfig>(&content)?;
    Ok(config)
}

impl ExporterConfig {
    pub fn validate(&self, cdn_enabled: bool) -> Result<()> {
        if self.rate_limit == 0 {
            return Err(eyre!("config.rate_limit must be positive"));
        }
        if self.delay_seconds < 0 {
            return Err(eyre!("config.delay_seconds must not be negative"));
        }
        if cdn_enabled {
            if self.custom_query_dimensions.is_empty() {
                return Err(eyre!("cdn collection requires non-empty custom_query_dimensions"));
            }
            if self.metrics.is_empty() {
                return Err(eyre!("cdn collection requires non-empty metrics"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_full_config() {
        let yaml = r#"
metrics:
  - request
  - 5xx
rate_limit: 20
delay_seconds: 60
only_include_metrics:
  - 5xx
custom_query_dimensions:
  - projectId: 1234567
    domain: a.example.com
  - domain: b.example.com
"#;
        let config: ExporterConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.metrics, vec!["request", "5xx"]);
        assert_eq!(config.rate_limit, 20);
        assert_eq!(config.delay_seconds, 60);
        assert_eq!(config.only_include_metrics, Some(vec!["5xx".to_string()]));
        assert_eq!(config.custom_query_dimensions.len(), 2);
        assert_eq!(config.custom_query_dimensions[0].project_id, Some(1234567));
        assert_eq!(config.custom_query_dimensions[0].domain, "a.example.com");
        assert_eq!(config.custom_query_dimensions[1].project_id, None);

        config.validate(true).unwrap();
    }

    #[test]
    fn defaults_apply_to_a_minimal_config() {
        let config: ExporterConfig = serde_yml::from_str("metrics: [request]").unwrap();
        assert_eq!(config.rate_limit, 15);
        assert_eq!(config.delay_seconds, 360);
        assert_eq!(config.only_include_metrics, None);
        assert!(config.custom_query_dimensions.is_empty());
    }

    #[test]
    fn validation_failures() {
        let config: ExporterConfig = serde_yml::from_str("rate_limit: 0").unwrap();
        assert!(config.validate(false).is_err());

        // cdn enabled but no dimensions configured
        let config: ExporterConfig = serde_yml::from_str("metrics: [request]").unwrap();
        assert!(config.validate(true).is_err());
        assert!(config.validate(false).is_ok());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_config(Path::new("/definitely/not/here.yml")).is_err());
    }
}
