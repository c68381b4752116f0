use std::path::Path;

use anyhow::{Context, Result};
use campground_scan::FilterSpec;
use rec_gov::ClientConfig;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Top-level checker configuration.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// recreation.gov client settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Campgrounds to check, in order.
    #[validate(length(min = 1, message = "At least one task is required"))]
    #[validate(nested)]
    pub tasks: Vec<TaskConfig>,
}

/// One campground to check and the filters to check it with.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    /// Label used in logs and in the status report
    #[validate(length(min = 1, message = "Task name is required"))]
    pub name: String,

    /// RIDB facility id of the campground
    #[serde(deserialize_with = "rec_gov::string_or_number")]
    #[validate(length(min = 1, message = "Asset ID is required"))]
    pub asset_id: String,

    /// Filters over the campsite catalog, applied in order
    #[serde(default)]
    pub campsite_filters: Vec<FilterSpec>,

    /// Filters over the availability, applied in order. Must include `start_date`.
    #[serde(default)]
    pub availability_filters: Vec<FilterSpec>,

    /// Drop sites with no nights left after filtering
    #[serde(default)]
    pub drop_empty_sites: bool,
}

impl Config {
    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml(&toml_str)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    /// Parse and validate TOML config text.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str).context("failed to parse TOML config")?;
        config.validate().context("config failed validation")?;
        Ok(config)
    }
}
