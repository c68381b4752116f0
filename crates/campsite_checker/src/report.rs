use std::path::Path;

use anyhow::{Context, Result};
use campground_scan::Campsite;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    /// Task name from the config
    pub name: String,
    /// Campground checked
    pub asset_id: String,
    /// Sites with at least one matching night, by loop then name
    pub sites: Vec<SiteReport>,
    /// When the check finished
    pub check_completed: DateTime<Utc>,
    /// Wall time the check took
    pub duration_secs: f64,
}

/// One open campsite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteReport {
    /// recreation.gov campsite id
    pub site_id: String,
    /// Loop the site belongs to
    #[serde(rename = "loop")]
    pub loop_name: String,
    /// Site label within its loop
    pub name: String,
    /// Open nights as `first to last` ranges
    pub availabilities: Vec<String>,
    /// Count of open nights across all ranges
    pub available_nights: usize,
    /// Booking page for the site
    pub link: String,
}

impl From<&Campsite> for SiteReport {
    fn from(site: &Campsite) -> Self {
        Self {
            site_id: site.id().to_string(),
            loop_name: site.loop_name().to_string(),
            name: site.name().to_string(),
            availabilities: site.availability_summary(),
            available_nights: site.available_nights(),
            link: site.site_url(),
        }
    }
}

/// Pretty JSON for a set of task reports.
pub fn render(reports: &[TaskReport]) -> Result<String> {
    serde_json::to_string_pretty(reports).context("failed to serialize status report")
}

/// Write the status report to `path`, replacing any earlier one.
pub fn write_status(path: &Path, reports: &[TaskReport]) -> Result<()> {
    let json = render(reports)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write status report: {}", path.display()))
}
