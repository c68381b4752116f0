use chrono::NaiveDateTime;
use serde_json::Value;

use crate::error::RecGovError;
use crate::types::MonthAvailability;

/// One page of records together with the counts the service reported for it.
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    /// Records on this page, unmodified.
    pub records: Vec<Value>,
    /// Number of records the service says this page holds.
    pub page_count: usize,
    /// Number of records the service says exist across all pages.
    pub total_count: usize,
}

/// A paginated list endpoint.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch `limit` records of `endpoint` starting at `offset`.
    async fn get_page(
        &self,
        endpoint: &str,
        query: &[(String, String)],
        offset: usize,
        limit: usize,
    ) -> Result<RecordPage, RecGovError>;
}

/// The month-granular availability endpoint.
#[async_trait::async_trait]
pub trait MonthSource: Send + Sync {
    /// Fetch availability for every site of `asset_id` in the month starting at `month`.
    ///
    /// `month` is expected to be the first day of a month at midnight.
    async fn get_month(
        &self,
        asset_id: &str,
        month: NaiveDateTime,
    ) -> Result<MonthAvailability, RecGovError>;
}
