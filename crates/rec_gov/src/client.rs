use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use log::{debug, warn};
use rand::seq::IndexedRandom;
use reqwest::cookie::Jar;
use reqwest::{Client, RequestBuilder, Response};

use crate::config::ClientConfig;
use crate::error::RecGovError;
use crate::source::{MonthSource, RecordPage, RecordSource};
use crate::types::{MonthAvailability, RidbPage};

/// Client for the RIDB and internal recreation.gov APIs.
///
/// Build one per process and share it; it keeps a cookie jar and a user
/// agent for its whole lifetime.
pub struct RecGovClient {
    client: Client,
    config: ClientConfig,
    user_agent: String,
}

impl RecGovClient {
    /// Create a new recreation.gov API client
    pub fn new(config: ClientConfig) -> Result<Self, RecGovError> {
        let user_agent = config
            .user_agents
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| format!("rec_gov/{}", env!("CARGO_PKG_VERSION")));

        debug!("Using user agent: {}", user_agent);

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .user_agent(user_agent.clone())
            .cookie_provider(jar)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RecGovError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            user_agent,
        })
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// User agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// RIDB list endpoint holding the campsites of a facility.
    pub fn campsites_endpoint(asset_id: &str) -> String {
        format!("facilities/{}/campsites", urlencoding::encode(asset_id))
    }

    fn month_url(&self, asset_id: &str) -> String {
        format!(
            "{}/camps/availability/campground/{}/month",
            self.config.internal_base_url.trim_end_matches('/'),
            urlencoding::encode(asset_id)
        )
    }

    fn ridb_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.ridb_base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RecGovError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            warn!("API request failed with status {}: {}", status, body);
            return Err(RecGovError::from_status(status, body));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl RecordSource for RecGovClient {
    async fn get_page(
        &self,
        endpoint: &str,
        query: &[(String, String)],
        offset: usize,
        limit: usize,
    ) -> Result<RecordPage, RecGovError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(RecGovError::MissingApiKey)?;

        let url = self.ridb_url(endpoint);
        let mut params = query.to_vec();
        params.push(("limit".to_string(), limit.to_string()));
        params.push(("offset".to_string(), offset.to_string()));

        debug!("Requesting {} (offset {}, limit {})", url, offset, limit);

        let response = self
            .send(self.client.get(&url).header("apikey", api_key).query(&params))
            .await?;

        let page: RidbPage = response
            .json()
            .await
            .map_err(|e| RecGovError::DataFormat(format!("Failed to parse RIDB page: {}", e)))?;

        Ok(RecordPage {
            records: page.rec_data,
            page_count: page.metadata.results.current_count,
            total_count: page.metadata.results.total_count,
        })
    }
}

#[async_trait::async_trait]
impl MonthSource for RecGovClient {
    async fn get_month(
        &self,
        asset_id: &str,
        month: NaiveDateTime,
    ) -> Result<MonthAvailability, RecGovError> {
        let url = self.month_url(asset_id);
        let start_date = format!("{}.000Z", month.format("%Y-%m-%dT%H:%M:%S"));

        debug!("Making request to: {}?start_date={}", url, start_date);

        let response = self
            .send(self.client.get(&url).query(&[("start_date", start_date)]))
            .await?;

        response.json().await.map_err(|e| {
            RecGovError::DataFormat(format!("Failed to parse month availability: {}", e))
        })
    }
}
