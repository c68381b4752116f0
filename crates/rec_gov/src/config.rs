use serde::Deserialize;

use crate::pager::DEFAULT_PAGE_SIZE;

/// Environment variables checked, in order, for the RIDB API key.
pub const API_KEY_VARS: [&str; 2] = ["RECREATION_GOV_API_KEY", "RECREATION_GOV_KEY"];

/// Settings for [`crate::RecGovClient`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the public RIDB API
    pub ridb_base_url: String,

    /// Base URL of recreation.gov's internal API (month availability)
    pub internal_base_url: String,

    /// RIDB API key. Only the RIDB endpoints need one.
    pub api_key: Option<String>,

    /// Records requested per RIDB page (default: 50)
    pub page_size: usize,

    /// Per-request deadline in seconds (default: 30)
    pub timeout_secs: u64,

    /// User agents to pick from when the client is built
    pub user_agents: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ridb_base_url: "https://ridb.recreation.gov/api/v1".to_string(),
            internal_base_url: "https://www.recreation.gov/api".to_string(),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
            user_agents: vec![
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36".to_string(),
            ],
        }
    }
}

impl ClientConfig {
    /// Fill in the API key from the environment when none was configured.
    pub fn with_env_api_key(self) -> Self {
        self.with_api_key_from(|var| std::env::var(var).ok())
    }

    /// Fill in the API key from the first of [`API_KEY_VARS`] that `lookup`
    /// finds non-blank, when none was configured.
    pub fn with_api_key_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.api_key.is_none() {
            self.api_key = API_KEY_VARS
                .iter()
                .copied()
                .find_map(|var| lookup(var).filter(|key| !key.trim().is_empty()));
        }
        self
    }
}
