/// Errors raised while talking to recreation.gov.
#[derive(thiserror::Error, Debug)]
pub enum RecGovError {
    /// Transport failure (connection refused, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The request did not complete before the client deadline.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Rate limited by the remote service
    #[error("Rate limited by recreation.gov")]
    RateLimited,

    /// The API key was rejected
    #[error("Authentication failed with recreation.gov")]
    AuthenticationFailed,

    /// The requested resource does not exist
    #[error("Resource not found")]
    NotFound,

    /// Any other non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// Response body, if it could be read.
        body: String,
    },

    /// The response body did not match the expected wire format.
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// A RIDB endpoint was called without an API key configured.
    #[error("RIDB API key missing: set RECREATION_GOV_API_KEY or provide one in the config")]
    MissingApiKey,

    /// The page counts reported by the service do not reconcile with the
    /// records actually returned.
    #[error("Total records was supposed to be {total}, but {retrieved} were read")]
    ProtocolInconsistency {
        /// Total record count reported by the service.
        total: usize,
        /// Records counted so far, including the offending page.
        retrieved: usize,
    },
}

impl RecGovError {
    /// Whether the failure is a transient I/O condition a caller may retry.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RecGovError::Http(_) | RecGovError::Timeout(_) | RecGovError::RateLimited
        )
    }

    pub(crate) fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            429 => RecGovError::RateLimited,
            401 | 403 => RecGovError::AuthenticationFailed,
            404 => RecGovError::NotFound,
            code => RecGovError::Status { status: code, body },
        }
    }
}

impl From<reqwest::Error> for RecGovError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RecGovError::Timeout(e.to_string())
        } else if e.is_decode() {
            RecGovError::DataFormat(e.to_string())
        } else {
            RecGovError::Http(e.to_string())
        }
    }
}
