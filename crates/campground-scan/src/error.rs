use chrono::NaiveDateTime;
use rec_gov::RecGovError;

/// Custom error type for campground scan operations
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Failure reported by the recreation.gov client, including pagination
    /// counts that do not reconcile.
    #[error(transparent)]
    Api(#[from] RecGovError),

    /// A month fetch was asked for something other than the first day of a
    /// month at midnight.
    #[error("Month anchor must be the first day of a month at 00:00:00, got {0}")]
    InvalidMonthAnchor(NaiveDateTime),

    /// Availability filters without a `start_date`.
    #[error("A start_date filter is required to know which months to search")]
    MissingStartDate,

    /// A filter name that is not registered for the collection it targets.
    #[error("Unknown {kind} filter: {name}")]
    UnknownFilter {
        /// Collection the chain was built for.
        kind: &'static str,
        /// The offending filter name.
        name: String,
    },

    /// A recognized filter with unusable parameters.
    #[error("Invalid parameters for filter {filter}: {reason}")]
    InvalidFilterParams {
        /// Filter name.
        filter: String,
        /// What was wrong.
        reason: String,
    },

    /// The catalog and the month endpoint disagree about how many sites the
    /// asset has.
    #[error("Wrong number of sites retrieved: catalog has {catalog}, availability has {availability}")]
    CountMismatch {
        /// Sites in the campsite catalog.
        catalog: usize,
        /// Sites in the accumulated availability.
        availability: usize,
    },

    /// A wire record is missing a required field or has the wrong shape.
    #[error("Data format error: {0}")]
    DataFormat(String),
}

impl From<serde_json::Error> for ScanError {
    fn from(e: serde_json::Error) -> Self {
        ScanError::DataFormat(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_filter_names_the_filter() {
        let e = ScanError::UnknownFilter {
            kind: "campsite",
            name: "filter_by_colour".to_string(),
        };
        assert_eq!(e.to_string(), "Unknown campsite filter: filter_by_colour");
    }

    #[test]
    fn test_protocol_inconsistency_passes_through() {
        let e: ScanError = RecGovError::ProtocolInconsistency {
            total: 73,
            retrieved: 80,
        }
        .into();
        assert_eq!(
            e.to_string(),
            "Total records was supposed to be 73, but 80 were read"
        );
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<ScanError>();
    }
}
