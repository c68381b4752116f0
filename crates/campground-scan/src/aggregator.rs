use std::sync::Arc;

use chrono::NaiveDateTime;
use rec_gov::{MonthAvailability, MonthSource};
use tracing::{debug, info};

use crate::availability::AvailabilityMap;
use crate::dates::{MonthRange, ensure_month_anchor};
use crate::error::ScanError;
use crate::filter_chain::{FilterChain, FilterSpec};

/// Collects month-by-month availability for one asset and filters it.
///
/// Every month fetched is folded into an accumulated map that lives as long
/// as the aggregator, so a second [`apply_filters`](Self::apply_filters)
/// call over the same window sees the same sites.
pub struct AvailabilityAggregator {
    asset_id: String,
    source: Arc<dyn MonthSource>,
    accumulated: AvailabilityMap,
    expected_sites: Option<usize>,
    drop_empty_sites: bool,
}

impl AvailabilityAggregator {
    /// An aggregator for `asset_id` with nothing accumulated yet.
    pub fn new(asset_id: impl Into<String>, source: Arc<dyn MonthSource>) -> Self {
        Self {
            asset_id: asset_id.into(),
            source,
            accumulated: AvailabilityMap::default(),
            expected_sites: None,
            drop_empty_sites: false,
        }
    }

    /// Fail [`apply_filters`](Self::apply_filters) unless the months fetched
    /// cover exactly `count` sites, e.g. the size of the campsite catalog.
    pub fn expecting_sites(mut self, count: usize) -> Self {
        self.expected_sites = Some(count);
        self
    }

    /// Remove sites left with no dates after filtering.
    pub fn dropping_empty_sites(mut self, drop: bool) -> Self {
        self.drop_empty_sites = drop;
        self
    }

    /// Asset whose months are fetched.
    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    /// Number of sites accumulated so far.
    pub fn len(&self) -> usize {
        self.accumulated.len()
    }

    /// Whether nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }

    /// Everything merged so far, unfiltered.
    pub fn sites(&self) -> &AvailabilityMap {
        &self.accumulated
    }

    /// Fetch one month without merging it.
    pub async fn fetch_month(&self, month: NaiveDateTime) -> Result<MonthAvailability, ScanError> {
        let month = ensure_month_anchor(month)?;
        debug!("Fetching {} availability for asset {}", month.format("%Y-%m"), self.asset_id);

        Ok(self.source.get_month(&self.asset_id, month).await?)
    }

    /// Fold a month payload into the accumulated map.
    pub fn merge(&mut self, payload: MonthAvailability) {
        self.accumulated.merge(payload);
    }

    /// Fetch one month and merge it.
    pub async fn retrieve_month(&mut self, month: NaiveDateTime) -> Result<(), ScanError> {
        let payload = self.fetch_month(month).await?;
        self.merge(payload);
        Ok(())
    }

    /// The chain [`apply_filters`](Self::apply_filters) would run: the
    /// caller's filters, then `available`, then `has_availability` when empty
    /// sites are dropped.
    pub fn filter_chain(&self, filters: &[FilterSpec]) -> Result<FilterChain<AvailabilityMap>, ScanError> {
        let mut chain = FilterChain::new(filters)?;
        if self.drop_empty_sites {
            chain.push(FilterSpec::new("has_availability"))?;
        }
        Ok(chain)
    }

    /// Months covered by the `start_date` and `end_date` filters.
    ///
    /// Without an `end_date` the window is the start month and the one after.
    pub fn months_for(filters: &[FilterSpec]) -> Result<MonthRange, ScanError> {
        let named = |name: &str| filters.iter().find(|spec| spec.name == name);

        let start = named("start_date")
            .ok_or(ScanError::MissingStartDate)?
            .date_param(0, "date")?;

        match named("end_date") {
            Some(spec) => {
                let end = spec.date_param(0, "date")?;
                if end < start {
                    return Err(spec.invalid(format!("{} is before start_date {}", end, start)));
                }
                Ok(MonthRange::new(start, end))
            }
            None => Ok(MonthRange::starting_at(start)),
        }
    }

    /// Fetch every month the window covers, then run the filters over the
    /// accumulated availability.
    ///
    /// Filter names and the window are checked before anything is fetched.
    /// The accumulated map is left unfiltered.
    pub async fn apply_filters(&mut self, filters: &[FilterSpec]) -> Result<AvailabilityMap, ScanError> {
        let months = Self::months_for(filters)?;
        let chain = self.filter_chain(filters)?;

        for month in months {
            self.retrieve_month(month).await?;
        }
        info!("Accumulated availability for {} sites of asset {}", self.len(), self.asset_id);

        if let Some(expected) = self.expected_sites {
            if expected != self.len() {
                return Err(ScanError::CountMismatch {
                    catalog: expected,
                    availability: self.len(),
                });
            }
        }

        chain.apply(&self.accumulated)
    }
}
