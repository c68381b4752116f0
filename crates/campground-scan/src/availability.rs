use std::collections::BTreeMap;

use chrono::NaiveDate;
use rec_gov::{AVAILABLE, MonthAvailability, SiteAvailability};
use serde::Serialize;

use crate::dates::parse_day;
use crate::error::ScanError;
use crate::filter_chain::{FilterFn, FilterSpec, Filterable};

/// Per-site availability accumulated across months, keyed by campsite id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AvailabilityMap {
    sites: BTreeMap<String, SiteAvailability>,
}

impl AvailabilityMap {
    /// Fold one month's payload in.
    ///
    /// Dates already present for a site are overwritten, other dates are kept.
    /// Sites seen for the first time are inserted whole.
    pub fn merge(&mut self, month: MonthAvailability) {
        for (id, site) in month.campsites {
            self.merge_site(id, site);
        }
    }

    /// Fold in a single site's availability.
    pub fn merge_site(&mut self, id: String, site: SiteAvailability) {
        match self.sites.get_mut(&id) {
            Some(existing) => existing.availabilities.extend(site.availabilities),
            None => {
                self.sites.insert(id, site);
            }
        }
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether no site is present.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Availability of one site.
    pub fn get(&self, id: &str) -> Option<&SiteAvailability> {
        self.sites.get(id)
    }

    /// Sites in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SiteAvailability)> {
        self.sites.iter().map(|(id, site)| (id.as_str(), site))
    }

    /// Site ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sites.keys().map(String::as_str)
    }

    fn retain_dates(mut self, keep: impl Fn(&str, &str) -> bool) -> Self {
        for site in self.sites.values_mut() {
            site.availabilities
                .retain(|date, status| keep(date, status));
        }
        self
    }

    fn retain_sites(mut self, keep: impl Fn(&SiteAvailability) -> bool) -> Self {
        self.sites.retain(|_, site| keep(&*site));
        self
    }
}

impl FromIterator<(String, SiteAvailability)> for AvailabilityMap {
    fn from_iter<I: IntoIterator<Item = (String, SiteAvailability)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (id, site) in iter {
            map.merge_site(id, site);
        }
        map
    }
}

/// Whether a site label reads as an integer, e.g. `"042"` but not `"A12"`.
pub fn represents_int(label: &str) -> bool {
    label.trim().parse::<i64>().is_ok()
}

fn within(date: &str, bound: NaiveDate, keep: fn(NaiveDate, NaiveDate) -> bool) -> bool {
    parse_day(date).is_some_and(|day| keep(day, bound))
}

fn start_date_filter(map: AvailabilityMap, spec: &FilterSpec) -> Result<AvailabilityMap, ScanError> {
    let start = spec.date_param(0, "date")?;
    Ok(map.retain_dates(|date, _| within(date, start, |day, start| day >= start)))
}

fn end_date_filter(map: AvailabilityMap, spec: &FilterSpec) -> Result<AvailabilityMap, ScanError> {
    let end = spec.date_param(0, "date")?;
    Ok(map.retain_dates(|date, _| within(date, end, |day, end| day <= end)))
}

fn available_filter(map: AvailabilityMap, spec: &FilterSpec) -> Result<AvailabilityMap, ScanError> {
    if !spec.bool_param(0, "value", true)? {
        return Ok(map);
    }
    Ok(map.retain_dates(|_, status| status == AVAILABLE))
}

fn has_availability_filter(
    map: AvailabilityMap,
    spec: &FilterSpec,
) -> Result<AvailabilityMap, ScanError> {
    if !spec.bool_param(0, "value", true)? {
        return Ok(map);
    }
    Ok(map.retain_sites(|site| !site.availabilities.is_empty()))
}

fn campsite_type_contains_any_filter(
    map: AvailabilityMap,
    spec: &FilterSpec,
) -> Result<AvailabilityMap, ScanError> {
    let tokens = spec.string_list("tokens")?;
    Ok(map.retain_sites(|site| {
        site.campsite_type
            .as_deref()
            .is_some_and(|t| t.split_whitespace().any(|word| tokens.iter().any(|tok| tok == word)))
    }))
}

fn site_is_integer_filter(
    map: AvailabilityMap,
    spec: &FilterSpec,
) -> Result<AvailabilityMap, ScanError> {
    let wanted = spec.bool_param(0, "value", true)?;
    Ok(map.retain_sites(|site| site.site.as_deref().is_some_and(represents_int) == wanted))
}

const AVAILABILITY_FILTERS: &[(&str, FilterFn<AvailabilityMap>)] = &[
    ("start_date", start_date_filter),
    ("end_date", end_date_filter),
    ("available", available_filter),
    ("has_availability", has_availability_filter),
    ("campsite_type__contains_any", campsite_type_contains_any_filter),
    ("site_is_integer", site_is_integer_filter),
];

impl Filterable for AvailabilityMap {
    const KIND: &'static str = "availability";

    fn registry() -> &'static [(&'static str, FilterFn<Self>)] {
        AVAILABILITY_FILTERS
    }

    fn default_filters() -> Vec<FilterSpec> {
        vec![FilterSpec::new("available").arg(true)]
    }
}
