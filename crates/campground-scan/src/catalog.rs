use std::collections::{BTreeMap, BTreeSet};

use rec_gov::{RecGovClient, RecordPager, RecordSource};
use serde_json::Value;
use tracing::{debug, info};

use crate::availability::AvailabilityMap;
use crate::campsite::Campsite;
use crate::error::ScanError;
use crate::filter_chain::{FilterChain, FilterFn, FilterSpec, Filterable};

/// Campsites of one asset, indexed by campsite id.
///
/// Filters return new catalogs; only [`CampsiteCatalog::ingest_availability`]
/// changes a catalog in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampsiteCatalog {
    sites: BTreeMap<String, Campsite>,
}

impl CampsiteCatalog {
    /// Build a catalog from raw RIDB campsite records.
    ///
    /// A record whose id was already seen replaces the earlier one.
    pub fn build<I>(records: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = Value>,
    {
        let sites = records
            .into_iter()
            .map(Campsite::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_campsites(sites))
    }

    /// Index already typed campsites. Later duplicates win.
    pub fn from_campsites<I>(campsites: I) -> Self
    where
        I: IntoIterator<Item = Campsite>,
    {
        Self {
            sites: campsites
                .into_iter()
                .map(|site| (site.id().to_string(), site))
                .collect(),
        }
    }

    /// Fetch every campsite of `asset_id` from RIDB.
    pub async fn fetch(
        source: &dyn RecordSource,
        asset_id: &str,
        page_size: usize,
    ) -> Result<Self, ScanError> {
        let pager = RecordPager::new(source, RecGovClient::campsites_endpoint(asset_id))
            .with_page_size(page_size);

        let records = pager.fetch_all().await?;
        info!("Fetched {} campsites for asset {}", records.len(), asset_id);

        Self::build(records)
    }

    /// Number of campsites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether the catalog has no campsites.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Campsite by id.
    pub fn get(&self, id: &str) -> Option<&Campsite> {
        self.sites.get(id)
    }

    /// Campsites in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Campsite> {
        self.sites.values()
    }

    /// Campsite ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sites.keys().map(String::as_str)
    }

    /// Distinct campsite types present.
    pub fn unique_campsite_types(&self) -> BTreeSet<String> {
        self.sites
            .values()
            .map(|site| site.site_type().to_string())
            .collect()
    }

    /// Campsites ordered by loop, then name.
    pub fn sorted(&self) -> Vec<&Campsite> {
        let mut sites: Vec<&Campsite> = self.sites.values().collect();
        sites.sort_by(|a, b| a.cmp_by_location(b));
        sites
    }

    /// Sites whose permitted length for `equipment_name` is strictly greater
    /// than `min_length`.
    pub fn filter_by_equipment(&self, equipment_name: &str, min_length: f64) -> Self {
        self.select(|site| site.supports_equipment(equipment_name, min_length))
    }

    /// Sites whose type is one of `types`, compared exactly.
    pub fn filter_by_campsite_type<S: AsRef<str>>(&self, types: &[S]) -> Self {
        self.select(|site| types.iter().any(|t| t.as_ref() == site.site_type()))
    }

    /// Sites whose type is none of `types`, compared exactly.
    pub fn exclude_by_campsite_type<S: AsRef<str>>(&self, types: &[S]) -> Self {
        self.select(|site| !types.iter().any(|t| t.as_ref() == site.site_type()))
    }

    /// Sites with at least one available night.
    pub fn with_availability(&self) -> Self {
        self.select(Campsite::has_availability)
    }

    /// Replace each site's availability with the entry for it in
    /// `availability`. Sites without an entry end up with no availability.
    pub fn ingest_availability(&mut self, availability: &AvailabilityMap) {
        let mut matched = 0;
        for (id, site) in self.sites.iter_mut() {
            match availability.get(id) {
                Some(entry) => {
                    site.replace_availability(entry.availabilities.clone());
                    matched += 1;
                }
                None => site.replace_availability(BTreeMap::new()),
            }
        }
        debug!(
            "Ingested availability for {} of {} campsites",
            matched,
            self.sites.len()
        );
    }

    /// Run named filters in order over a copy of the catalog.
    pub fn apply_filters(&self, filters: &[FilterSpec]) -> Result<Self, ScanError> {
        FilterChain::<Self>::new(filters)?.apply(self)
    }

    fn select(&self, keep: impl Fn(&Campsite) -> bool) -> Self {
        Self {
            sites: self
                .sites
                .iter()
                .filter(|(_, site)| keep(*site))
                .map(|(id, site)| (id.clone(), site.clone()))
                .collect(),
        }
    }

    fn retain(mut self, keep: impl Fn(&Campsite) -> bool) -> Self {
        self.sites.retain(|_, site| keep(&*site));
        self
    }
}

fn equipment_filter(
    catalog: CampsiteCatalog,
    spec: &FilterSpec,
) -> Result<CampsiteCatalog, ScanError> {
    let equipment_name = spec.str_param(0, "equipment_name")?;
    let min_length = spec.f64_param(1, "min_length")?;
    Ok(catalog.retain(|site| site.supports_equipment(equipment_name, min_length)))
}

fn campsite_type_filter(
    catalog: CampsiteCatalog,
    spec: &FilterSpec,
) -> Result<CampsiteCatalog, ScanError> {
    let types = spec.string_list("types")?;
    Ok(catalog.retain(|site| types.iter().any(|t| t == site.site_type())))
}

fn exclude_campsite_type_filter(
    catalog: CampsiteCatalog,
    spec: &FilterSpec,
) -> Result<CampsiteCatalog, ScanError> {
    let types = spec.string_list("types")?;
    Ok(catalog.retain(|site| !types.iter().any(|t| t == site.site_type())))
}

fn with_availability_filter(
    catalog: CampsiteCatalog,
    _spec: &FilterSpec,
) -> Result<CampsiteCatalog, ScanError> {
    Ok(catalog.retain(Campsite::has_availability))
}

const CAMPSITE_FILTERS: &[(&str, FilterFn<CampsiteCatalog>)] = &[
    ("filter_by_equipment", equipment_filter),
    ("filter_by_campsite_type", campsite_type_filter),
    ("exclude_by_campsite_type", exclude_campsite_type_filter),
    ("with_availability", with_availability_filter),
];

impl Filterable for CampsiteCatalog {
    const KIND: &'static str = "campsite";

    fn registry() -> &'static [(&'static str, FilterFn<Self>)] {
        CAMPSITE_FILTERS
    }
}
