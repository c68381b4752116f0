use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use rec_gov::{AVAILABLE, RidbCampsite};
use serde_json::Value;

use crate::consolidate::{DateRange, consolidate};
use crate::error::ScanError;

/// Detail page of a campsite on recreation.gov.
pub const CAMPSITE_URL: &str = "https://www.recreation.gov/camping/campsites";

/// A reservable site, typed from its RIDB record.
///
/// Everything except the availability map is read once from the record and
/// never changes; availability is only swapped through
/// [`Campsite::replace_availability`].
#[derive(Debug, Clone, PartialEq)]
pub struct Campsite {
    id: String,
    name: String,
    loop_name: String,
    site_type: String,
    facility_id: String,
    attributes: BTreeMap<String, String>,
    permitted_equipment: BTreeMap<String, f64>,
    availabilities: BTreeMap<String, String>,
    record: Value,
}

impl Campsite {
    /// Build a campsite from a raw RIDB campsite record.
    ///
    /// Fails with [`ScanError::DataFormat`] when a required field is missing.
    pub fn from_record(record: Value) -> Result<Self, ScanError> {
        let wire: RidbCampsite = serde_json::from_value(record.clone())?;

        Ok(Self {
            id: wire.campsite_id,
            name: wire.campsite_name,
            loop_name: wire.campsite_loop,
            site_type: wire.campsite_type,
            facility_id: wire.facility_id,
            attributes: wire
                .attributes
                .into_iter()
                .map(|a| (a.attribute_name, a.attribute_value))
                .collect(),
            permitted_equipment: wire
                .permitted_equipment
                .into_iter()
                .map(|e| (e.equipment_name, e.max_length))
                .collect(),
            availabilities: wire.availabilities,
            record,
        })
    }

    /// Campsite id, unique within a facility.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Site label, e.g. `"042"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Loop the site belongs to.
    pub fn loop_name(&self) -> &str {
        &self.loop_name
    }

    /// RIDB campsite type, e.g. `"STANDARD NONELECTRIC"`.
    pub fn site_type(&self) -> &str {
        &self.site_type
    }

    /// Facility (asset) the site belongs to.
    pub fn facility_id(&self) -> &str {
        &self.facility_id
    }

    /// Attribute name to value.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Equipment name to maximum permitted length.
    pub fn permitted_equipment_lengths(&self) -> &BTreeMap<String, f64> {
        &self.permitted_equipment
    }

    /// Raw availability, date key to status.
    pub fn availabilities(&self) -> &BTreeMap<String, String> {
        &self.availabilities
    }

    /// The RIDB record this campsite was built from.
    pub fn record(&self) -> &Value {
        &self.record
    }

    /// Whether equipment longer than `equipment_length` fits.
    ///
    /// Equipment the site does not list counts as length -1.
    pub fn supports_equipment(&self, equipment_name: &str, equipment_length: f64) -> bool {
        self.permitted_equipment
            .get(equipment_name)
            .copied()
            .unwrap_or(-1.0)
            > equipment_length
    }

    /// Swap in availability from the month endpoint.
    pub fn replace_availability(&mut self, availabilities: BTreeMap<String, String>) {
        self.availabilities = availabilities;
    }

    /// Whether at least one night is available.
    pub fn has_availability(&self) -> bool {
        self.availabilities.values().any(|status| status == AVAILABLE)
    }

    /// Number of nights whose status is available.
    pub fn available_nights(&self) -> usize {
        self.availabilities
            .values()
            .filter(|status| *status == AVAILABLE)
            .count()
    }

    /// Available nights collapsed into ranges, in date order.
    pub fn available_ranges(&self) -> Vec<DateRange> {
        consolidate(&self.availabilities)
    }

    /// Available ranges rendered as `2021-01-01 to 2021-01-02` or `2021-01-06`.
    pub fn availability_summary(&self) -> Vec<String> {
        self.available_ranges()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Link to the site's detail page.
    pub fn site_url(&self) -> String {
        format!("{}/{}", CAMPSITE_URL, self.id)
    }

    /// Presentation order: by loop, then by name.
    pub fn cmp_by_location(&self, other: &Self) -> Ordering {
        (self.loop_name.as_str(), self.name.as_str())
            .cmp(&(other.loop_name.as_str(), other.name.as_str()))
    }
}

impl fmt::Display for Campsite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<campsite id={:?} name={:?} type={:?} facility={:?} loop={:?} />",
            self.id, self.name, self.site_type, self.facility_id, self.loop_name
        )
    }
}
