use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Status string the month endpoint uses for a bookable night.
pub const AVAILABLE: &str = "Available";

/// One page of a RIDB list endpoint.
#[derive(Debug, Deserialize)]
pub struct RidbPage {
    /// Records on this page, left as raw JSON objects.
    #[serde(rename = "RECDATA")]
    pub rec_data: Vec<Value>,

    /// Paging metadata.
    #[serde(rename = "METADATA")]
    pub metadata: RidbMetadata,
}

/// `METADATA` block of a RIDB page.
#[derive(Debug, Deserialize)]
pub struct RidbMetadata {
    /// Count block.
    #[serde(rename = "RESULTS")]
    pub results: RidbResults,
}

/// Record counts reported by RIDB alongside each page.
#[derive(Debug, Deserialize)]
pub struct RidbResults {
    /// Number of records on this page.
    #[serde(rename = "CURRENT_COUNT")]
    pub current_count: usize,

    /// Number of records across all pages.
    #[serde(rename = "TOTAL_COUNT")]
    pub total_count: usize,
}

/// A campsite record from `facilities/{id}/campsites`.
#[derive(Debug, Clone, Deserialize)]
pub struct RidbCampsite {
    /// RIDB campsite id, also the recreation.gov site id
    #[serde(rename = "CampsiteID", deserialize_with = "string_or_number")]
    pub campsite_id: String,

    /// Site label within its loop, e.g. `"001"`
    #[serde(rename = "CampsiteName")]
    pub campsite_name: String,

    /// Space separated type, e.g. `"STANDARD NONELECTRIC"`
    #[serde(rename = "CampsiteType")]
    pub campsite_type: String,

    /// Loop the site belongs to
    #[serde(rename = "Loop")]
    pub campsite_loop: String,

    /// Campground (facility) the site belongs to
    #[serde(rename = "FacilityID", deserialize_with = "string_or_number")]
    pub facility_id: String,

    /// Free-form site attributes
    #[serde(rename = "ATTRIBUTES", default)]
    pub attributes: Vec<RidbAttribute>,

    /// Equipment the site accepts
    #[serde(rename = "PERMITTEDEQUIPMENT", default)]
    pub permitted_equipment: Vec<RidbEquipment>,

    /// Date to status map, present only on records that already carry
    /// availability data.
    #[serde(default)]
    pub availabilities: BTreeMap<String, String>,
}

/// Name/value attribute attached to a campsite.
#[derive(Debug, Clone, Deserialize)]
pub struct RidbAttribute {
    /// Attribute name, e.g. `"Shade"`
    #[serde(rename = "AttributeName")]
    pub attribute_name: String,

    /// Attribute value as sent by RIDB
    #[serde(rename = "AttributeValue")]
    pub attribute_value: String,
}

/// Equipment a campsite accepts, with its maximum length in feet.
#[derive(Debug, Clone, Deserialize)]
pub struct RidbEquipment {
    /// Equipment kind, e.g. `"Trailer"`
    #[serde(rename = "EquipmentName")]
    pub equipment_name: String,

    /// Longest accepted length in feet
    #[serde(rename = "MaxLength")]
    pub max_length: f64,
}

/// Response of the internal `camps/availability/campground/{id}/month` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthAvailability {
    /// Per-site availability keyed by campsite id.
    pub campsites: BTreeMap<String, SiteAvailability>,
}

/// Availability of a single campsite as reported by the month endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteAvailability {
    /// Timestamp (`2021-06-01T00:00:00Z`) to status string.
    #[serde(default)]
    pub availabilities: BTreeMap<String, String>,

    /// Campsite id, repeated from the map key
    #[serde(default)]
    pub campsite_id: Option<String>,

    /// Campsite type, e.g. `"STANDARD NONELECTRIC"`
    #[serde(default)]
    pub campsite_type: Option<String>,

    /// Loop the site belongs to
    #[serde(rename = "loop", default)]
    pub campsite_loop: Option<String>,

    /// Site label, e.g. `"042"` or `"GROUP A"`.
    #[serde(default)]
    pub site: Option<String>,

    /// Every other field of the payload, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Accepts ids sent either as JSON strings or as integers.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Unsigned(n) => n.to_string(),
        Id::Signed(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_campsite_record_accepts_numeric_ids() {
        let record = json!({
            "CampsiteID": 1,
            "CampsiteName": "042",
            "CampsiteType": "STANDARD NONELECTRIC",
            "Loop": "A",
            "FacilityID": "232447",
            "PERMITTEDEQUIPMENT": [{"EquipmentName": "Tent", "MaxLength": 10}]
        });

        let campsite: RidbCampsite = serde_json::from_value(record).unwrap();
        assert_eq!(campsite.campsite_id, "1");
        assert_eq!(campsite.facility_id, "232447");
        assert!(campsite.attributes.is_empty());
        assert_eq!(campsite.permitted_equipment[0].max_length, 10.0);
        assert!(campsite.availabilities.is_empty());
    }

    #[test]
    fn test_campsite_record_missing_field_fails() {
        let record = json!({"CampsiteID": "1", "CampsiteName": "042"});
        assert!(serde_json::from_value::<RidbCampsite>(record).is_err());
    }

    #[test]
    fn test_month_payload_keeps_unknown_fields() {
        let payload = json!({
            "campsites": {
                "101": {
                    "availabilities": {"2021-06-01T00:00:00Z": "Available"},
                    "campsite_id": "101",
                    "campsite_type": "STANDARD NONELECTRIC",
                    "loop": "A",
                    "site": "001",
                    "max_num_people": 6
                }
            }
        });

        let month: MonthAvailability = serde_json::from_value(payload).unwrap();
        let site = &month.campsites["101"];
        assert_eq!(site.campsite_loop.as_deref(), Some("A"));
        assert_eq!(site.extra["max_num_people"], json!(6));
        assert_eq!(site.availabilities.len(), 1);
    }
}
