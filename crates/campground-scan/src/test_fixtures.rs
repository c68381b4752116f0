use serde_json::{Value, json};

use crate::campsite::Campsite;

pub(crate) fn campsite_record() -> Value {
    json!({
        "CampsiteID": 1,
        "CampsiteName": "042",
        "CampsiteType": "Spam",
        "Loop": "Ni",
        "FacilityID": "1",
        "ATTRIBUTES": [
            {"AttributeName": "Eric Idle", "AttributeValue": "Brave Sir Robin"},
            {"AttributeName": "John Cleese", "AttributeValue": "Sir Lancelot"},
            {"AttributeName": "Black Knight Injuries", "AttributeValue": "Just a flesh wound."}
        ],
        "availabilities": {
            "2021-01-01T00:00:00Z": "Available",
            "2021-01-02T00:00:00Z": "Available",
            "2021-01-03T00:00:00Z": "Reserved",
            "2021-01-04T00:00:00Z": "Not Available",
            "2021-01-05T00:00:00Z": "Not Available",
            "2021-01-06T00:00:00Z": "Available",
            "2021-01-07T00:00:00Z": "Not Available",
            "2021-01-08T00:00:00Z": "Not Available"
        },
        "PERMITTEDEQUIPMENT": [
            {"EquipmentName": "Tent", "MaxLength": 10},
            {"EquipmentName": "Spam", "MaxLength": 100},
            {"EquipmentName": "Trailer", "MaxLength": 40}
        ]
    })
}

/// Nine sites already in (loop, name) order.
pub(crate) fn sorted_campsites() -> Vec<Campsite> {
    let base = campsite_record();
    [
        (223, "A", "001"),
        (133, "A", "002"),
        (113, "A", "004"),
        (153, "B", "101"),
        (213, "B", "102"),
        (155, "C", "001"),
        (134, "C", "011"),
        (625, "C", "021"),
        (234, "C", "031"),
    ]
    .into_iter()
    .map(|(id, loop_name, name)| {
        let mut record = base.clone();
        record["CampsiteID"] = json!(id);
        record["CampsiteType"] = json!("lame");
        record["Loop"] = json!(loop_name);
        record["CampsiteName"] = json!(name);
        Campsite::from_record(record).unwrap()
    })
    .collect()
}
