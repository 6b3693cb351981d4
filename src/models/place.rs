use serde::{Deserialize, Serialize};

/// Descriptive address attached to every delivery.
///
/// No reverse geocoding happens; every delivery carries [`PlaceRecord::fixed`].
/// A geocoder can produce this type instead without touching the schedulers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub street: String,
    pub area: String,
    pub town: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub full_address: String,
}

impl PlaceRecord {
    pub fn fixed() -> Self {
        Self {
            street: "MG Road".into(),
            area: "Central Bangalore".into(),
            town: "Bangalore".into(),
            city: "Bangalore".into(),
            state: "Karnataka".into(),
            country: "India".into(),
            postal_code: "560001".into(),
            full_address: "MG Road, Central Bangalore, Bangalore, Karnataka, India".into(),
        }
    }
}

impl Default for PlaceRecord {
    fn default() -> Self {
        Self::fixed()
    }
}
