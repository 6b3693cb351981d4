use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{PlaceRecord, PositionSample};

pub const FALLBACK_LATITUDE: &str = "17.9788";
pub const FALLBACK_LONGITUDE: &str = "15.8789";

/// A coordinate as it travels on the wire.
///
/// Live samples are sent as numbers; the fallback pair is sent as the
/// literal strings the collector has always received for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Degrees(f64),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRequest {
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    #[serde(flatten)]
    pub place: PlaceRecord,
}

impl DeliveryRequest {
    pub fn from_sample(sample: &PositionSample, place: PlaceRecord) -> Self {
        Self {
            latitude: Coordinate::Degrees(sample.latitude),
            longitude: Coordinate::Degrees(sample.longitude),
            place,
        }
    }

    pub fn fallback(place: PlaceRecord) -> Self {
        Self {
            latitude: Coordinate::Literal(FALLBACK_LATITUDE.into()),
            longitude: Coordinate::Literal(FALLBACK_LONGITUDE.into()),
            place,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub ok: bool,
    pub http_status: Option<u16>,
    pub body: Option<Value>,
}

impl DeliveryResult {
    /// Id the collector assigned to the stored record, read from a 201 body.
    pub fn location_id(&self) -> Option<u64> {
        self.body
            .as_ref()?
            .get("location")?
            .get("id")?
            .as_u64()
    }
}

/// The part of `GET /api/locations` the display layer reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationsSummary {
    #[serde(default)]
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_serializes_literal_pair_and_place() {
        let request = DeliveryRequest::fallback(PlaceRecord::fixed());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "latitude": "17.9788",
                "longitude": "15.8789",
                "street": "MG Road",
                "area": "Central Bangalore",
                "town": "Bangalore",
                "city": "Bangalore",
                "state": "Karnataka",
                "country": "India",
                "postalCode": "560001",
                "fullAddress": "MG Road, Central Bangalore, Bangalore, Karnataka, India",
            })
        );
    }

    #[test]
    fn live_sample_serializes_numbers() {
        let sample = PositionSample::new(12.9716, 77.5946);
        let request = DeliveryRequest::from_sample(&sample, PlaceRecord::fixed());
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value["latitude"], json!(12.9716));
        assert_eq!(value["longitude"], json!(77.5946));
    }

    #[test]
    fn location_id_reads_nested_id() {
        let result = DeliveryResult {
            ok: true,
            http_status: Some(201),
            body: Some(json!({"message": "Location stored successfully", "location": {"id": 7}})),
        };
        assert_eq!(result.location_id(), Some(7));

        let empty = DeliveryResult {
            ok: true,
            http_status: Some(201),
            body: None,
        };
        assert_eq!(empty.location_id(), None);
    }
}
