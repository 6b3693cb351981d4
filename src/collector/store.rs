use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record as the collector keeps it. Field values are stored exactly as
/// received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredLocation {
    pub id: u64,
    pub latitude: Value,
    pub longitude: Value,
    pub street: Value,
    pub area: Value,
    pub town: Value,
    pub city: Value,
    pub state: Value,
    pub country: Value,
    pub postal_code: Value,
    pub full_address: Value,
}

/// An incoming store request; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
    pub street: Option<Value>,
    pub area: Option<Value>,
    pub town: Option<Value>,
    pub city: Option<Value>,
    pub state: Option<Value>,
    pub country: Option<Value>,
    pub postal_code: Option<Value>,
    pub full_address: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("All fields are required")]
pub struct MissingFields;

/// Missing, null, `false` and empty strings do not count as a value.
/// Zero does, unlike a plain truthiness check: `0.0` is a real latitude
/// (the equator) and a real longitude (Greenwich).
fn present(value: Option<Value>) -> Result<Value, MissingFields> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Err(MissingFields),
        Some(Value::String(s)) if s.is_empty() => Err(MissingFields),
        Some(value) => Ok(value),
    }
}

struct StoreState {
    locations: Vec<StoredLocation>,
    next_id: u64,
}

/// Append-only record store. Ids start at 1 and keep increasing across
/// clears.
pub struct LocationStore {
    state: Mutex<StoreState>,
}

impl Default for LocationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                locations: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn insert(&self, location: NewLocation) -> Result<StoredLocation, MissingFields> {
        let NewLocation {
            latitude,
            longitude,
            street,
            area,
            town,
            city,
            state,
            country,
            postal_code,
            full_address,
        } = location;

        let latitude = present(latitude)?;
        let longitude = present(longitude)?;
        let street = present(street)?;
        let area = present(area)?;
        let town = present(town)?;
        let city = present(city)?;
        let state_value = present(state)?;
        let country = present(country)?;
        let postal_code = present(postal_code)?;
        let full_address = present(full_address)?;

        let mut guard = self.lock();
        let stored = StoredLocation {
            id: guard.next_id,
            latitude,
            longitude,
            street,
            area,
            town,
            city,
            state: state_value,
            country,
            postal_code,
            full_address,
        };
        guard.next_id += 1;
        guard.locations.push(stored.clone());
        Ok(stored)
    }

    pub fn list(&self) -> Vec<StoredLocation> {
        self.lock().locations.clone()
    }

    pub fn count(&self) -> usize {
        self.lock().locations.len()
    }

    /// Remove every record; returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut guard = self.lock();
        let removed = guard.locations.len();
        guard.locations.clear();
        removed
    }
}
