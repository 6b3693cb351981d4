//! The collector service: an in-memory, append-only record of delivered
//! positions behind a small HTTP API.
//!
//! ## Endpoints
//!
//! - `POST /api/store-location`: store one record, all ten fields required
//! - `GET /api/locations`: every stored record plus a count
//! - `DELETE /api/delete-locations`: clear the store

mod server;
mod store;

pub use server::{
    router, CollectorServer, ErrorResponse, LocationsResponse, MessageResponse, StoreResponse,
    DELETE_LOCATIONS_PATH,
};
pub use store::{LocationStore, MissingFields, NewLocation, StoredLocation};
