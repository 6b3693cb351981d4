use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;

use crate::delivery::{LOCATIONS_PATH, STORE_LOCATION_PATH};

use super::store::{LocationStore, NewLocation, StoredLocation};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

pub const DELETE_LOCATIONS_PATH: &str = "/api/delete-locations";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreResponse {
    pub message: String,
    pub location: StoredLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationsResponse {
    pub locations: Vec<StoredLocation>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn router(store: Arc<LocationStore>) -> Router {
    Router::new()
        .route(STORE_LOCATION_PATH, post(store_location))
        .route(LOCATIONS_PATH, get(list_locations))
        .route(DELETE_LOCATIONS_PATH, delete(delete_locations))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// Anything that is not a JSON object counts as an empty record, so a
/// missing, malformed or form-encoded body ends in the same 400 as a
/// missing field.
fn parse_location(body: &[u8]) -> NewLocation {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
        _ => NewLocation::default(),
    }
}

/// `POST /api/store-location`
async fn store_location(State(store): State<Arc<LocationStore>>, body: Bytes) -> Response {
    match store.insert(parse_location(&body)) {
        Ok(location) => (
            StatusCode::CREATED,
            Json(StoreResponse {
                message: "Location stored successfully".to_owned(),
                location,
            }),
        )
            .into_response(),
        Err(err) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
    }
}

/// `GET /api/locations`
async fn list_locations(State(store): State<Arc<LocationStore>>) -> Json<LocationsResponse> {
    let locations = store.list();
    Json(LocationsResponse {
        count: locations.len(),
        locations,
    })
}

/// `DELETE /api/delete-locations`
async fn delete_locations(State(store): State<Arc<LocationStore>>) -> Json<MessageResponse> {
    let removed = store.clear();
    log_info!("Deleted {removed} stored locations");
    Json(MessageResponse {
        message: "All locations have been deleted.".to_owned(),
    })
}

/// The collector bound to a local address and serving in a background task.
pub struct CollectorServer {
    addr: SocketAddr,
    store: Arc<LocationStore>,
    handle: JoinHandle<()>,
}

impl CollectorServer {
    /// Bind `bind_addr` (port `0` picks a free port) and start serving.
    pub async fn start(bind_addr: &str) -> Result<Self> {
        let store = Arc::new(LocationStore::new());
        let app = router(Arc::clone(&store));

        let listener = TcpListener::bind(bind_addr)
            .await
            .with_context(|| format!("collector failed to bind {bind_addr}"))?;
        let addr = listener
            .local_addr()
            .context("collector failed to read its local address")?;

        log_info!("Server is running on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log_error!("collector server error: {e}");
            }
        });

        Ok(Self {
            addr,
            store,
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn store(&self) -> &Arc<LocationStore> {
        &self.store
    }

    /// Serve until the task ends or fails.
    pub async fn wait(mut self) -> Result<()> {
        (&mut self.handle)
            .await
            .context("collector server task failed to join")
    }
}

impl Drop for CollectorServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_bodies_parse_as_empty() {
        let bodies: [&[u8]; 5] = [b"", b"[]", b"latitude=1&longitude=2", b"null", b"\"text\""];
        for body in bodies {
            assert!(LocationStore::new().insert(parse_location(body)).is_err());
        }
    }

    #[test]
    fn object_body_keeps_its_fields() {
        let location = parse_location(br#"{"latitude": 1.5, "postalCode": "560001"}"#);
        assert_eq!(location.latitude, Some(json!(1.5)));
        assert_eq!(location.postal_code, Some(json!("560001")));
        assert_eq!(location.street, None);
    }
}
