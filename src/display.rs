//! What the app screen shows: the collector's record count, read once at
//! startup, and the raw lifecycle state.

use log::error;
use serde::Serialize;

use crate::delivery::DeliveryClient;
use crate::models::HostLifecycle;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayModel {
    pub location_count: u64,
    pub app_state: HostLifecycle,
}

impl DisplayModel {
    /// Fetch the count once. A failed fetch shows zero.
    pub async fn load(client: &DeliveryClient, app_state: HostLifecycle) -> Self {
        let location_count = match client.fetch_location_count().await {
            Ok(count) => count,
            Err(err) => {
                error!("Error fetching locations count: {err}");
                0
            }
        };

        Self {
            location_count,
            app_state,
        }
    }

    pub fn set_app_state(&mut self, app_state: HostLifecycle) {
        self.app_state = app_state;
    }

    pub fn render(&self) -> String {
        format!(
            "Location Post Count: {}\nApp State: {}",
            self.location_count, self.app_state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn loads_count_once() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"locations": [], "count": 5})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = DeliveryClient::new(mock_server.uri()).unwrap();
        let mut model = DisplayModel::load(&client, HostLifecycle::Active).await;
        model.set_app_state(HostLifecycle::Background);

        assert_eq!(model.render(), "Location Post Count: 5\nApp State: background");
    }

    #[tokio::test]
    async fn failed_fetch_shows_zero() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = DeliveryClient::new(mock_server.uri()).unwrap();
        let model = DisplayModel::load(&client, HostLifecycle::Active).await;

        assert_eq!(model.location_count, 0);
    }
}
