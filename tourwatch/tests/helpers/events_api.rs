//! In-process fake of the artist events API
//!
//! Serves `/artists/:artist/events` on an ephemeral localhost port with a
//! canned status and body, and records every request it sees.

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tourwatch_common::config::TourSettings;

/// Request as seen by the fake server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Artist path segment after percent-decoding
    pub artist: String,
    /// Query string exactly as sent
    pub raw_query: Option<String>,
}

#[derive(Debug, Clone)]
struct CannedResponse {
    status: StatusCode,
    body: String,
    delay: Duration,
}

#[derive(Clone)]
struct ApiState {
    response: Arc<Mutex<CannedResponse>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct FakeEventsApi {
    pub base_url: String,
    state: ApiState,
}

impl FakeEventsApi {
    /// Start serving `body` with `status`
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        let state = ApiState {
            response: Arc::new(Mutex::new(CannedResponse {
                status,
                body: body.into(),
                delay: Duration::ZERO,
            })),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/artists/:artist/events", get(events_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/artists/", addr),
            state,
        }
    }

    /// Start serving a JSON array of listings with 200 OK
    pub async fn with_listings(listings: Vec<Value>) -> Self {
        Self::start(StatusCode::OK, Value::Array(listings).to_string()).await
    }

    pub fn set_response(&self, status: StatusCode, body: impl Into<String>) {
        let mut response = self.state.response.lock().unwrap();
        response.status = status;
        response.body = body.into();
    }

    pub fn set_listings(&self, listings: Vec<Value>) {
        self.set_response(StatusCode::OK, Value::Array(listings).to_string());
    }

    pub fn set_delay(&self, delay: Duration) {
        self.state.response.lock().unwrap().delay = delay;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn events_handler(
    State(state): State<ApiState>,
    Path(artist): Path<String>,
    RawQuery(raw_query): RawQuery,
) -> (StatusCode, String) {
    state
        .requests
        .lock()
        .unwrap()
        .push(RecordedRequest { artist, raw_query });

    let response = state.response.lock().unwrap().clone();
    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }
    (response.status, response.body)
}

/// One raw listing in the events API shape
pub fn listing(country: &str, city: &str, datetime: &str) -> Value {
    json!({
        "id": "1001",
        "artist_id": "41",
        "venue": {
            "name": "Main Hall",
            "country": country,
            "region": "",
            "city": city,
            "latitude": "0.0",
            "longitude": "0.0"
        },
        "datetime": datetime,
        "lineup": ["Sum 41"]
    })
}

/// Default settings pointed at the fake server
pub fn settings_for(api: &FakeEventsApi) -> TourSettings {
    TourSettings {
        base_url: api.base_url.clone(),
        request_timeout: Duration::from_secs(5),
        ..TourSettings::default()
    }
}
