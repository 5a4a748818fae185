//! BarentsWatch AIS client
//!
//! Two calls make up one fetch: the historic `mmsiinarea` endpoint lists the
//! vessels that reported from inside a polygon during a time window, then
//! `latest/combined` returns position and static data for those vessels in
//! batches. Both authenticate with an OAuth2 client-credentials token that is
//! cached until shortly before it expires.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    config::BarentsWatchConfig,
    errors::AisWatchError,
    models::{Mmsi, MmsiField, VesselSighting},
};

/// Tokens are refreshed this long before they expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;
const LENGTH_KEYS: [&str; 3] = ["length", "lengthoverall", "lengthOverall"];

/// Source of vessel sightings inside an area
#[async_trait]
pub trait VesselSource: Send + Sync {
    /// MMSIs of vessels that reported from inside `polygon` between `from`
    /// and `to`
    async fn find_vessels(
        &self,
        polygon: &Value,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Mmsi>, AisWatchError>;

    /// Latest sighting of each vessel
    async fn fetch_details(&self, mmsi: &[Mmsi]) -> Result<Vec<VesselSighting>, AisWatchError>;
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

pub struct BarentsWatchClient {
    http: reqwest::Client,
    config: BarentsWatchConfig,
    token: Mutex<Option<CachedToken>>,
}

impl BarentsWatchClient {
    pub fn new(config: BarentsWatchConfig) -> Result<Self, AisWatchError> {
        config.validate()?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    /// Bearer token for the next request
    async fn access_token(&self) -> Result<String, AisWatchError> {
        let credentials = match (&self.config.client_id, &self.config.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        };

        let Some((client_id, client_secret)) = credentials else {
            return self.config.access_token.clone().ok_or_else(|| {
                AisWatchError::TokenError(
                    "Missing client credentials or static access token".to_string(),
                )
            });
        };

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + TOKEN_EXPIRY_MARGIN < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        info!("Requesting BarentsWatch access token");
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("scope", "ais"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AisWatchError::TokenError(format!(
                "Token request failed: {} {}",
                status.as_u16(),
                body
            )));
        }

        let payload: TokenResponse = response.json().await?;
        let lifetime = payload.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        *cached = Some(CachedToken {
            value: payload.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });

        Ok(payload.access_token)
    }

    /// POST a JSON payload and return the JSON response
    async fn post_json(
        &self,
        operation: &'static str,
        url: &str,
        payload: &Value,
    ) -> Result<Value, AisWatchError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AisWatchError::UpstreamError {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl VesselSource for BarentsWatchClient {
    async fn find_vessels(
        &self,
        polygon: &Value,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Mmsi>, AisWatchError> {
        let payload = json!({
            "msgtimefrom": from.to_rfc3339_opts(SecondsFormat::Secs, false),
            "msgtimeto": to.to_rfc3339_opts(SecondsFormat::Secs, false),
            "polygon": polygon,
        });
        let data = self
            .post_json("mmsiinarea", &self.config.find_in_area_url, &payload)
            .await?;

        let mmsi = parse_mmsi_list(data)?;
        debug!("Found {} vessels in area", mmsi.len());
        Ok(mmsi)
    }

    async fn fetch_details(&self, mmsi: &[Mmsi]) -> Result<Vec<VesselSighting>, AisWatchError> {
        let mut sightings = Vec::with_capacity(mmsi.len());

        for chunk in mmsi.chunks(self.config.batch_size) {
            let payload = json!({ "mmsi": chunk });
            let data = self
                .post_json("latest/combined", &self.config.latest_combined_url, &payload)
                .await?;
            sightings.extend(parse_combined(data));
        }

        Ok(sightings)
    }
}

/// Normalise an `mmsiinarea` response: a list of integers, or of objects
/// carrying `mmsi`. Unusable entries are skipped.
fn parse_mmsi_list(data: Value) -> Result<Vec<Mmsi>, AisWatchError> {
    let Value::Array(items) = data else {
        return Err(AisWatchError::UpstreamError {
            operation: "mmsiinarea",
            status: 200,
            body: "Unexpected response for mmsiinarea".to_string(),
        });
    };

    Ok(items
        .into_iter()
        .filter_map(|item| {
            let raw = match item {
                Value::Object(mut object) => match object.remove("mmsi") {
                    Some(raw) => raw,
                    None => {
                        warn!("Skipping vessel in area without MMSI: {:?}", object);
                        return None;
                    }
                },
                other => other,
            };
            let field: MmsiField = serde_json::from_value(raw).ok()?;
            field
                .normalize()
                .map_err(|e| warn!("Skipping vessel in area: {}", e))
                .ok()
        })
        .collect())
}

/// Map a `latest/combined` response to sightings. Records that cannot be
/// read are skipped, a non-list response yields nothing.
fn parse_combined(data: Value) -> Vec<VesselSighting> {
    let Value::Array(items) = data else {
        warn!("Unexpected response for latest/combined, ignoring it");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match to_sighting(item) {
            Ok(sighting) => Some(sighting),
            Err(e) => {
                warn!("Skipping unreadable vessel record: {}", e);
                None
            }
        })
        .collect()
}

fn to_sighting(mut item: Value) -> Result<VesselSighting, serde_json::Error> {
    if let Some(object) = item.as_object_mut() {
        let length = LENGTH_KEYS
            .iter()
            .find_map(|key| object.get(*key).filter(|v| !v.is_null()).cloned())
            .unwrap_or(Value::Null);
        object.insert("length".to_string(), length);
    }
    serde_json::from_value(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShipType;
    use axum::{
        http::{header::AUTHORIZATION, HeaderMap, StatusCode},
        routing::post,
        Form, Json, Router,
    };
    use std::collections::HashMap;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn config(base: &str, batch_size: usize) -> BarentsWatchConfig {
        BarentsWatchConfig {
            client_id: None,
            client_secret: None,
            access_token: Some("token".to_string()),
            token_url: format!("{base}/connect/token"),
            find_in_area_url: format!("{base}/mmsiinarea"),
            latest_combined_url: format!("{base}/latest/combined"),
            batch_size,
            timeout: Duration::from_secs(5),
        }
    }

    fn mmsi(value: u32) -> Mmsi {
        Mmsi::try_from(value).unwrap()
    }

    #[test]
    fn parse_mmsi_list_of_numbers_and_objects() {
        let data = json!([257000001, {"mmsi": 257000002}, {"mmsi": "257000003"}, {"name": "x"}, "junk"]);
        let parsed = parse_mmsi_list(data).unwrap();
        assert_eq!(parsed, vec![mmsi(257000001), mmsi(257000002), mmsi(257000003)]);
    }

    #[test]
    fn parse_mmsi_list_rejects_non_list() {
        assert!(matches!(
            parse_mmsi_list(json!({"error": "nope"})),
            Err(AisWatchError::UpstreamError { .. })
        ));
    }

    #[test]
    fn combined_record_uses_length_overall() {
        let data = json!([{
            "mmsi": 123456789,
            "name": "Test Ship",
            "latitude": 1.0,
            "longitude": 2.0,
            "msgtime": "2023-01-01T00:00:00Z",
            "shipType": "Cargo",
            "destination": "Somewhere",
            "lengthoverall": 150,
            "speedOverGround": 12.5
        }]);
        let sightings = parse_combined(data);

        assert_eq!(sightings.len(), 1);
        assert_eq!(sightings[0].destination.as_deref(), Some("Somewhere"));
        assert_eq!(sightings[0].length, Some(150.0));
        assert_eq!(sightings[0].ship_type, Some(ShipType::Text("Cargo".to_string())));
    }

    #[test]
    fn combined_prefers_first_present_length() {
        let record = json!({"mmsi": 1, "length": null, "lengthOverall": 88.5});
        assert_eq!(to_sighting(record).unwrap().length, Some(88.5));
    }

    #[test]
    fn combined_skips_unreadable_records() {
        let data = json!(["junk", {"mmsi": 2}]);
        let sightings = parse_combined(data);
        assert_eq!(sightings.len(), 1);
        assert!(parse_combined(json!({"not": "a list"})).is_empty());
    }

    #[test]
    fn combined_keeps_records_with_mistyped_fields() {
        let data = json!([
            {"mmsi": 257000001, "msgtime": 1717243200},
            {"mmsi": 257000002, "name": 42},
            {"mmsi": 257000003, "name": "Ok", "latitude": "north", "lengthoverall": "long"}
        ]);
        let sightings = parse_combined(data);

        assert_eq!(sightings.len(), 3);
        assert_eq!(sightings[0].msgtime, None);
        assert_eq!(sightings[1].name, None);
        assert_eq!(sightings[2].name.as_deref(), Some("Ok"));
        assert_eq!(sightings[2].latitude, None);
        assert_eq!(sightings[2].length, None);
    }

    #[tokio::test]
    async fn static_token_without_credentials() {
        let client = BarentsWatchClient::new(config("http://127.0.0.1:9", 300)).unwrap();
        assert_eq!(client.access_token().await.unwrap(), "token");

        let mut no_auth = config("http://127.0.0.1:9", 300);
        no_auth.access_token = None;
        let client = BarentsWatchClient::new(no_auth).unwrap();
        assert!(matches!(
            client.access_token().await,
            Err(AisWatchError::TokenError(_))
        ));
    }

    /// Token endpoint that counts grants and hands out `expires_in`, next to
    /// an `mmsiinarea` endpoint that only accepts the granted token.
    async fn serve_with_token_endpoint(expires_in: u64, grants: Arc<AtomicUsize>) -> String {
        let app = Router::new()
            .route(
                "/connect/token",
                post(move |Form(form): Form<HashMap<String, String>>| {
                    let grants = grants.clone();
                    async move {
                        assert_eq!(form.get("grant_type").map(String::as_str), Some("client_credentials"));
                        assert_eq!(form.get("client_id").map(String::as_str), Some("id"));
                        assert_eq!(form.get("client_secret").map(String::as_str), Some("secret"));
                        assert_eq!(form.get("scope").map(String::as_str), Some("ais"));
                        let n = grants.fetch_add(1, Ordering::SeqCst) + 1;
                        Json(json!({"access_token": format!("granted-{n}"), "expires_in": expires_in}))
                    }
                }),
            )
            .route(
                "/mmsiinarea",
                post(|headers: HeaderMap| async move {
                    let authorized = headers
                        .get(AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .is_some_and(|v| v.starts_with("Bearer granted-"));
                    if authorized {
                        (StatusCode::OK, Json(json!([257000001])))
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!([])))
                    }
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await });
        base
    }

    fn credentials(base: &str) -> BarentsWatchConfig {
        BarentsWatchConfig {
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            access_token: None,
            ..config(base, 300)
        }
    }

    #[tokio::test]
    async fn client_credentials_token_is_cached() {
        let grants = Arc::new(AtomicUsize::new(0));
        let base = serve_with_token_endpoint(3600, grants.clone()).await;
        let client = BarentsWatchClient::new(credentials(&base)).unwrap();
        let now = Utc::now();

        for _ in 0..2 {
            let found = client
                .find_vessels(&json!({"type": "Polygon"}), now, now)
                .await
                .unwrap();
            assert_eq!(found, vec![mmsi(257000001)]);
        }
        assert_eq!(grants.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn token_is_refreshed_near_expiry() {
        let grants = Arc::new(AtomicUsize::new(0));
        // Inside the 30 s margin from the start, so every call needs a new one
        let base = serve_with_token_endpoint(20, grants.clone()).await;
        let client = BarentsWatchClient::new(credentials(&base)).unwrap();

        assert_eq!(client.access_token().await.unwrap(), "granted-1");
        assert_eq!(client.access_token().await.unwrap(), "granted-2");
        assert_eq!(grants.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rejected_token_request_is_a_token_error() {
        let app = Router::new().route(
            "/connect/token",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid_client") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await });

        let client = BarentsWatchClient::new(credentials(&base)).unwrap();
        let now = Utc::now();
        match client.find_vessels(&json!({"type": "Polygon"}), now, now).await {
            Err(AisWatchError::TokenError(message)) => {
                assert_eq!(message, "Token request failed: 401 invalid_client");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_details_in_batches() {
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = requests.clone();
        let app = Router::new().route(
            "/latest/combined",
            post(move |Json(body): Json<Value>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let records: Vec<Value> = body["mmsi"]
                        .as_array()
                        .cloned()
                        .unwrap_or_default()
                        .into_iter()
                        .map(|mmsi| json!({"mmsi": mmsi, "name": "Batch"}))
                        .collect();
                    Json(Value::Array(records))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await });

        let client = BarentsWatchClient::new(config(&base, 2)).unwrap();
        let ids: Vec<Mmsi> = (1..=5).map(mmsi).collect();
        let sightings = client.fetch_details(&ids).await.unwrap();

        assert_eq!(requests.load(Ordering::SeqCst), 3);
        assert_eq!(sightings.len(), 5);
        assert!(client.fetch_details(&[]).await.unwrap().is_empty());
        assert_eq!(requests.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn upstream_status_is_an_error() {
        let app = Router::new().route(
            "/mmsiinarea",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await });

        let client = BarentsWatchClient::new(config(&base, 300)).unwrap();
        let now = Utc::now();
        let result = client
            .find_vessels(&json!({"type": "Polygon"}), now, now)
            .await;

        match result {
            Err(AisWatchError::UpstreamError { status, body, .. }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "busy");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
