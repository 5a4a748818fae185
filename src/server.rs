//! HTTP surface
//!
//! Thin handlers over [`PollCycle`] and [`SightingStore`]: area lookups,
//! on-demand poll cycles, manual webhook posts and operator access to the
//! sighting state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    errors::AisWatchError,
    formatter::format_summary,
    geometry::{extract_geometry, load_geometry_file},
    models::VesselSighting,
    notifier::Notifier,
    poll::PollCycle,
    store::SightingStore,
};

/// Minimum time between two manual posts to the webhook
const NOTIFY_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AppState {
    pub cycle: Arc<PollCycle>,
    /// GeoJSON file with the monitored area
    pub geojson_path: Arc<PathBuf>,
    /// Webhook for manual posts, None when not configured
    webhook: Option<Arc<dyn Notifier>>,
    last_post: Arc<Mutex<Option<Instant>>>,
}

impl AppState {
    pub fn new(cycle: Arc<PollCycle>, geojson_path: PathBuf) -> Self {
        Self {
            cycle,
            geojson_path: Arc::new(geojson_path),
            webhook: None,
            last_post: Arc::new(Mutex::new(None)),
        }
    }

    /// Enable `POST /notify` through `webhook`
    pub fn with_webhook(mut self, webhook: Arc<dyn Notifier>) -> Self {
        self.webhook = Some(webhook);
        self
    }

    fn store(&self) -> &Arc<SightingStore> {
        self.cycle.store()
    }

    fn monitored_area(&self) -> Result<Value, ApiError> {
        load_geometry_file(&self.geojson_path).map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

/// Error responses, rendered as `{"error": ...}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotConfigured(String),
    RateLimited,
    Upstream(String),
    Storage(AisWatchError),
}

impl ApiError {
    /// Classify an error from an area lookup or poll cycle
    fn from_cycle(err: AisWatchError) -> Self {
        if err.is_input_validation() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Upstream(err.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<AisWatchError> for ApiError {
    fn from(err: AisWatchError) -> Self {
        ApiError::Storage(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotConfigured(message) => (StatusCode::NOT_IMPLEMENTED, message),
            ApiError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "Rate limited".to_string()),
            ApiError::Upstream(message) => {
                (StatusCode::BAD_GATEWAY, format!("Upstream error: {message}"))
            }
            ApiError::Storage(err) => {
                error!("Sighting state query failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database query failed".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/ships", get(ships_in_monitored_area).post(ships_in_area))
        .route("/poll", post(poll))
        .route("/notify", post(notify))
        .route("/data", get(list_rows).delete(clear_rows))
        .route("/data/count", get(count_rows))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
    }))
}

async fn ships_in_monitored_area(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let geometry = state.monitored_area()?;
    ships(&state, &geometry).await
}

async fn ships_in_area(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(payload) = payload?;
    if payload.is_null() {
        return Err(ApiError::BadRequest("Expected JSON body".to_string()));
    }
    let geometry = extract_geometry(payload).map_err(ApiError::from_cycle)?;
    ships(&state, &geometry).await
}

async fn ships(state: &AppState, geometry: &Value) -> ApiResult<Json<Value>> {
    let snapshot = state
        .cycle
        .snapshot(geometry, Utc::now())
        .await
        .map_err(ApiError::from_cycle)?;

    Ok(Json(json!({
        "count": snapshot.sightings.len(),
        "features": snapshot.sightings,
        "area_km2": (snapshot.area_km2 * 1000.0).round() / 1000.0,
    })))
}

async fn poll(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let geometry = state.monitored_area()?;
    let report = state
        .cycle
        .run(&geometry)
        .await
        .map_err(ApiError::from_cycle)?;
    Ok(Json(json!(report)))
}

#[derive(Debug, Default, Deserialize)]
struct NotifyRequest {
    #[serde(default)]
    ships: Vec<VesselSighting>,
}

/// Post a list of vessels to the webhook, at most once per
/// [`NOTIFY_INTERVAL`]. An empty body or list posts nothing.
async fn notify(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Value>> {
    let Some(webhook) = state.webhook.as_ref() else {
        return Err(ApiError::NotConfigured("Slack not configured".to_string()));
    };

    let mut last_post = state.last_post.lock().await;
    if last_post.is_some_and(|at| at.elapsed() < NOTIFY_INTERVAL) {
        return Err(ApiError::RateLimited);
    }

    let request: NotifyRequest = if body.is_empty() {
        NotifyRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))?
    };
    if request.ships.is_empty() {
        return Ok(Json(json!({ "ok": true, "notified": 0 })));
    }

    webhook
        .send(&format_summary(&request.ships))
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;
    *last_post = Some(Instant::now());
    info!("Posted {} vessels to the webhook", request.ships.len());

    Ok(Json(json!({ "ok": true, "notified": request.ships.len() })))
}

async fn list_rows(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let rows = state.store().rows().await?;
    Ok(Json(json!({ "rows": rows })))
}

async fn count_rows(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let count = state.store().count().await?;
    Ok(Json(json!({ "count": count })))
}

async fn clear_rows(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let deleted = state.store().clear_all().await?;
    Ok(Json(json!({ "deleted": deleted })))
}
