//! Analytics demo endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use starter_core::analytics::{AnalyticsEvent, DemoEvent, TrackOutcome};

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type RouteError = (StatusCode, Json<ErrorResponse>);

fn route_error(status: StatusCode, error: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsStatus {
    gtag_id: Option<String>,
    status_label: String,
    configured: bool,
    delivery_enabled: bool,
    demo_events: Vec<&'static str>,
    last_event: Option<TrackOutcome>,
}

#[derive(Debug, Deserialize)]
struct EventRequest {
    name: String,
    #[serde(default)]
    params: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct PageViewRequest {
    path: String,
    #[serde(default)]
    title: String,
}

/// GET /api/analytics
async fn get_status(State(state): State<AppState>) -> Json<AnalyticsStatus> {
    let tracker = state.analytics();
    Json(AnalyticsStatus {
        gtag_id: tracker.gtag_id().map(str::to_string),
        status_label: tracker.status_label().to_string(),
        configured: tracker.is_configured(),
        delivery_enabled: tracker.has_sink(),
        demo_events: DemoEvent::ALL.iter().map(DemoEvent::as_str).collect(),
        last_event: tracker.last_event().await,
    })
}

/// POST /api/analytics/demo/{event}
async fn track_demo(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TrackOutcome>, RouteError> {
    let event = DemoEvent::parse(&name).ok_or_else(|| {
        route_error(
            StatusCode::NOT_FOUND,
            format!("Unknown demo event: {}", name),
        )
    })?;

    Ok(Json(state.analytics().track(event.to_event()).await))
}

/// POST /api/analytics/events
async fn track_event(
    State(state): State<AppState>,
    Json(req): Json<EventRequest>,
) -> Result<Json<TrackOutcome>, RouteError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(route_error(
            StatusCode::BAD_REQUEST,
            "Event name is required",
        ));
    }

    let event = AnalyticsEvent {
        name: name.to_string(),
        params: req.params,
    };
    Ok(Json(state.analytics().track(event).await))
}

/// POST /api/analytics/page-view
async fn track_page_view(
    State(state): State<AppState>,
    Json(req): Json<PageViewRequest>,
) -> Json<TrackOutcome> {
    let event = AnalyticsEvent::page_view(req.path, req.title);
    Json(state.analytics().track(event).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/analytics", get(get_status))
        .route("/api/analytics/demo/{event}", post(track_demo))
        .route("/api/analytics/events", post(track_event))
        .route("/api/analytics/page-view", post(track_page_view))
}
