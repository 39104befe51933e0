//! Public runtime configuration endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use starter_core::config::{Classification, PublicRuntimeConfig};

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigResponse {
    #[serde(flatten)]
    public: PublicRuntimeConfig,
    status: Classification,
    status_label: &'static str,
    demo_mode: bool,
}

async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let classification = state.classification();
    Json(ConfigResponse {
        public: state.public_config().clone(),
        status: classification,
        status_label: classification.label(),
        demo_mode: classification.is_demo(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/config", get(get_config))
}
