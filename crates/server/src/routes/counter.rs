//! Counter store endpoints

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use starter_core::counter::CounterSnapshot;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct MessageRequest {
    message: String,
}

async fn get_counter(State(state): State<AppState>) -> Json<CounterSnapshot> {
    Json(state.counter().snapshot().await)
}

async fn increment(State(state): State<AppState>) -> Json<CounterSnapshot> {
    Json(state.counter().increment().await)
}

async fn decrement(State(state): State<AppState>) -> Json<CounterSnapshot> {
    Json(state.counter().decrement().await)
}

async fn reset(State(state): State<AppState>) -> Json<CounterSnapshot> {
    Json(state.counter().reset().await)
}

async fn set_message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Json<CounterSnapshot> {
    Json(state.counter().set_message(req.message).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/counter", get(get_counter))
        .route("/api/counter/increment", post(increment))
        .route("/api/counter/decrement", post(decrement))
        .route("/api/counter/reset", post(reset))
        .route("/api/counter/message", put(set_message))
}
