//! Supabase / analytics starter server
//!
//! Serves the demo JSON API. Configuration comes from the environment
//! (optionally a `.env` file) and is read once at startup.

mod routes;
mod state;

use std::net::SocketAddr;

use axum::Router;
use starter_core::config::RuntimeConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::state::AppState;

fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::config::router())
        .merge(routes::supabase::router())
        .merge(routes::analytics::router())
        .merge(routes::counter::router())
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "starter_server=debug,starter_core=info,supabase_client=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenv {
        tracing::info!("Loaded environment from {:?}", path);
    }

    let config = RuntimeConfig::from_env();
    let state = AppState::from_config(&config);
    tracing::info!(
        "Supabase status: {} ({})",
        state.classification(),
        state.classification().label()
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
