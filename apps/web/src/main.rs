mod analysis_client;
mod config;
mod errors;
mod intake;
mod models;
mod render;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis_client::RemoteAnalysisClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting StyleSense v{}", env!("CARGO_PKG_VERSION"));

    let analyzer = RemoteAnalysisClient::new(
        config.analyze_function_url.clone(),
        config.analyze_function_key.clone(),
        config.analyze_timeout,
    )?;
    info!(
        "Analysis client initialized (endpoint: {}, timeout: {:?})",
        analyzer.endpoint(),
        config.analyze_timeout
    );

    let sessions = Arc::new(SessionStore::new(config.session_idle));
    spawn_session_sweeper(Arc::clone(&sessions));

    let state = AppState {
        sessions,
        analyzer: Arc::new(analyzer),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drops sessions nobody has touched within the idle window.
fn spawn_session_sweeper(sessions: Arc<SessionStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let pruned = sessions.prune_idle(chrono::Utc::now());
            if pruned > 0 {
                debug!(pruned, remaining = sessions.len(), "Swept idle upload sessions");
            }
        }
    });
}
