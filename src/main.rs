//! rally-score binary entrypoint wiring the scoreboard REST API, SSE and the result sink.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rally_score::{
    config::AppConfig,
    dao::memory::MemoryResultSink,
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);

    install_result_sink(&app_state).await?;

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Pick the result sink from the environment.
///
/// `RESULTS_SINK=memory` keeps results in process. Otherwise `RESULTS_URL`
/// selects the HTTP sink; without it the service stays in degraded mode and
/// finished matches cannot be submitted.
async fn install_result_sink(state: &SharedState) -> anyhow::Result<()> {
    if env::var("RESULTS_SINK").is_ok_and(|value| value.eq_ignore_ascii_case("memory")) {
        info!("using in-memory result sink");
        state
            .install_result_sink(Arc::new(MemoryResultSink::new()))
            .await;
        return Ok(());
    }

    install_http_sink(state).await
}

#[cfg(feature = "http-sink")]
async fn install_http_sink(state: &SharedState) -> anyhow::Result<()> {
    use rally_score::dao::http::{HttpResultSink, HttpSinkConfig, HttpSinkError};

    match HttpSinkConfig::from_env() {
        Ok(config) => {
            let sink = HttpResultSink::new(config).context("building HTTP result sink")?;
            info!(endpoint = sink.endpoint(), "posting match results over HTTP");
            state.install_result_sink(Arc::new(sink)).await;
        }
        Err(HttpSinkError::MissingEnvVar { var }) => {
            warn!(var, "no result storage configured; running in degraded mode");
        }
        Err(err) => return Err(err).context("reading HTTP result sink configuration"),
    }

    Ok(())
}

#[cfg(not(feature = "http-sink"))]
async fn install_http_sink(_state: &SharedState) -> anyhow::Result<()> {
    if env::var("RESULTS_URL").is_ok() {
        warn!("RESULTS_URL ignored: built without the `http-sink` feature");
    }
    warn!("no result storage configured; running in degraded mode");
    Ok(())
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
