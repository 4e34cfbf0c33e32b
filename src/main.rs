//! Atendos decision service: binary entrypoint
//! Boots the Axum HTTP server: env, tracing, engine config, router, metrics.

use atendos_engine::{app_from_config, metrics::Metrics, EngineConfig};
use shuttle_axum::ShuttleAxum;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default, JSON when `ATENDOS_LOG_JSON=1`.
/// `try_init` because the deployment runtime may already own the global subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("atendos_engine=info,warn"));

    let json = std::env::var("ATENDOS_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    if json {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init();
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let path = EngineConfig::config_path();
    let config = EngineConfig::load_from(&path)?;

    // Missing credentials are fatal: fail startup instead of failing every message.
    let mut router = app_from_config(&config, Some(path)).map_err(anyhow::Error::from)?;

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => warn!(error = %e, "metrics disabled"),
    }

    info!(model = %config.model_name, "decision service ready");
    Ok(router.into())
}
