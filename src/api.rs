//! Thin HTTP wrapper around the decision engine for channel adapters.
//!
//! - `GET  /health`
//! - `POST /decide`               `{ customerMessage, trainingData, conversationHistory }`
//! - `GET  /debug/history?limit=` recent decisions (hashed ids only)
//! - `GET  /admin/reload-config`  re-read engine config and phrase lists from disk

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::decision::DecisionResult;
use crate::engine::{anon_hash, DecisionEngine, DecisionRequest};
use crate::error::EngineError;
use crate::history::{History, HistoryEntry};

#[derive(Clone)]
pub struct AppState {
    engine: Arc<RwLock<Arc<DecisionEngine>>>,
    history: Arc<History>,
    config_path: Option<PathBuf>,
}

impl AppState {
    /// `config_path` enables `/admin/reload-config`; `None` disables it.
    pub fn new(engine: DecisionEngine, config_path: Option<PathBuf>) -> Self {
        Self {
            engine: Arc::new(RwLock::new(Arc::new(engine))),
            history: Arc::new(History::default()),
            config_path,
        }
    }

    fn current_engine(&self) -> Arc<DecisionEngine> {
        self.engine
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/decide", post(decide))
        .route("/debug/history", get(debug_history))
        .route("/admin/reload-config", get(admin_reload_config))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match &self {
            EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EngineError::Generation(_) => StatusCode::BAD_GATEWAY,
            EngineError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

async fn decide(
    State(state): State<AppState>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> Result<Json<DecisionResult>, EngineError> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let e = EngineError::InvalidInput(rejection.body_text());
            state.history.record_failure(&anon_hash(""), &e);
            return Err(e);
        }
    };

    let engine = state.current_engine();
    let id = anon_hash(body.customer_message.as_deref().unwrap_or_default());

    match engine.handle(&body).await {
        Ok(decision) => {
            state.history.record_decision(&id, &decision);
            Ok(Json(decision))
        }
        Err(e) => {
            state.history.record_failure(&id, &e);
            Err(e)
        }
    }
}

#[derive(Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

async fn debug_history(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> Json<Vec<HistoryEntry>> {
    Json(state.history.snapshot_last_n(q.limit.unwrap_or(50)))
}

async fn admin_reload_config(State(state): State<AppState>) -> Response {
    let Some(path) = state.config_path.clone() else {
        return (StatusCode::NOT_FOUND, "reload disabled").into_response();
    };

    let fresh = EngineConfig::load_from(&path)
        .map_err(|e| EngineError::Configuration(e.to_string()))
        .and_then(|cfg| DecisionEngine::from_config(&cfg));

    match fresh {
        Ok(engine) => {
            let mut guard = state.engine.write().unwrap_or_else(|p| p.into_inner());
            *guard = Arc::new(engine);
            info!(path = %path.display(), "engine config reloaded");
            "reloaded".into_response()
        }
        Err(e) => {
            warn!(error = %e, "engine config reload failed, keeping previous engine");
            e.into_response()
        }
    }
}
