// src/server.rs
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::{get, post}, Json, Router};
use serde::Deserialize;

use crate::error::CheckError;
use crate::pipeline::Checker;

#[derive(Deserialize)]
pub struct CheckReq {
    pub claim: String,
}

pub async fn check_claim(State(checker): State<Arc<Checker>>, Json(req): Json<CheckReq>) -> axum::response::Response {
    match checker.check(&req.claim).await {
        Ok(report) => Json(report).into_response(),
        Err(e @ CheckError::InvalidInput(_)) => {
            (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}

pub fn router(checker: Arc<Checker>) -> Router {
    Router::new()
        .route("/check", post(check_claim))
        .route("/healthz", get(healthz))
        .with_state(checker)
}

pub async fn run_server(checker: Checker, addr: &str) -> anyhow::Result<()> {
    let app = router(Arc::new(checker));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
