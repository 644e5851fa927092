// SPDX-License-Identifier: MIT

//! HTTP evaluation endpoint

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::{RuleError, RulegateError};
use crate::rules::{evaluate, Bindings};
use crate::ruleset::{RuleSet, RuleSetRegistry};

#[derive(Clone)]
pub struct AppState {
    pub registry: RuleSetRegistry,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/evaluate", post(evaluate_expression))
        .route("/api/rulesets", get(list_rulesets))
        .route("/api/rulesets/{name}/evaluate", post(evaluate_ruleset))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(port: u16, registry: RuleSetRegistry) -> Result<(), std::io::Error> {
    let app = router(AppState { registry });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub expression: String,
    #[serde(default)]
    pub bindings: Bindings,
}

#[derive(Debug, Deserialize)]
pub struct RuleSetRequest {
    #[serde(default)]
    pub bindings: Bindings,
}

/// Longest expression text `POST /api/evaluate` accepts, in bytes
pub const MAX_EXPRESSION_LEN: usize = 16 * 1024;

fn rule_error(e: &RuleError) -> Value {
    json!({ "error": e.to_string(), "kind": e.kind().as_str() })
}

pub async fn evaluate_expression(Json(payload): Json<EvaluateRequest>) -> (StatusCode, Json<Value>) {
    let len = payload.expression.len();
    if len > MAX_EXPRESSION_LEN {
        log::debug!("Rejected expression of {} bytes", len);
        let e = RulegateError::ExpressionTooLong {
            len,
            limit: MAX_EXPRESSION_LEN,
        };
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(json!({ "error": e.to_string() })),
        );
    }

    match evaluate(&payload.bindings, &payload.expression) {
        Ok(result) => (StatusCode::OK, Json(json!({ "result": result }))),
        Err(e) => {
            log::debug!("Evaluation of {:?} failed: {}", payload.expression, e);
            (StatusCode::UNPROCESSABLE_ENTITY, Json(rule_error(&e)))
        }
    }
}

pub async fn list_rulesets(State(state): State<AppState>) -> Json<Value> {
    let names = state.registry.names().await;
    Json(json!(names))
}

pub async fn evaluate_ruleset(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<RuleSetRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(set) = state.registry.get(&name).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": RulegateError::RuleSetNotFound(name).to_string() })),
        );
    };

    let outcomes = set.evaluate(&payload.bindings);

    let matched = RuleSet::matched(&outcomes).ok().flatten();

    let results: Vec<Value> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(result) => json!({ "rule": outcome.rule, "result": result }),
            Err(e) => {
                let mut value = rule_error(e);
                value["rule"] = json!(outcome.rule);
                value
            }
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({ "ruleset": name, "results": results, "matched": matched })),
    )
}
