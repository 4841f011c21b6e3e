use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use strategy::{run_backtest, BacktestReport, BacktestRequest, StrategyKind};

use crate::{ApiError, AppState};

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/strategies", get(list_strategies))
        .route("/api/backtest", post(post_backtest))
}

// ─── Strategies ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct StrategyInfo {
    name: &'static str,
    #[serde(flatten)]
    kind: StrategyKind,
}

async fn list_strategies(State(state): State<AppState>) -> Json<Value> {
    let strategies: Vec<StrategyInfo> = state
        .registry
        .strategies()
        .iter()
        .map(|kind| StrategyInfo {
            name: kind.display_name(),
            kind: *kind,
        })
        .collect();

    Json(json!({ "strategies": strategies }))
}

// ─── Backtest ─────────────────────────────────────────────────────────────────

async fn post_backtest(
    State(state): State<AppState>,
    Json(request): Json<BacktestRequest>,
) -> Result<Json<BacktestReport>, ApiError> {
    let report = run_backtest(&state.registry, &request)?;
    Ok(Json(report))
}
