use axum::extract::{DefaultBodyLimit, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use super::UPLOAD_BODY_LIMIT;
use crate::dashboard::Callback;
use crate::errors::AppError;
use crate::models::Panel;
use crate::state::AppState;

const DASHBOARD_JS: &str = include_str!("../../static/dashboard.js");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/assets/dashboard.js", get(script))
        .route("/_dash-dependencies", get(dependencies))
        .route(
            "/_dash-update",
            post(update).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub input: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub output: String,
    pub children: Panel,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    info!("GET / - Rendering dashboard");
    Html(state.dashboard.page())
}

pub async fn script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], DASHBOARD_JS)
}

/// The callback table, so the client knows which region each input refreshes.
pub async fn dependencies(State(state): State<AppState>) -> Json<Vec<Callback>> {
    Json(state.dashboard.callbacks().to_vec())
}

pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>, AppError> {
    info!("POST /_dash-update - input '{}'", request.input);

    let today = Local::now().date_naive();
    let (output, panel) = state
        .dashboard
        .dispatch(state.price_provider.as_ref(), &request.input, &request.value, today)
        .await
        .map_err(|e| {
            error!("Dispatch for '{}' failed: {}", request.input, e);
            e
        })?;

    Ok(Json(UpdateResponse {
        output: output.to_string(),
        children: panel,
    }))
}
