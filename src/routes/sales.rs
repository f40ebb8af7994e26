use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use super::UPLOAD_BODY_LIMIT;
use crate::errors::AppError;
use crate::models::Panel;
use crate::services::sales_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(post_sales_panel).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}

#[derive(Debug, Deserialize)]
pub struct SalesUpload {
    #[serde(default)]
    pub contents: Option<String>,
}

pub async fn post_sales_panel(
    Json(upload): Json<SalesUpload>,
) -> Result<Json<Panel>, AppError> {
    info!(
        "POST /api/sales - Building sales panel ({} bytes uploaded)",
        upload.contents.as_ref().map(String::len).unwrap_or(0)
    );

    let panel = sales_service::update_sales_panel_blocking(upload.contents)
        .await
        .map_err(|e| {
            error!("Sales handler task failed: {}", e);
            AppError::Internal(e.to_string())
        })?;

    Ok(Json(panel))
}
