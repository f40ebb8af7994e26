use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use crate::models::Panel;
use crate::services::stock_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_stock_panel))
}

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub symbol: Option<String>,
}

pub async fn get_stock_panel(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Json<Panel> {
    let symbol = query.symbol.unwrap_or_else(|| state.default_ticker.clone());
    info!("GET /api/stock?symbol={} - Building stock panel", symbol);

    // "now" is read per request so the window always runs through today
    let today = Local::now().date_naive();
    let panel = stock_service::update_stock_panel(state.price_provider.as_ref(), &symbol, today).await;
    Json(panel)
}
