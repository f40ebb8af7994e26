use std::sync::Arc;

use crate::dashboard::Dashboard;
use crate::external::price_provider::PriceProvider;

#[derive(Clone)]
pub struct AppState {
    pub price_provider: Arc<dyn PriceProvider>,
    pub dashboard: Arc<Dashboard>,
    pub default_ticker: String,
}

impl AppState {
    pub fn new(price_provider: Arc<dyn PriceProvider>, default_ticker: &str) -> Self {
        Self {
            price_provider,
            dashboard: Arc::new(Dashboard::new(default_ticker)),
            default_ticker: default_ticker.to_string(),
        }
    }
}
