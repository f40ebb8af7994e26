use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::external::price_provider::ExternalPricePoint;

// Historical close for a single trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl From<ExternalPricePoint> for PricePoint {
    fn from(p: ExternalPricePoint) -> Self {
        Self { date: p.date, close: p.close }
    }
}

/// Extrapolated close for a calendar day after the observed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_close: f64,
}
