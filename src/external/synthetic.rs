use crate::external::price_provider::{ExternalPricePoint, PriceProvider, PriceProviderError};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};

/// Offline provider for local development.
///
/// Emits a random walk of weekday closes across the requested window, so the
/// dashboard can be exercised without network access. The series length only
/// depends on the window, the values do not.
pub struct SyntheticProvider {
    starting_price: f64,
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self { starting_price: 100.0 }
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn is_trading_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[async_trait]
impl PriceProvider for SyntheticProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        if ticker.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut points = Vec::new();
        let mut current = self.starting_price;

        // End is exclusive, matching the upstream download window
        for date in start.iter_days().take_while(|d| *d < end) {
            if !is_trading_day(date) {
                continue;
            }
            current *= 1.0 + (rand::random::<f64>() - 0.5) * 0.02;
            points.push(ExternalPricePoint { date, close: current });
        }

        Ok(points)
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}
