use chrono::{Duration, NaiveDate};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{Figure, ForecastPoint, Layout, Panel, PricePoint, Trace};
use crate::services::trend::{self, TrendError, TrendModel, FORECAST_DAYS};

pub const STOCK_GRAPH_ID: &str = "stock-graph";

#[derive(Debug, Error)]
pub enum StockError {
    #[error(transparent)]
    Provider(#[from] PriceProviderError),
    #[error(transparent)]
    Trend(#[from] TrendError),
}

/// Observed closes plus the linear projection that follows them.
#[derive(Debug, Clone)]
pub struct StockForecast {
    pub ticker: String,
    pub history: Vec<PricePoint>,
    pub forecast: Vec<ForecastPoint>,
}

/// First day of the download window.
pub fn history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Exclusive end of the download window, so the current session's bar is included.
pub fn history_end(today: NaiveDate) -> NaiveDate {
    today.checked_add_signed(Duration::days(1)).unwrap_or(today)
}

pub fn no_data_message(ticker: &str) -> String {
    format!("No data found for the stock symbol: {}", ticker)
}

/// Fit a trend through `history` and project it over the following days.
pub fn project(history: &[PricePoint], days: usize) -> Result<Vec<ForecastPoint>, StockError> {
    let last = history.last().ok_or(TrendError::Empty)?.date;

    let observed: Vec<(NaiveDate, f64)> = history.iter().map(|p| (p.date, p.close)).collect();
    let model = TrendModel::fit_dates(&observed)?;

    let dates = trend::forecast_dates(last, days)?;
    let xs: Vec<f64> = dates.iter().map(|d| trend::to_ordinal(*d) as f64).collect();

    let forecast = dates
        .into_iter()
        .zip(model.predict_many(&xs))
        .map(|(date, predicted_close)| ForecastPoint { date, predicted_close })
        .collect();

    Ok(forecast)
}

/// Fetch the window up to and including `today` and build the forecast.
///
/// `Ok(None)` means the provider had nothing for this symbol.
pub async fn build_forecast(
    provider: &dyn PriceProvider,
    ticker: &str,
    today: NaiveDate,
) -> Result<Option<StockForecast>, StockError> {
    let raw = provider
        .fetch_daily_history(ticker, history_start(), history_end(today))
        .await?;

    if raw.is_empty() {
        return Ok(None);
    }

    let history: Vec<PricePoint> = raw.into_iter().map(PricePoint::from).collect();
    let forecast = project(&history, FORECAST_DAYS)?;

    Ok(Some(StockForecast {
        ticker: ticker.to_string(),
        history,
        forecast,
    }))
}

pub fn stock_figure(result: &StockForecast) -> Figure {
    let historical = Trace::line(
        result.ticker.clone(),
        result.history.iter().map(|p| (p.date, p.close)),
    );
    let predicted = Trace::line(
        "Predicted Prices",
        result.forecast.iter().map(|p| (p.date, p.predicted_close)),
    )
    .dashed();

    Figure {
        data: vec![historical, predicted],
        layout: Layout::new(
            format!("Stock Prices for {}", result.ticker),
            "Date",
            "Price (USD)",
        ),
    }
}

/// Ticker input handler. Every outcome becomes something displayable.
pub async fn update_stock_panel(
    provider: &dyn PriceProvider,
    ticker: &str,
    today: NaiveDate,
) -> Panel {
    info!("Building stock panel for '{}' via {}", ticker, provider.name());

    match build_forecast(provider, ticker, today).await {
        Ok(Some(result)) => {
            info!(
                "Stock panel for '{}': {} historical points, {} forecast points",
                ticker,
                result.history.len(),
                result.forecast.len()
            );
            Panel::graph(STOCK_GRAPH_ID, stock_figure(&result))
        }
        Ok(None) => {
            warn!("No price data for '{}'", ticker);
            Panel::message(no_data_message(ticker))
        }
        Err(e) => {
            error!("Failed to build stock panel for '{}': {}", ticker, e);
            Panel::message(format!("Error fetching data: {}", e))
        }
    }
}
