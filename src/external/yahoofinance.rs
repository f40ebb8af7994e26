use crate::external::price_provider::{ExternalPricePoint, PriceProvider, PriceProviderError};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use tracing::debug;
use url::Url;

const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";

/// Yahoo Finance provider - free v8 chart API, no API key required.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new() -> Self {
        Self::with_base_url(CHART_ENDPOINT)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; StockSalesDashboard/0.1)")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.to_string(),
        }
    }

    fn chart_url(&self, ticker: &str) -> Result<Url, PriceProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PriceProviderError::BadResponse(format!("invalid endpoint: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PriceProviderError::BadResponse("endpoint cannot be a base".into()))?
            .pop_if_empty()
            .push(ticker);
        Ok(url)
    }
}

impl Default for YahooFinanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: Option<String>,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    meta: Option<YahooMeta>,
    // Absent when the symbol exists but has no bars in the window
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooMeta {
    /// Exchange offset from UTC in seconds, e.g. 32400 for Tokyo
    #[serde(default)]
    gmtoffset: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn unix_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// `period1`/`period2` for a `[start, end)` window. `period2` never runs past `now`.
fn window_bounds(start: NaiveDate, end: NaiveDate, now: i64) -> (i64, i64) {
    (unix_seconds(start), unix_seconds(end).min(now))
}

fn is_no_data(error: &YahooError) -> bool {
    error.code.as_deref() == Some("Not Found") || error.description.contains("No data found")
}

/// Turns a chart API body into an ascending, date-unique close series.
fn parse_chart(body: YahooChartResponse) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
    if let Some(error) = body.chart.error {
        if is_no_data(&error) {
            return Ok(Vec::new());
        }
        return Err(PriceProviderError::BadResponse(error.description));
    }

    let Some(result) = body.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    if result.timestamp.is_empty() {
        return Ok(Vec::new());
    }

    let closes = &result
        .indicators
        .quote
        .first()
        .ok_or_else(|| PriceProviderError::BadResponse("No quote data in response".into()))?
        .close;

    if result.timestamp.len() != closes.len() {
        return Err(PriceProviderError::Parse(
            "Timestamp and close price arrays have different lengths".into(),
        ));
    }

    // Bars are stamped at the session open in exchange time; dates follow the exchange
    let offset_secs = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let offset = FixedOffset::east_opt(offset_secs)
        .ok_or_else(|| PriceProviderError::Parse(format!("bad gmtoffset {}", offset_secs)))?;

    let mut points = Vec::with_capacity(closes.len());
    for (timestamp, close) in result.timestamp.iter().zip(closes.iter()) {
        // Skip null values (market holidays, etc.)
        let Some(close) = *close else { continue };

        let date = DateTime::from_timestamp(*timestamp, 0)
            .map(|dt| dt.with_timezone(&offset).date_naive())
            .ok_or_else(|| PriceProviderError::Parse(format!("bad timestamp {}", timestamp)))?;

        points.push(ExternalPricePoint { date, close });
    }

    points.sort_by(|a, b| a.date.cmp(&b.date));
    // Intraday "live" bars can share a date with the last daily bar; keep the latest
    points.reverse();
    points.dedup_by_key(|p| p.date);
    points.reverse();

    Ok(points)
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        let trimmed = ticker.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.chart_url(trimmed)?;
        let (period1, period2) = window_bounds(start, end, Utc::now().timestamp());
        let (period1, period2) = (period1.to_string(), period2.to_string());

        debug!("Requesting Yahoo chart for {} ({} .. {})", trimmed, start, end);

        let resp = self
            .client
            .get(url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "history"),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let body: YahooChartResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        // Yahoo sometimes reports errors with a 4xx status and a JSON body
        if !status.is_success() && body.chart.error.is_none() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", status)));
        }

        parse_chart(body)
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        let body: YahooChartResponse = serde_json::from_str(json).unwrap();
        parse_chart(body)
    }

    #[test]
    fn test_parse_chart_skips_null_closes() {
        // 2024-01-02, 2024-01-03, 2024-01-04 at 14:30 UTC
        let points = parse(
            r#"{"chart":{"result":[{"timestamp":[1704205800,1704292200,1704378600],
                "indicators":{"quote":[{"close":[185.64,null,181.91]}]}}],"error":null}}"#,
        )
        .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(points[1].close, 181.91);
    }

    #[test]
    fn test_parse_chart_not_found_is_empty() {
        let points = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        )
        .unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_parse_chart_other_error_is_bad_response() {
        let err = parse(
            r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PriceProviderError::BadResponse(ref m) if m == "Invalid input"));
    }

    #[test]
    fn test_parse_chart_length_mismatch() {
        let err = parse(
            r#"{"chart":{"result":[{"timestamp":[1704205800,1704292200],
                "indicators":{"quote":[{"close":[185.64]}]}}],"error":null}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PriceProviderError::Parse(_)));
    }

    #[test]
    fn test_parse_chart_dedups_same_day_bars() {
        // Two bars on 2024-01-02: daily close then a later live bar
        let points = parse(
            r#"{"chart":{"result":[{"timestamp":[1704205800,1704225600],
                "indicators":{"quote":[{"close":[185.0,186.5]}]}}],"error":null}}"#,
        )
        .unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].close, 186.5);
    }

    #[test]
    fn test_parse_chart_uses_exchange_dates() {
        // 2024-01-09 and 2024-01-10 01:00 JST, i.e. 16:00 UTC the day before
        let points = parse(
            r#"{"chart":{"result":[{"meta":{"gmtoffset":32400,"exchangeTimezoneName":"Asia/Tokyo"},
                "timestamp":[1704729600,1704816000],
                "indicators":{"quote":[{"close":[2500.0,2510.0]}]}}],"error":null}}"#,
        )
        .unwrap();

        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn test_parse_chart_negative_offset_keeps_session_date() {
        // 2024-01-02 09:30 EST
        let points = parse(
            r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},"timestamp":[1704205800],
                "indicators":{"quote":[{"close":[185.64]}]}}],"error":null}}"#,
        )
        .unwrap();
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_window_ends_at_now() {
        let start = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        // 2024-01-09 18:00 UTC
        let now = 1704823200;

        assert_eq!(window_bounds(start, tomorrow, now), (1262304000, now));

        let past = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(window_bounds(start, past, now), (1262304000, 1577836800));
    }

    #[test]
    fn test_chart_url_encodes_symbol() {
        let provider = YahooFinanceProvider::new();
        let url = provider.chart_url("BRK/B").unwrap();
        assert_eq!(
            url.as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/BRK%2FB"
        );
    }
}
