use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, Trim};
use thiserror::Error;
use tracing::{error, info};

use crate::models::{AggregatedSales, Figure, Layout, Panel, SalesRecord, Trace};

pub const SALES_GRAPH_ID: &str = "sales-graph";
pub const DATE_COLUMN: &str = "Date";
pub const AMOUNT_COLUMN: &str = "Amount";
/// MM-DD-YY
pub const DATE_FORMAT: &str = "%m-%d-%y";

pub const UPLOAD_PROMPT: &str = "Please upload a CSV file.";

#[derive(Debug, Error)]
pub enum SalesError {
    #[error("upload is not of the form '<content-type>,<base64 data>'")]
    MalformedUpload,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("file is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("line {line}: date '{value}' does not match format '%m-%d-%y'")]
    InvalidDate { line: u64, value: String },
    #[error("line {line}: amount '{value}' is not a number")]
    InvalidAmount { line: u64, value: String },
}

/// Strip the `<content-type>,` prefix of an upload and decode the rest.
pub fn decode_upload(contents: &str) -> Result<String, SalesError> {
    let (_content_type, payload) = contents
        .split_once(',')
        .ok_or(SalesError::MalformedUpload)?;

    let bytes = STANDARD.decode(payload.trim())?;
    let text = String::from_utf8(bytes)?;

    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Parse an MM-DD-YY date. Two-digit years 69-99 fall in the 1900s, 00-68 in the 2000s.
pub fn parse_sales_date(raw: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()?;
    // chrono pivots at 70, POSIX strptime at 69
    if date.year() == 2069 {
        return date.with_year(1969);
    }
    Some(date)
}

/// Read `Date` and `Amount` from a headed CSV. Other columns are ignored.
///
/// Any row with a malformed date or amount fails the whole parse.
pub fn parse_sales_csv(text: &str) -> Result<Vec<SalesRecord>, SalesError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(SalesError::MissingColumn(name))
    };
    let date_idx = column(DATE_COLUMN)?;
    let amount_idx = column(AMOUNT_COLUMN)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        let raw_date = row.get(date_idx).unwrap_or_default();
        let date = parse_sales_date(raw_date).ok_or_else(|| SalesError::InvalidDate {
            line,
            value: raw_date.to_string(),
        })?;

        let raw_amount = row.get(amount_idx).unwrap_or_default();
        // Blank cells are missing values and contribute nothing to the sum
        let amount = if raw_amount.is_empty() {
            0.0
        } else {
            raw_amount.parse::<f64>().map_err(|_| SalesError::InvalidAmount {
                line,
                value: raw_amount.to_string(),
            })?
        };

        records.push(SalesRecord { date, amount });
    }

    Ok(records)
}

/// Sum amounts per date, in chronological order.
pub fn aggregate_by_date(records: &[SalesRecord]) -> Vec<AggregatedSales> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.date).or_insert(0.0) += record.amount;
    }

    totals
        .into_iter()
        .map(|(date, total_amount)| AggregatedSales { date, total_amount })
        .collect()
}

pub fn sales_figure(aggregated: &[AggregatedSales]) -> Figure {
    Figure {
        data: vec![Trace::bar(
            "Sales Amount",
            aggregated.iter().map(|s| (s.date, s.total_amount)),
        )],
        layout: Layout::new("Sales Data", "Date", "Sales Amount"),
    }
}

pub fn process_upload(contents: &str) -> Result<Vec<AggregatedSales>, SalesError> {
    let text = decode_upload(contents)?;
    let records = parse_sales_csv(&text)?;
    Ok(aggregate_by_date(&records))
}

/// Upload handler. `None` means nothing has been uploaded yet.
pub fn update_sales_panel(contents: Option<&str>) -> Panel {
    let Some(contents) = contents else {
        return Panel::message(UPLOAD_PROMPT);
    };

    match process_upload(contents) {
        Ok(aggregated) => {
            info!("Sales panel built with {} dates", aggregated.len());
            Panel::graph(SALES_GRAPH_ID, sales_figure(&aggregated))
        }
        Err(e) => {
            error!("Failed to process uploaded sales file: {}", e);
            Panel::message(format!("Error processing the file: {}", e))
        }
    }
}

/// Runs [`update_sales_panel`] on the blocking pool. Decoding and parsing are CPU bound.
pub async fn update_sales_panel_blocking(
    contents: Option<String>,
) -> Result<Panel, tokio::task::JoinError> {
    tokio::task::spawn_blocking(move || update_sales_panel(contents.as_deref())).await
}
