use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of an uploaded sales sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Sum of all sales sharing a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSales {
    pub date: NaiveDate,
    pub total_amount: f64,
}
