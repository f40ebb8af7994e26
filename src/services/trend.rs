use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

/// Number of calendar days projected past the last observed close.
pub const FORECAST_DAYS: usize = 30;

#[derive(Debug, Error, PartialEq)]
pub enum TrendError {
    #[error("cannot fit a trend to an empty series")]
    Empty,
    #[error("feature and target lengths differ ({0} vs {1})")]
    LengthMismatch(usize, usize),
    #[error("non-finite value in regression input")]
    NonFinite,
    #[error("date overflow while extending past {0}")]
    DateOverflow(NaiveDate),
}

/// Proleptic Gregorian ordinal, where 0001-01-01 is day 1.
pub fn to_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// The `days` consecutive calendar days following `last`.
pub fn forecast_dates(last: NaiveDate, days: usize) -> Result<Vec<NaiveDate>, TrendError> {
    (1..=days as i64)
        .map(|offset| {
            last.checked_add_signed(Duration::days(offset))
                .ok_or(TrendError::DateOverflow(last))
        })
        .collect()
}

/// Ordinary least squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendModel {
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, TrendError> {
        if xs.len() != ys.len() {
            return Err(TrendError::LengthMismatch(xs.len(), ys.len()));
        }
        if xs.is_empty() {
            return Err(TrendError::Empty);
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(TrendError::NonFinite);
        }

        let n = xs.len() as f64;
        let x_mean = xs.iter().sum::<f64>() / n;
        let y_mean = ys.iter().sum::<f64>() / n;

        // Centre before accumulating; ordinals are ~7e5 and squaring them raw loses precision
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (&x, &y) in xs.iter().zip(ys) {
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        // A single distinct x has no slope; fall back to the minimum-norm solution
        let slope = if denominator == 0.0 { 0.0 } else { numerator / denominator };
        let intercept = y_mean - slope * x_mean;

        Ok(Self { slope, intercept })
    }

    pub fn fit_dates(points: &[(NaiveDate, f64)]) -> Result<Self, TrendError> {
        let xs: Vec<f64> = points.iter().map(|(d, _)| to_ordinal(*d) as f64).collect();
        let ys: Vec<f64> = points.iter().map(|(_, y)| *y).collect();
        Self::fit(&xs, &ys)
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn predict_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }
}
