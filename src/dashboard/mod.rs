//! Dashboard page and the table binding its inputs to handlers.

pub mod layout;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::Panel;
use crate::services::{sales_service, stock_service};

pub use layout::{dashboard_layout, render_page, Component};

pub const INPUT_STOCK: &str = "input-stock";
pub const OUTPUT_STOCK: &str = "output-graph-stock";
pub const UPLOAD_DATA: &str = "upload-data";
pub const OUTPUT_SALES: &str = "output-graph-sales";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Handler {
    Stock,
    Sales,
}

/// Binds one input property to the output region its handler refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Callback {
    pub input: &'static str,
    pub property: &'static str,
    pub output: &'static str,
    pub handler: Handler,
}

pub struct Dashboard {
    pub layout: Component,
    callbacks: Vec<Callback>,
}

impl Dashboard {
    pub fn new(default_ticker: &str) -> Self {
        Self {
            layout: dashboard_layout(default_ticker),
            callbacks: vec![
                Callback {
                    input: INPUT_STOCK,
                    property: "value",
                    output: OUTPUT_STOCK,
                    handler: Handler::Stock,
                },
                Callback {
                    input: UPLOAD_DATA,
                    property: "contents",
                    output: OUTPUT_SALES,
                    handler: Handler::Sales,
                },
            ],
        }
    }

    pub fn callbacks(&self) -> &[Callback] {
        &self.callbacks
    }

    pub fn callback_for(&self, input: &str) -> Option<&Callback> {
        self.callbacks.iter().find(|c| c.input == input)
    }

    pub fn page(&self) -> String {
        render_page(&self.layout)
    }

    /// Run the handler bound to `input` with its new value.
    ///
    /// Handler failures come back as message panels; only an unknown input or a
    /// value of the wrong JSON type is an error.
    pub async fn dispatch(
        &self,
        provider: &dyn PriceProvider,
        input: &str,
        value: &Value,
        today: NaiveDate,
    ) -> Result<(&'static str, Panel), AppError> {
        let callback = self.callback_for(input).ok_or_else(|| {
            warn!("Dispatch for unknown component '{}'", input);
            AppError::UnknownComponent(input.to_string())
        })?;

        info!("Dispatching {}.{} -> {}", callback.input, callback.property, callback.output);

        let panel = match callback.handler {
            Handler::Stock => {
                let ticker = match value {
                    Value::String(s) => s.as_str(),
                    Value::Null => "",
                    other => return Err(wrong_type(callback, other)),
                };
                stock_service::update_stock_panel(provider, ticker, today).await
            }
            Handler::Sales => {
                let contents = match value {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => return Err(wrong_type(callback, other)),
                };
                sales_service::update_sales_panel_blocking(contents)
                    .await
                    .map_err(|e| {
                        error!("Sales handler task failed: {}", e);
                        AppError::Internal(e.to_string())
                    })?
            }
        };

        Ok((callback.output, panel))
    }
}

fn wrong_type(callback: &Callback, value: &Value) -> AppError {
    AppError::Validation(format!(
        "{}.{} expects a string or null, got {}",
        callback.input, callback.property, value
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::synthetic::SyntheticProvider;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn test_every_callback_targets_layout_components() {
        let dashboard = Dashboard::new("AAPL");
        let ids = dashboard.layout.ids();

        for callback in dashboard.callbacks() {
            assert!(ids.contains(&callback.input), "{} missing", callback.input);
            assert!(ids.contains(&callback.output), "{} missing", callback.output);
        }
    }

    #[tokio::test]
    async fn test_dispatch_upload_without_contents() {
        let dashboard = Dashboard::new("AAPL");
        let (output, panel) = dashboard
            .dispatch(&SyntheticProvider::new(), UPLOAD_DATA, &Value::Null, today())
            .await
            .unwrap();

        assert_eq!(output, OUTPUT_SALES);
        assert_eq!(panel.as_message(), Some("Please upload a CSV file."));
    }

    #[tokio::test]
    async fn test_dispatch_upload_with_contents() {
        let dashboard = Dashboard::new("AAPL");
        let contents = json!("data:text/csv;base64,RGF0ZSxBbW91bnQKMDEtMDEtMjAsMTAK");
        let (output, panel) = dashboard
            .dispatch(&SyntheticProvider::new(), UPLOAD_DATA, &contents, today())
            .await
            .unwrap();

        assert_eq!(output, OUTPUT_SALES);
        let figure = panel.as_figure().expect("expected a chart");
        assert_eq!(figure.data[0].y, vec![10.0]);
    }

    #[tokio::test]
    async fn test_dispatch_stock_input() {
        let dashboard = Dashboard::new("AAPL");
        let (output, panel) = dashboard
            .dispatch(&SyntheticProvider::new(), INPUT_STOCK, &json!("MSFT"), today())
            .await
            .unwrap();

        assert_eq!(output, OUTPUT_STOCK);
        let figure = panel.as_figure().unwrap();
        assert_eq!(figure.data[1].len(), 30);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_component() {
        let dashboard = Dashboard::new("AAPL");
        let err = dashboard
            .dispatch(&SyntheticProvider::new(), "nope", &Value::Null, today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownComponent(ref id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_dispatch_rejects_non_string_value() {
        let dashboard = Dashboard::new("AAPL");
        let err = dashboard
            .dispatch(&SyntheticProvider::new(), INPUT_STOCK, &json!(42), today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
