mod price_point;
mod sales;
pub mod chart;

pub use price_point::{ForecastPoint, PricePoint};
pub use sales::{AggregatedSales, SalesRecord};
pub use chart::{Axis, Figure, Layout, LineStyle, Panel, Trace, TraceKind};
