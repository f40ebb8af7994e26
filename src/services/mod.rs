pub mod sales_service;
pub mod stock_service;
pub mod trend;
