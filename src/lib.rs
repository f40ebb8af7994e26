pub mod app;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use app::create_app;
pub use state::AppState;
