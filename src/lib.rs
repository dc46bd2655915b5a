pub mod config;
pub mod delivery;
pub mod error;
pub mod routes;
pub mod service;
pub mod telemetry;

use std::sync::Arc;

pub use config::Config;

use service::ReportService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub report_service: Arc<dyn ReportService>,
}
