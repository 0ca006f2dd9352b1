pub mod api;
pub mod backend;
pub mod betting;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod services;
pub mod streak;

use tokio::sync::broadcast;

use crate::api::ws_types::WsMessage;
use crate::backend::BackendClient;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub config: AppConfig,
    pub ws_tx: broadcast::Sender<WsMessage>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
