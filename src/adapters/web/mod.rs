//! Web server adapter.
//!
//! Axum router serving the dashboard as server-rendered HTML with inline
//! SVG charts. Requests carrying `HX-Request` receive bare fragments so the
//! price selector can swap its panel in place; the same views are also
//! exposed as JSON under `/api`.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::domain::dashboard::Dashboard;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_TITLE: &str = "Dashboard BTC";

pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

impl AppState {
    pub fn title(&self) -> String {
        self.config
            .get_string("web", "title")
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/price", get(handlers::price_panel))
        .route("/price/chart.svg", get(handlers::price_chart_svg))
        .route("/summary", get(handlers::summary))
        .route("/correlogram", get(handlers::correlogram))
        .route("/correlogram/acf.svg", get(handlers::acf_svg))
        .route("/correlogram/pacf.svg", get(handlers::pacf_svg))
        .route("/variables", get(handlers::variables))
        .route("/api/price", get(handlers::api_price))
        .route("/api/summary", get(handlers::api_summary))
        .route("/api/correlogram", get(handlers::api_correlogram))
        .route("/health", get(handlers::health))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
