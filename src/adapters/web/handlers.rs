//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, header},
    response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::adapters::chart_svg;
use crate::domain::correlation::{Correlogram, LagCoefficient};
use crate::domain::field::PriceField;
use crate::domain::line_series::LineView;
use crate::domain::summary::SummaryStatistics;

use super::templates::{
    BasePage, CorrelogramTemplate, DashboardTemplate, PricePanelTemplate, SummaryTemplate,
    VariablesTemplate, acf_chart, pacf_chart,
};
use super::{AppState, WebError, is_htmx_request};

#[derive(Debug, Default, Deserialize)]
pub struct FieldQuery {
    pub field: Option<String>,
}

impl FieldQuery {
    /// Requested field name, defaulting to the closing price.
    pub fn field_name(&self) -> &str {
        self.field
            .as_deref()
            .unwrap_or(PriceField::Close.display_name())
    }
}

fn respond(headers: &HeaderMap, title: &str, fragment: String) -> Result<Response, WebError> {
    if is_htmx_request(headers) {
        Ok(Html(fragment).into_response())
    } else {
        let page = BasePage {
            title,
            content: &fragment,
        };
        Ok(Html(page.render()?).into_response())
    }
}

fn svg_response(svg: String) -> Response {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("image/svg+xml"),
        )],
        svg,
    )
        .into_response()
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let dash = &state.dashboard;
    let series = dash.series();
    let (first, last) = series
        .date_range()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .unwrap_or_default();

    let default_field = PriceField::Close.display_name();
    let price_panel =
        PricePanelTemplate::from_view(&dash.line(default_field), default_field).render()?;
    let summary_table = SummaryTemplate::from_summary(&dash.summary()).render()?;
    let correlogram_panel = CorrelogramTemplate::from_correlogram(dash.correlogram()).render()?;
    let variables_table = VariablesTemplate::default().render()?;

    let title = state.title();
    let template = DashboardTemplate {
        title: &title,
        ticker: series.ticker(),
        first_date: first,
        last_date: last,
        rows: series.len(),
        price_panel: &price_panel,
        summary_table: &summary_table,
        correlogram_panel: &correlogram_panel,
        variables_table: &variables_table,
    };

    respond(&headers, &title, template.render()?)
}

pub async fn price_panel(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FieldQuery>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let requested = query.field_name();
    let view = state.dashboard.line(requested);
    if !view.is_available() {
        tracing::debug!(field = requested, "price field unavailable, rendering placeholder");
    }
    let fragment = PricePanelTemplate::from_view(&view, requested).render()?;
    respond(&headers, &state.title(), fragment)
}

pub async fn price_chart_svg(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FieldQuery>,
) -> Response {
    let svg = match state.dashboard.line(query.field_name()) {
        LineView::Series { field, points } => {
            chart_svg::line_chart_svg(&points, field.display_name())
        }
        LineView::Unavailable { .. } => chart_svg::placeholder_svg(chart_svg::UNAVAILABLE_TITLE),
    };
    svg_response(svg)
}

/// The table does not depend on the price selector.
pub async fn summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let fragment = SummaryTemplate::from_summary(&state.dashboard.summary()).render()?;
    respond(&headers, &state.title(), fragment)
}

pub async fn correlogram(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let fragment = CorrelogramTemplate::from_correlogram(state.dashboard.correlogram()).render()?;
    respond(&headers, &state.title(), fragment)
}

pub async fn acf_svg(State(state): State<Arc<AppState>>) -> Response {
    svg_response(acf_chart(state.dashboard.correlogram()))
}

pub async fn pacf_svg(State(state): State<Arc<AppState>>) -> Response {
    svg_response(pacf_chart(state.dashboard.correlogram()))
}

pub async fn variables(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let fragment = VariablesTemplate::default().render()?;
    respond(&headers, &state.title(), fragment)
}

#[derive(Debug, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub field: String,
    pub available: bool,
    pub points: Vec<PricePoint>,
}

pub async fn api_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FieldQuery>,
) -> Json<PriceResponse> {
    let view = state.dashboard.line(query.field_name());
    let field = match &view {
        LineView::Series { field, .. } => field.display_name().to_string(),
        LineView::Unavailable { requested } => requested.clone(),
    };
    Json(PriceResponse {
        field,
        available: view.is_available(),
        points: view
            .points()
            .iter()
            .map(|&(date, value)| PricePoint { date, value })
            .collect(),
    })
}

pub async fn api_summary(State(state): State<Arc<AppState>>) -> Json<SummaryStatistics> {
    Json(state.dashboard.summary())
}

#[derive(Debug, Serialize)]
pub struct CorrelogramResponse {
    pub nobs: usize,
    pub method: String,
    pub band: f64,
    pub acf: Vec<LagCoefficient>,
    pub pacf: Vec<LagCoefficient>,
}

impl From<&Correlogram> for CorrelogramResponse {
    fn from(c: &Correlogram) -> Self {
        Self {
            nobs: c.nobs,
            method: c.method.to_string(),
            band: c.band(),
            acf: c.acf.clone(),
            pacf: c.pacf.clone(),
        }
    }
}

pub async fn api_correlogram(State(state): State<Arc<AppState>>) -> Json<CorrelogramResponse> {
    Json(state.dashboard.correlogram().into())
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found() -> WebError {
    WebError::not_found("Página no encontrada")
}
