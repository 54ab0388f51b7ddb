//! HTML templates using Askama.
//!
//! Each panel renders on its own as a fragment; [`BasePage`] wraps a
//! fragment into a full document.

use askama::Template;

use crate::adapters::chart_svg::{self, ACCENT_COLOR, SECONDARY_COLOR};
use crate::domain::correlation::Correlogram;
use crate::domain::field::{variable_definitions, PriceField, DATE_COLUMN};
use crate::domain::line_series::LineView;
use crate::domain::summary::{Statistic, SummaryStatistics};

#[derive(Template)]
#[template(path = "base.html")]
pub struct BasePage<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub title: &'a str,
    pub ticker: &'a str,
    pub first_date: String,
    pub last_date: String,
    pub rows: usize,
    pub price_panel: &'a str,
    pub summary_table: &'a str,
    pub correlogram_panel: &'a str,
    pub variables_table: &'a str,
}

pub struct FieldOption {
    pub name: &'static str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "price_panel.html")]
pub struct PricePanelTemplate {
    pub options: Vec<FieldOption>,
    pub selected: String,
    pub available: bool,
    pub chart_svg: String,
}

impl PricePanelTemplate {
    pub fn from_view(view: &LineView, requested: &str) -> Self {
        let (selected, chart_svg) = match view {
            LineView::Series { field, points } => (
                field.display_name().to_string(),
                chart_svg::line_chart_svg(points, field.display_name()),
            ),
            LineView::Unavailable { .. } => (
                requested.to_string(),
                chart_svg::placeholder_svg(chart_svg::UNAVAILABLE_TITLE),
            ),
        };
        let options = PriceField::SELECTABLE
            .iter()
            .map(|f| FieldOption {
                name: f.display_name(),
                selected: f.display_name() == selected,
            })
            .collect();
        Self {
            options,
            selected,
            available: view.is_available(),
            chart_svg,
        }
    }
}

pub struct SummaryRowView {
    pub label: &'static str,
    pub cells: Vec<String>,
}

#[derive(Template)]
#[template(path = "summary_table.html")]
pub struct SummaryTemplate {
    pub headers: Vec<&'static str>,
    pub rows: Vec<SummaryRowView>,
}

impl SummaryTemplate {
    pub fn from_summary(summary: &SummaryStatistics) -> Self {
        Self {
            headers: summary.columns.iter().map(|c| c.display_name()).collect(),
            rows: summary
                .rows
                .iter()
                .map(|r| SummaryRowView {
                    label: r.statistic.label(),
                    cells: r
                        .values
                        .iter()
                        .map(|&v| format_stat(r.statistic, v))
                        .collect(),
                })
                .collect(),
        }
    }
}

pub fn format_stat(statistic: Statistic, value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    match statistic {
        Statistic::Count => format!("{:.0}", value),
        _ => format!("{:.2}", value),
    }
}

#[derive(Template)]
#[template(path = "correlogram.html")]
pub struct CorrelogramTemplate {
    pub acf_svg: String,
    pub pacf_svg: String,
    pub nobs: usize,
    pub nlags: usize,
    pub method: String,
}

pub const ACF_TITLE: &str = "ACF del Precio";
pub const PACF_TITLE: &str = "PACF del Precio";

pub fn acf_chart(correlogram: &Correlogram) -> String {
    chart_svg::correlogram_svg(ACF_TITLE, &correlogram.acf, correlogram.band(), ACCENT_COLOR)
}

pub fn pacf_chart(correlogram: &Correlogram) -> String {
    chart_svg::correlogram_svg(PACF_TITLE, &correlogram.pacf, correlogram.band(), SECONDARY_COLOR)
}

impl CorrelogramTemplate {
    pub fn from_correlogram(correlogram: &Correlogram) -> Self {
        Self {
            acf_svg: acf_chart(correlogram),
            pacf_svg: pacf_chart(correlogram),
            nobs: correlogram.nobs,
            nlags: correlogram.nlags(),
            method: correlogram.method.to_string(),
        }
    }
}

pub struct VariableRow {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Template)]
#[template(path = "variables.html")]
pub struct VariablesTemplate {
    pub date_column: &'static str,
    pub rows: Vec<VariableRow>,
}

impl Default for VariablesTemplate {
    fn default() -> Self {
        Self {
            date_column: DATE_COLUMN,
            rows: variable_definitions()
                .into_iter()
                .map(|(name, description)| VariableRow { name, description })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}
