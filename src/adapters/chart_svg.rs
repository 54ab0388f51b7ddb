//! SVG chart rendering for the dashboard views.

use chrono::NaiveDate;

use crate::domain::correlation::LagCoefficient;

pub const TEXT_COLOR: &str = "#1a1a1a";
pub const ACCENT_COLOR: &str = "#2d572c";
pub const SECONDARY_COLOR: &str = "#ffd700";

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 360.0;
const PADDING: f64 = 48.0;

pub const PRICE_TITLE: &str = "Evolución del Precio de Bitcoin (USD)";
pub const UNAVAILABLE_TITLE: &str = "Datos no disponibles";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn open_svg(title: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w:.0} {h:.0}" width="{w:.0}" height="{h:.0}" font-family="Segoe UI, sans-serif"><rect width="100%" height="100%" fill="white"/><text x="{cx:.0}" y="28" text-anchor="middle" font-size="18" fill="{TEXT_COLOR}">{title}</text>"#,
        w = WIDTH,
        h = HEIGHT,
        cx = WIDTH / 2.0,
        title = escape(title),
    )
}

fn axes() -> String {
    format!(
        r##"<line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{b:.0}" stroke="#999"/><line x1="{p:.0}" y1="{b:.0}" x2="{r:.0}" y2="{b:.0}" stroke="#999"/>"##,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING,
    )
}

/// Empty frame carrying only a title.
pub fn placeholder_svg(title: &str) -> String {
    let mut svg = open_svg(title);
    svg.push_str(&axes());
    svg.push_str("</svg>");
    svg
}

/// Line chart of a dated series, scaled to its min/max.
pub fn line_chart_svg(points: &[(NaiveDate, f64)], series_name: &str) -> String {
    if points.is_empty() {
        return placeholder_svg(UNAVAILABLE_TITLE);
    }

    let min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if points.len() > 1 {
        plot_width / (points.len() - 1) as f64
    } else {
        0.0
    };

    let polyline: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(i, (_, v))| {
            let x = PADDING + i as f64 * scale_x;
            let y = HEIGHT - PADDING - (v - min) * scale_y;
            format!("{:.1},{:.1}", x, y)
        })
        .collect();

    let first = points[0].0;
    let last = points[points.len() - 1].0;
    let bottom = HEIGHT - PADDING;

    let mut svg = open_svg(PRICE_TITLE);
    svg.push_str(&axes());
    svg.push_str(&format!(
        r#"<polyline fill="none" stroke="{TEXT_COLOR}" stroke-width="1.2" points="{}"><title>{}</title></polyline>"#,
        polyline.join(" "),
        escape(series_name),
    ));
    svg.push_str(&format!(
        r#"<text x="{p:.0}" y="{ty:.0}" font-size="11" fill="{TEXT_COLOR}">{first}</text><text x="{r:.0}" y="{ty:.0}" font-size="11" text-anchor="end" fill="{TEXT_COLOR}">{last}</text>"#,
        p = PADDING,
        r = WIDTH - PADDING,
        ty = bottom + 16.0,
    ));
    svg.push_str(&format!(
        r#"<text x="{x:.0}" y="{top:.0}" font-size="11" text-anchor="end" fill="{TEXT_COLOR}">{max:.2}</text><text x="{x:.0}" y="{bottom:.0}" font-size="11" text-anchor="end" fill="{TEXT_COLOR}">{min:.2}</text>"#,
        x = PADDING - 4.0,
        top = PADDING + 4.0,
    ));
    svg.push_str(&format!(
        r#"<text x="{cx:.0}" y="{y:.0}" font-size="12" text-anchor="middle" fill="{TEXT_COLOR}">Fecha</text><text x="14" y="{cy:.0}" font-size="12" text-anchor="middle" transform="rotate(-90 14 {cy:.0})" fill="{TEXT_COLOR}">Precio (USD)</text>"#,
        cx = WIDTH / 2.0,
        y = HEIGHT - 8.0,
        cy = HEIGHT / 2.0,
    ));
    svg.push_str("</svg>");
    svg
}

/// Bar chart of correlogram coefficients with a dashed ±`band` guide.
pub fn correlogram_svg(title: &str, coefficients: &[LagCoefficient], band: f64, fill: &str) -> String {
    if coefficients.is_empty() {
        return placeholder_svg(UNAVAILABLE_TITLE);
    }

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    // coefficients live in [-1, 1]; keep the zero line centred
    let half = plot_height / 2.0;
    let zero_y = PADDING + half;
    let slot = plot_width / coefficients.len() as f64;
    let bar_width = (slot * 0.6).max(1.0);

    let mut svg = open_svg(title);
    svg.push_str(&axes());
    svg.push_str(&format!(
        r##"<line x1="{p:.0}" y1="{zero_y:.1}" x2="{r:.0}" y2="{zero_y:.1}" stroke="#666"/>"##,
        p = PADDING,
        r = WIDTH - PADDING,
    ));

    for c in coefficients {
        let value = c.value.clamp(-1.0, 1.0);
        let x = PADDING + c.lag as f64 * slot + (slot - bar_width) / 2.0;
        let height = value.abs() * half;
        let y = if value >= 0.0 { zero_y - height } else { zero_y };
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{fill}"><title>lag {}: {:.4}</title></rect>"#,
            c.lag, c.value,
        ));
    }

    if band > 0.0 && band < 1.0 {
        for offset in [-band, band] {
            let y = zero_y - offset * half;
            svg.push_str(&format!(
                r##"<line x1="{p:.0}" y1="{y:.1}" x2="{r:.0}" y2="{y:.1}" stroke="#1f77b4" stroke-dasharray="4 3"/>"##,
                p = PADDING,
                r = WIDTH - PADDING,
            ));
        }
    }

    let last_lag = coefficients.len() - 1;
    svg.push_str(&format!(
        r#"<text x="{p:.0}" y="{ty:.0}" font-size="11" fill="{TEXT_COLOR}">0</text><text x="{r:.0}" y="{ty:.0}" font-size="11" text-anchor="end" fill="{TEXT_COLOR}">{last_lag}</text>"#,
        p = PADDING,
        r = WIDTH - PADDING,
        ty = HEIGHT - PADDING + 16.0,
    ));
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(values: &[f64]) -> Vec<(NaiveDate, f64)> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start + chrono::Duration::days(i as i64), v))
            .collect()
    }

    #[test]
    fn empty_line_is_placeholder() {
        let svg = line_chart_svg(&[], "Cierre");
        assert!(svg.contains(UNAVAILABLE_TITLE));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn line_chart_has_polyline_and_labels() {
        let svg = line_chart_svg(&pts(&[1.0, 3.0, 2.0]), "Cierre");
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains(PRICE_TITLE));
        assert!(svg.contains("2024-01-01"));
        assert!(svg.contains("2024-01-03"));
        assert!(svg.contains("3.00"));
    }

    #[test]
    fn line_points_stay_inside_plot() {
        let svg = line_chart_svg(&pts(&[10.0, 20.0]), "Cierre");
        // first point at the bottom-left, second at the top-right
        assert!(svg.contains("48.0,312.0 852.0,48.0"));
    }

    #[test]
    fn flat_series_does_not_divide_by_zero() {
        let svg = line_chart_svg(&pts(&[5.0, 5.0, 5.0]), "Cierre");
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn correlogram_draws_one_bar_per_lag() {
        let coefs: Vec<LagCoefficient> = (0..=40)
            .map(|lag| LagCoefficient { lag, value: 1.0 - lag as f64 / 40.0 })
            .collect();
        let svg = correlogram_svg("ACF del Precio", &coefs, 0.1, ACCENT_COLOR);
        assert_eq!(svg.matches("<rect x=").count(), 41);
        assert_eq!(svg.matches("stroke-dasharray").count(), 2);
        assert!(svg.contains(ACCENT_COLOR));
    }

    #[test]
    fn titles_are_escaped() {
        let svg = placeholder_svg("<b>&");
        assert!(svg.contains("&lt;b&gt;&amp;"));
    }
}
