//! Standalone SVG line chart of every trader's sampled portfolio value.

use std::fs;

use crate::domain::error::StocksimError;
use crate::domain::simulation::SimulationResult;
use crate::ports::report_port::ReportPort;

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 80.0;

const PALETTE: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

#[derive(Debug, Default)]
pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the chart. Every snapshot date is one x step; all traders share
/// the y scale.
pub fn render_chart(result: &SimulationResult) -> String {
    let dates: Vec<_> = result.snapshots.iter().map(|s| s.date).collect();
    let values = result
        .snapshots
        .iter()
        .flat_map(|s| s.values.iter().map(|&(_, v)| v));
    let (min_value, max_value) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let range = (max_value - min_value).max(1.0);

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let x_scale =
        |i: usize| -> f64 { MARGIN_LEFT + (i as f64 / (dates.len().max(2) - 1) as f64) * plot_width };
    let y_scale =
        |v: f64| -> f64 { MARGIN_TOP + plot_height - ((v - min_value) / range) * plot_height };

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"20\" text-anchor=\"middle\" font-size=\"16\">Trader Portfolio Values Over Time</text>\n",
        CHART_WIDTH / 2.0
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"38\" text-anchor=\"middle\" font-size=\"11\" fill=\"#666\">Stocks: {}</text>\n",
        CHART_WIDTH / 2.0,
        escape(&result.symbols.join(", "))
    ));

    // axes
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));

    if dates.is_empty() {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"12\" fill=\"#666\">No valuation samples</text>\n",
            CHART_WIDTH / 2.0,
            MARGIN_TOP + plot_height / 2.0
        ));
        svg.push_str("</svg>\n");
        return svg;
    }

    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{:.0}</text>\n",
        MARGIN_LEFT - 5.0,
        MARGIN_TOP + 5.0,
        max_value
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{:.0}</text>\n",
        MARGIN_LEFT - 5.0,
        CHART_HEIGHT - MARGIN_BOTTOM,
        min_value
    ));
    let label_y = CHART_HEIGHT - MARGIN_BOTTOM + 15.0;
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"start\" font-size=\"10\" fill=\"#666\">{}</text>\n",
        MARGIN_LEFT, label_y, dates[0]
    ));
    if let Some(last) = dates.last().filter(|_| dates.len() > 1) {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            CHART_WIDTH - MARGIN_RIGHT,
            label_y,
            last
        ));
    }

    for (n, name) in result.trader_names().into_iter().enumerate() {
        let color = PALETTE[n % PALETTE.len()];
        let points: Vec<String> = result
            .snapshots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.value_of(name).map(|v| (i, v)))
            .map(|(i, v)| format!("{:.1},{:.1}", x_scale(i), y_scale(v)))
            .collect();

        svg.push_str(&format!(
            "  <polyline fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" points=\"{}\"><title>{}</title></polyline>\n",
            color,
            points.join(" "),
            escape(name)
        ));

        let legend_y = CHART_HEIGHT - MARGIN_BOTTOM + 35.0 + (n / 2) as f64 * 14.0;
        let legend_x = MARGIN_LEFT + (n % 2) as f64 * plot_width / 2.0;
        svg.push_str(&format!(
            "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"10\" height=\"10\" fill=\"{}\"/>\n",
            legend_x,
            legend_y - 9.0,
            color
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\">{}</text>\n",
            legend_x + 14.0,
            legend_y,
            escape(name)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

impl ReportPort for SvgChartAdapter {
    fn write(&self, result: &SimulationResult, output_path: &str) -> Result<(), StocksimError> {
        fs::write(output_path, render_chart(result)).map_err(|e| StocksimError::Report {
            reason: format!("failed to write chart {}: {}", output_path, e),
        })
    }
}
