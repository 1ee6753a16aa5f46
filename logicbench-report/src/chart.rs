//! Timing Chart
//!
//! One point per measured case, x = case name, y = average time in ms, in
//! run order. Failed cases have no timing and are left off the chart.

use crate::report::CaseReport;
use std::fmt::Write as _;

/// Character columns given to each point in the terminal chart
const COLUMN_WIDTH: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint<'a> {
    pub label: &'a str,
    pub value_ms: f64,
}

pub fn chart_points(results: &[CaseReport]) -> Vec<ChartPoint<'_>> {
    results
        .iter()
        .filter_map(|r| {
            r.average_time_ms().map(|value_ms| ChartPoint {
                label: &r.name,
                value_ms,
            })
        })
        .collect()
}

fn scale_max(points: &[ChartPoint<'_>]) -> f64 {
    let max = points.iter().map(|p| p.value_ms).fold(0.0, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// Plot the points on a character grid `height` rows tall.
///
/// Points are drawn as `*` and joined with `.`; the legend under the x axis
/// maps point numbers to case names.
pub fn render_ascii_chart(points: &[ChartPoint<'_>], height: usize) -> String {
    if points.is_empty() {
        return "No timings to chart.\n".to_string();
    }

    let height = height.max(2);
    let max = scale_max(points);
    let width = points.len() * COLUMN_WIDTH;
    let mut grid = vec![vec![' '; width]; height];

    let level = |v: f64| ((v / max) * (height - 1) as f64).round() as usize;
    let column = |i: usize| i * COLUMN_WIDTH + COLUMN_WIDTH / 2;

    for (i, pair) in points.windows(2).enumerate() {
        let (x0, x1) = (column(i), column(i + 1));
        let (y0, y1) = (level(pair[0].value_ms) as f64, level(pair[1].value_ms) as f64);
        for x in x0 + 1..x1 {
            let t = (x - x0) as f64 / (x1 - x0) as f64;
            let y = (y0 + (y1 - y0) * t).round() as usize;
            grid[height - 1 - y][x] = '.';
        }
    }
    for (i, point) in points.iter().enumerate() {
        grid[height - 1 - level(point.value_ms)][column(i)] = '*';
    }

    let mut out = String::new();
    for (row, cells) in grid.iter().enumerate() {
        let axis_label = if row == 0 {
            format!("{:>10.4}", max)
        } else if row == height - 1 {
            format!("{:>10.4}", 0.0)
        } else {
            " ".repeat(10)
        };
        let line: String = cells.iter().collect();
        let _ = writeln!(out, "{} |{}", axis_label, line.trim_end());
    }
    let _ = writeln!(out, "{} +{}", " ".repeat(10), "-".repeat(width));

    let mut ticks = String::new();
    for i in 0..points.len() {
        let _ = write!(ticks, "{:^width$}", i + 1, width = COLUMN_WIDTH);
    }
    let _ = writeln!(out, "{}  {}", " ".repeat(10), ticks.trim_end());
    let _ = writeln!(out, "{}  time (ms) per case", " ".repeat(10));
    out.push('\n');

    for (i, point) in points.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {} ({:.4} ms)", i + 1, point.label, point.value_ms);
    }

    out
}

/// Inline SVG line chart for the HTML report
pub fn render_svg_chart(points: &[ChartPoint<'_>], width: u32, height: u32) -> String {
    const MARGIN_LEFT: f64 = 70.0;
    const MARGIN_RIGHT: f64 = 30.0;
    const MARGIN_TOP: f64 = 10.0;
    const MARGIN_BOTTOM: f64 = 90.0;

    let plot_w = (f64::from(width) - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let plot_h = (f64::from(height) - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
    let max = scale_max(points);

    let x_at = |i: usize| {
        if points.len() <= 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + plot_w * i as f64 / (points.len() - 1) as f64
        }
    };
    let y_at = |v: f64| MARGIN_TOP + plot_h * (1.0 - v / max);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img">"#,
        w = width,
        h = height
    );

    // Grid and y axis labels
    for step in 0..=4 {
        let value = max * f64::from(step) / 4.0;
        let y = y_at(value);
        let _ = writeln!(
            svg,
            r##"  <line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#ddd" stroke-dasharray="3 3"/>"##,
            x1 = MARGIN_LEFT,
            x2 = MARGIN_LEFT + plot_w,
            y = y
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{x:.1}" y="{y:.1}" font-size="11" text-anchor="end">{v:.4}</text>"#,
            x = MARGIN_LEFT - 6.0,
            y = y + 4.0,
            v = value
        );
    }
    let _ = writeln!(
        svg,
        r#"  <text transform="translate(14 {y:.1}) rotate(-90)" font-size="12" text-anchor="middle">Time (ms)</text>"#,
        y = MARGIN_TOP + plot_h / 2.0
    );

    if !points.is_empty() {
        let coords: Vec<String> = points
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{:.1},{:.1}", x_at(i), y_at(p.value_ms)))
            .collect();
        let _ = writeln!(
            svg,
            r##"  <polyline fill="none" stroke="#8884d8" stroke-width="2" points="{}"/>"##,
            coords.join(" ")
        );
    }

    for (i, point) in points.iter().enumerate() {
        let (x, y) = (x_at(i), y_at(point.value_ms));
        let _ = writeln!(
            svg,
            r##"  <circle cx="{x:.1}" cy="{y:.1}" r="4" fill="#fff" stroke="#8884d8" stroke-width="2"><title>{label}: {v:.4} ms</title></circle>"##,
            x = x,
            y = y,
            label = crate::html::escape_html(point.label),
            v = point.value_ms
        );
        let _ = writeln!(
            svg,
            r#"  <text transform="translate({x:.1} {y:.1}) rotate(-45)" font-size="11" text-anchor="end">{label}</text>"#,
            x = x,
            y = MARGIN_TOP + plot_h + 14.0,
            label = crate::html::escape_html(point.label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}
