// Line chart renderer
// Used for the lap-time and position progression charts. Supports an
// inverted y-axis so position 1 renders at the top.

use crate::chart::svg::{self, Panel};
use crate::chart::ChartStyle;
use crate::errors::PitwallError;

/// One plotted series. `dashed` distinguishes teammates sharing a color.
#[derive(Clone, Debug)]
pub struct LineSeries {
    pub label: String,
    pub color: String,
    pub dashed: bool,
    /// (x, y) data points in data coordinates
    pub points: Vec<(f64, f64)>,
}

pub struct LineChartConfig {
    pub canvas_size: (u32, u32),
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Render larger y values toward the bottom (position charts)
    pub invert_y: bool,
    /// Formatter for y-axis tick labels; lap-time charts format durations
    pub y_formatter: Box<dyn Fn(f64) -> String>,
}

impl Default for LineChartConfig {
    fn default() -> Self {
        Self {
            canvas_size: (640, 480),
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            invert_y: false,
            y_formatter: Box::new(|v| format!("{:.0}", v)),
        }
    }
}

const MARGIN_TOP: f32 = 48.0;
const MARGIN_BOTTOM: f32 = 46.0;
const MARGIN_LEFT: f32 = 64.0;
const MARGIN_RIGHT: f32 = 70.0;
const Y_TICKS: usize = 5;
const X_TICKS: usize = 6;

pub fn render_line_chart(
    config: &LineChartConfig,
    style: &ChartStyle,
    series: &[LineSeries],
) -> Result<Panel, PitwallError> {
    let plotted: Vec<&LineSeries> = series.iter().filter(|s| !s.points.is_empty()).collect();
    if plotted.is_empty() {
        return Err(PitwallError::SvgGenerationError {
            reason: "Cannot render line chart with no data points".to_string(),
        });
    }
    for s in &plotted {
        if s.points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(PitwallError::SvgGenerationError {
                reason: format!("Series {} contains non-finite points", s.label),
            });
        }
    }

    let all_points = plotted.iter().flat_map(|s| s.points.iter());
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for (x, y) in all_points {
        min_x = min_x.min(*x);
        max_x = max_x.max(*x);
        min_y = min_y.min(*y);
        max_y = max_y.max(*y);
    }
    // Degenerate ranges get a unit span so single-point series still render
    if max_x - min_x < f64::EPSILON {
        max_x = min_x + 1.0;
    }
    if max_y - min_y < f64::EPSILON {
        max_y = min_y + 1.0;
    }

    let (width, height) = (config.canvas_size.0 as f32, config.canvas_size.1 as f32);
    let plot_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = height - MARGIN_TOP - MARGIN_BOTTOM;
    if plot_width <= 0.0 || plot_height <= 0.0 {
        return Err(PitwallError::SvgGenerationError {
            reason: format!("Canvas too small: {}x{}", width, height),
        });
    }

    let to_canvas = |x: f64, y: f64| -> (f32, f32) {
        let fx = ((x - min_x) / (max_x - min_x)) as f32;
        let mut fy = ((y - min_y) / (max_y - min_y)) as f32;
        if !config.invert_y {
            // SVG y grows downward, so non-inverted charts flip the axis
            fy = 1.0 - fy;
        }
        (MARGIN_LEFT + fx * plot_width, MARGIN_TOP + fy * plot_height)
    };

    let mut body = String::new();
    body.push_str(&svg::rect(0.0, 0.0, width, height, &style.background, "none"));
    body.push('\n');
    body.push_str(&svg::text(
        width / 2.0,
        20.0,
        &config.title,
        &style.text_color,
        13.0,
        "middle",
    ));
    body.push('\n');

    // Grid and tick labels
    for tick in 0..=Y_TICKS {
        let value = min_y + (max_y - min_y) * tick as f64 / Y_TICKS as f64;
        let (_, y) = to_canvas(min_x, value);
        body.push_str(&svg::dashed_line(
            MARGIN_LEFT,
            y,
            MARGIN_LEFT + plot_width,
            y,
            &style.grid_color,
            1.0,
        ));
        body.push('\n');
        body.push_str(&svg::text(
            MARGIN_LEFT - 6.0,
            y + 3.5,
            &(config.y_formatter)(value),
            &style.text_color,
            9.0,
            "end",
        ));
        body.push('\n');
    }
    for tick in 0..=X_TICKS {
        let value = min_x + (max_x - min_x) * tick as f64 / X_TICKS as f64;
        let (x, _) = to_canvas(value, min_y);
        body.push_str(&svg::text(
            x,
            MARGIN_TOP + plot_height + 16.0,
            &format!("{:.0}", value),
            &style.text_color,
            9.0,
            "middle",
        ));
        body.push('\n');
    }

    for s in &plotted {
        let path: Vec<String> = s
            .points
            .iter()
            .map(|(x, y)| {
                let (cx, cy) = to_canvas(*x, *y);
                format!("{:.2},{:.2}", cx, cy)
            })
            .collect();
        let dash = if s.dashed {
            r#" stroke-dasharray="6 4""#
        } else {
            ""
        };
        body.push_str(&format!(
            r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="1.8"{} />"#,
            path.join(" "),
            s.color,
            dash
        ));
        body.push('\n');
    }

    // Legend down the right edge, one entry per series
    for (i, s) in plotted.iter().enumerate() {
        let y = MARGIN_TOP + 12.0 * i as f32;
        let x = MARGIN_LEFT + plot_width + 8.0;
        if s.dashed {
            body.push_str(&svg::dashed_line(x, y, x + 16.0, y, &s.color, 2.0));
        } else {
            body.push_str(&svg::line(x, y, x + 16.0, y, &s.color, 2.0));
        }
        body.push('\n');
        body.push_str(&svg::text(
            x + 20.0,
            y + 3.5,
            &s.label,
            &style.text_color,
            9.0,
            "start",
        ));
        body.push('\n');
    }

    body.push_str(&svg::text(
        MARGIN_LEFT + plot_width / 2.0,
        height - 10.0,
        &config.x_label,
        &style.text_color,
        11.0,
        "middle",
    ));
    body.push('\n');
    // Rotated y-axis label along the left edge
    body.push_str(&format!(
        r#"  <text x="14" y="{:.2}" fill="{}" font-size="11.0" font-family="sans-serif" text-anchor="middle" transform="rotate(-90 14 {:.2})">{}</text>"#,
        MARGIN_TOP + plot_height / 2.0,
        style.text_color,
        MARGIN_TOP + plot_height / 2.0,
        svg::escape_text(&config.y_label)
    ));

    Ok(Panel {
        width: config.canvas_size.0,
        height: config.canvas_size.1,
        body,
    })
}
