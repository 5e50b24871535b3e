// Horizontal bar chart renderer
// Used for the delta-to-pole and total race time charts. Rows render top to
// bottom in the order given, so rank order puts the leader at the top.

use crate::chart::svg::{self, Panel};
use crate::chart::ChartStyle;
use crate::errors::PitwallError;

/// One bar: label on the left axis, value along x, optional annotation text
/// drawn at the end of the bar
#[derive(Clone, Debug)]
pub struct BarRow {
    pub label: String,
    pub value: f64,
    pub color: String,
    pub annotation: Option<String>,
}

#[derive(Clone, Debug)]
pub struct BarChartConfig {
    pub canvas_size: (u32, u32),
    pub title: String,
    pub x_label: String,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            canvas_size: (420, 480),
            title: String::new(),
            x_label: String::new(),
        }
    }
}

const MARGIN_TOP: f32 = 48.0;
const MARGIN_BOTTOM: f32 = 42.0;
const MARGIN_LEFT: f32 = 56.0;
const MARGIN_RIGHT: f32 = 16.0;
const BAR_GAP_PCT: f32 = 0.25;
const X_TICKS: usize = 4;
const ROW_SLOT_HEIGHT: u32 = 24;

/// Canvas height that fits `rows` bars at the standard slot height plus the
/// chart margins, so short tables still leave room for the plot area
pub fn bar_chart_height(rows: usize) -> u32 {
    (MARGIN_TOP + MARGIN_BOTTOM) as u32 + ROW_SLOT_HEIGHT * rows as u32
}

pub fn render_bar_chart(
    config: &BarChartConfig,
    style: &ChartStyle,
    rows: &[BarRow],
) -> Result<Panel, PitwallError> {
    if rows.is_empty() {
        return Err(PitwallError::SvgGenerationError {
            reason: "Cannot render bar chart with no rows".to_string(),
        });
    }
    let max_value = rows.iter().map(|r| r.value).fold(0.0_f64, f64::max);
    if !max_value.is_finite() || rows.iter().any(|r| !r.value.is_finite() || r.value < 0.0) {
        return Err(PitwallError::SvgGenerationError {
            reason: "Bar values must be finite and non-negative".to_string(),
        });
    }
    // All-zero rows still render, just with zero-width bars
    let scale_max = if max_value > 0.0 { max_value } else { 1.0 };

    let (width, height) = (config.canvas_size.0 as f32, config.canvas_size.1 as f32);
    let plot_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = height - MARGIN_TOP - MARGIN_BOTTOM;
    if plot_width <= 0.0 || plot_height <= 0.0 {
        return Err(PitwallError::SvgGenerationError {
            reason: format!("Canvas too small: {}x{}", width, height),
        });
    }

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

    // Dashed vertical grid behind the bars
    for tick in 0..=X_TICKS {
        let tick_value = scale_max * tick as f64 / X_TICKS as f64;
        let x = MARGIN_LEFT + plot_width * tick as f32 / X_TICKS as f32;
        body.push_str(&svg::dashed_line(
            x,
            MARGIN_TOP,
            x,
            MARGIN_TOP + plot_height,
            &style.grid_color,
            1.0,
        ));
        body.push('\n');
        body.push_str(&svg::text(
            x,
            MARGIN_TOP + plot_height + 16.0,
            &format!("{:.1}", tick_value),
            &style.text_color,
            9.0,
            "middle",
        ));
        body.push('\n');
    }

    let slot_height = plot_height / rows.len() as f32;
    let bar_height = slot_height * (1.0 - BAR_GAP_PCT);
    for (i, row) in rows.iter().enumerate() {
        let y = MARGIN_TOP + slot_height * i as f32 + slot_height * BAR_GAP_PCT / 2.0;
        let bar_width = plot_width * (row.value / scale_max) as f32;
        body.push_str(&svg::rect(
            MARGIN_LEFT,
            y,
            bar_width,
            bar_height,
            &row.color,
            &style.edge_color,
        ));
        body.push('\n');
        body.push_str(&svg::text(
            MARGIN_LEFT - 6.0,
            y + bar_height / 2.0 + 3.5,
            &row.label,
            &style.text_color,
            10.0,
            "end",
        ));
        body.push('\n');
        if let Some(annotation) = &row.annotation {
            body.push_str(&svg::text(
                MARGIN_LEFT + bar_width + 4.0,
                y + bar_height / 2.0 + 3.5,
                annotation,
                &style.text_color,
                9.0,
                "start",
            ));
            body.push('\n');
        }
    }

    body.push_str(&svg::text(
        MARGIN_LEFT + plot_width / 2.0,
        height - 10.0,
        &config.x_label,
        &style.text_color,
        11.0,
        "middle",
    ));

    Ok(Panel {
        width: config.canvas_size.0,
        height: config.canvas_size.1,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<BarRow> {
        vec![
            BarRow {
                label: "VER".to_string(),
                value: 0.0,
                color: "#3671c6".to_string(),
                annotation: None,
            },
            BarRow {
                label: "LEC".to_string(),
                value: 0.214,
                color: "#e8002d".to_string(),
                annotation: Some("+0.214".to_string()),
            },
        ]
    }

    #[test]
    fn test_render_bar_chart() {
        let config = BarChartConfig {
            title: "Delta to Pole".to_string(),
            x_label: "Delta (s)".to_string(),
            ..Default::default()
        };
        let panel = render_bar_chart(&config, &ChartStyle::default(), &sample_rows()).unwrap();
        assert!(panel.body.contains("Delta to Pole"));
        assert!(panel.body.contains("VER"));
        assert!(panel.body.contains("+0.214"));

        let document = panel.into_document();
        assert!(document.starts_with("<svg"));
        assert!(document.ends_with("</svg>"));
    }

    #[test]
    fn test_two_row_chart_renders_at_fitted_height() {
        // A two-driver table must still leave a positive plot area
        let config = BarChartConfig {
            canvas_size: (420, bar_chart_height(2)),
            ..Default::default()
        };
        let panel = render_bar_chart(&config, &ChartStyle::default(), &sample_rows()).unwrap();
        assert!(panel.body.contains("VER"));
        assert!(panel.body.contains("LEC"));
    }

    #[test]
    fn test_empty_rows_fail() {
        let result = render_bar_chart(&BarChartConfig::default(), &ChartStyle::default(), &[]);
        assert!(matches!(
            result,
            Err(PitwallError::SvgGenerationError { .. })
        ));
    }

    #[test]
    fn test_negative_values_fail() {
        let rows = vec![BarRow {
            label: "X".to_string(),
            value: -1.0,
            color: "#fff".to_string(),
            annotation: None,
        }];
        let result = render_bar_chart(&BarChartConfig::default(), &ChartStyle::default(), &rows);
        assert!(result.is_err());
    }

    #[test]
    fn test_all_zero_values_render() {
        let rows = vec![BarRow {
            label: "VER".to_string(),
            value: 0.0,
            color: "#3671c6".to_string(),
            annotation: None,
        }];
        let panel =
            render_bar_chart(&BarChartConfig::default(), &ChartStyle::default(), &rows).unwrap();
        assert!(panel.body.contains("VER"));
    }
}
