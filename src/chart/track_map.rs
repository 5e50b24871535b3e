// Speed map renderer
// Converts the fastest lap's telemetry positions into an SVG track map with
// per-segment strokes colored by speed over a dark underlay, plus a colorbar.

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::TelemetryTrace;
use crate::chart::svg::{self, Panel};
use crate::chart::ChartStyle;
use crate::errors::PitwallError;
use crate::session::TelemetrySample;

/// Configuration for speed map generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackMapConfig {
    /// Canvas dimensions (width, height) in pixels
    pub canvas_size: (u32, u32),
    /// Stroke width for the speed-colored segments
    pub stroke_width: f32,
    /// Stroke width for the dark track outline drawn underneath
    pub underlay_width: f32,
    /// Margin around the track as percentage of canvas size
    pub margin_percentage: f32,
}

impl Default for TrackMapConfig {
    fn default() -> Self {
        Self {
            canvas_size: (480, 480),
            stroke_width: 4.0,
            underlay_width: 14.0,
            margin_percentage: 0.12,
        }
    }
}

/// Bounding box for coordinate normalization
#[derive(Debug, Clone, Copy)]
struct BoundingBox {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

impl BoundingBox {
    fn new() -> Self {
        Self {
            min_x: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            min_y: f32::INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    fn update(&mut self, x: f32, y: f32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Plasma-like gradient stops from slow (dark blue) to fast (yellow)
const SPEED_GRADIENT: &[(u8, u8, u8)] = &[(13, 8, 135), (204, 71, 120), (240, 249, 33)];

/// Map a normalized speed (0.0 = slowest, 1.0 = fastest) to a gradient color
fn speed_color(t: f32) -> String {
    let t = t.clamp(0.0, 1.0);
    let segments = (SPEED_GRADIENT.len() - 1) as f32;
    let position = t * segments;
    let index = (position.floor() as usize).min(SPEED_GRADIENT.len() - 2);
    let local = position - index as f32;
    let (r1, g1, b1) = SPEED_GRADIENT[index];
    let (r2, g2, b2) = SPEED_GRADIENT[index + 1];
    let lerp = |a: u8, b: u8| -> u8 { (a as f32 + (b as f32 - a as f32) * local).round() as u8 };
    format!("#{:02x}{:02x}{:02x}", lerp(r1, r2), lerp(g1, g2), lerp(b1, b2))
}

/// Generator for speed-colored track maps from a fastest-lap telemetry trace
pub struct TrackMapRenderer {
    config: TrackMapConfig,
}

impl TrackMapRenderer {
    pub fn new() -> Self {
        Self {
            config: TrackMapConfig::default(),
        }
    }

    pub fn with_config(config: TrackMapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrackMapConfig {
        &self.config
    }

    /// Render the speed map for a telemetry trace. An unavailable trace
    /// renders the placeholder panel instead of failing.
    pub fn render(
        &self,
        trace: &TelemetryTrace,
        style: &ChartStyle,
    ) -> Result<Panel, PitwallError> {
        if !trace.available {
            return Ok(self.render_placeholder(style));
        }
        self.render_samples(&trace.samples, trace.driver.as_deref().unwrap_or("?"), style)
    }

    /// Placeholder panel shown when telemetry could not be loaded
    pub fn render_placeholder(&self, style: &ChartStyle) -> Panel {
        let (width, height) = (
            self.config.canvas_size.0 as f32,
            self.config.canvas_size.1 as f32,
        );
        let mut body = String::new();
        body.push_str(&svg::rect(0.0, 0.0, width, height, &style.background, "none"));
        body.push('\n');
        body.push_str(&svg::text(
            width / 2.0,
            height / 2.0,
            "Telemetry Not Available",
            &style.text_color,
            12.0,
            "middle",
        ));
        Panel {
            width: self.config.canvas_size.0,
            height: self.config.canvas_size.1,
            body,
        }
    }

    fn render_samples(
        &self,
        samples: &[TelemetrySample],
        driver: &str,
        style: &ChartStyle,
    ) -> Result<Panel, PitwallError> {
        let valid: Vec<&TelemetrySample> = samples
            .iter()
            .filter(|s| s.x.is_finite() && s.y.is_finite() && s.speed_kmh.is_finite())
            .collect();
        if valid.len() < 2 {
            return Err(PitwallError::SvgGenerationError {
                reason: format!(
                    "Not enough telemetry samples for a track map ({}, minimum 2)",
                    valid.len()
                ),
            });
        }
        debug!("Rendering speed map from {} samples", valid.len());

        let mut bbox = BoundingBox::new();
        for sample in &valid {
            bbox.update(sample.x, sample.y);
        }
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Err(PitwallError::SvgGenerationError {
                reason: format!(
                    "Degenerate track geometry: {}x{}",
                    bbox.width(),
                    bbox.height()
                ),
            });
        }

        let (min_speed, max_speed) = match valid.iter().map(|s| s.speed_kmh).minmax() {
            itertools::MinMaxResult::MinMax(min, max) => (min, max),
            _ => unreachable!("at least two samples checked above"),
        };
        let speed_span = if max_speed > min_speed {
            max_speed - min_speed
        } else {
            1.0
        };

        let (width, height) = (
            self.config.canvas_size.0 as f32,
            self.config.canvas_size.1 as f32,
        );
        let margin_x = width * self.config.margin_percentage;
        let margin_y = height * self.config.margin_percentage;
        let usable_width = width - 2.0 * margin_x;
        let usable_height = height - 2.0 * margin_y;

        // Uniform scale preserves the track's aspect ratio; y flips because
        // SVG y grows downward
        let scale = (usable_width / bbox.width()).min(usable_height / bbox.height());
        let offset_x = margin_x + (usable_width - bbox.width() * scale) / 2.0;
        let offset_y = margin_y + (usable_height - bbox.height() * scale) / 2.0;
        let to_canvas = |sample: &TelemetrySample| -> (f32, f32) {
            (
                offset_x + (sample.x - bbox.min_x) * scale,
                offset_y + (bbox.max_y - sample.y) * scale,
            )
        };

        let mut body = String::new();
        body.push_str(&svg::rect(0.0, 0.0, width, height, &style.background, "none"));
        body.push('\n');
        body.push_str(&svg::text(
            width / 2.0,
            20.0,
            &format!("{} Fastest Lap Speed Map", driver),
            &style.text_color,
            13.0,
            "middle",
        ));
        body.push('\n');

        // Dark underlay path for the track outline
        let outline: Vec<String> = valid
            .iter()
            .map(|s| {
                let (x, y) = to_canvas(*s);
                format!("{:.2},{:.2}", x, y)
            })
            .collect();
        body.push_str(&format!(
            r##"  <polyline points="{}" fill="none" stroke="#2a2a2a" stroke-width="{:.2}" stroke-linecap="round" stroke-linejoin="round" />"##,
            outline.join(" "),
            self.config.underlay_width
        ));
        body.push('\n');

        // One speed-colored stroke per consecutive sample pair
        for pair in valid.windows(2) {
            let (x1, y1) = to_canvas(pair[0]);
            let (x2, y2) = to_canvas(pair[1]);
            let mean_speed = (pair[0].speed_kmh + pair[1].speed_kmh) / 2.0;
            let color = speed_color((mean_speed - min_speed) / speed_span);
            body.push_str(&format!(
                r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}" stroke-linecap="round" />"#,
                x1, y1, x2, y2, color, self.config.stroke_width
            ));
            body.push('\n');
        }

        self.render_colorbar(&mut body, min_speed, max_speed, style);

        Ok(Panel {
            width: self.config.canvas_size.0,
            height: self.config.canvas_size.1,
            body,
        })
    }

    /// Horizontal speed colorbar along the bottom edge
    fn render_colorbar(&self, body: &mut String, min_speed: f32, max_speed: f32, style: &ChartStyle) {
        const COLORBAR_STEPS: usize = 24;
        let (width, height) = (
            self.config.canvas_size.0 as f32,
            self.config.canvas_size.1 as f32,
        );
        let bar_width = width * 0.4;
        let bar_height = 8.0;
        let bar_x = (width - bar_width) / 2.0;
        let bar_y = height - 30.0;

        let step_width = bar_width / COLORBAR_STEPS as f32;
        for step in 0..COLORBAR_STEPS {
            let t = step as f32 / (COLORBAR_STEPS - 1) as f32;
            let color = speed_color(t);
            body.push_str(&svg::rect(
                bar_x + step_width * step as f32,
                bar_y,
                step_width + 0.5,
                bar_height,
                &color,
                "none",
            ));
            body.push('\n');
        }
        body.push_str(&svg::text(
            bar_x - 6.0,
            bar_y + bar_height - 1.0,
            &format!("{:.0}", min_speed),
            &style.text_color,
            9.0,
            "end",
        ));
        body.push('\n');
        body.push_str(&svg::text(
            bar_x + bar_width + 6.0,
            bar_y + bar_height - 1.0,
            &format!("{:.0}", max_speed),
            &style.text_color,
            9.0,
            "start",
        ));
        body.push('\n');
        body.push_str(&svg::text(
            width / 2.0,
            bar_y + bar_height + 14.0,
            "Speed (km/h)",
            &style.text_color,
            9.0,
            "middle",
        ));
        body.push('\n');
    }
}

impl Default for TrackMapRenderer {
    fn default() -> Self {
        Self::new()
    }
}
