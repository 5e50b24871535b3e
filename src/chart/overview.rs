// Race overview figure
// Composes the five panels the race plotter produces (lap times, position
// progression, total race times, qualifying deltas, speed map) into a single
// SVG document with a suptitle naming the event and the pole lap.

use std::collections::HashMap;

use crate::analysis::{
    self, RankedLap, fastest_lap_telemetry, fastest_laps_ranked, top_finishers, total_race_time,
};
use crate::chart::bars::{BarChartConfig, BarRow, render_bar_chart};
use crate::chart::lines::{LineChartConfig, LineSeries, render_line_chart};
use crate::chart::svg::{self, Panel};
use crate::chart::track_map::TrackMapRenderer;
use crate::chart::ChartStyle;
use crate::errors::PitwallError;
use crate::session::Session;

#[derive(Clone, Debug)]
pub struct OverviewConfig {
    /// How many race finishers the line and bar panels cover
    pub top_finishers: usize,
    /// How many ranked qualifying rows the delta panel shows
    pub qualifying_rows: usize,
    pub panel_height: u32,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            top_finishers: 10,
            qualifying_rows: 15,
            panel_height: 480,
        }
    }
}

const TITLE_HEIGHT: u32 = 56;
const PANEL_GAP: u32 = 12;

/// Bar rows for a ranked qualifying table: delta seconds, team colors,
/// fastest at the top
pub fn delta_bar_rows(ranking: &[RankedLap], style: &ChartStyle) -> Vec<BarRow> {
    ranking
        .iter()
        .map(|row| BarRow {
            label: row.driver.clone(),
            value: row.delta.as_secs_f64(),
            color: style.team_color(&row.team),
            annotation: None,
        })
        .collect()
}

/// Lap-time series for the given drivers' quick laps. Drivers whose race had
/// no quick laps are skipped; the second driver of a team renders dashed.
fn lap_time_series(race: &Session, drivers: &[String], style: &ChartStyle) -> Vec<LineSeries> {
    let mut team_seen: HashMap<String, usize> = HashMap::new();
    let mut series = Vec::new();
    for driver in drivers {
        let laps = race.quick_laps(driver);
        if laps.is_empty() {
            continue;
        }
        let team = laps[0].team.clone();
        let seen = team_seen.entry(team.clone()).or_insert(0);
        let dashed = *seen > 0;
        *seen += 1;
        series.push(LineSeries {
            label: driver.clone(),
            color: style.driver_color(driver, &team),
            dashed,
            points: laps
                .iter()
                .filter_map(|lap| {
                    lap.lap_time
                        .map(|t| (lap.lap_number as f64, t.as_secs_f64()))
                })
                .collect(),
        });
    }
    series
}

/// Position-per-lap series for the given drivers; laps without position data
/// are skipped
fn position_series(race: &Session, drivers: &[String], style: &ChartStyle) -> Vec<LineSeries> {
    let mut series = Vec::new();
    for driver in drivers {
        let laps = race.driver_laps(driver);
        let points: Vec<(f64, f64)> = laps
            .iter()
            .filter_map(|lap| lap.position.map(|p| (lap.lap_number as f64, p as f64)))
            .collect();
        if points.is_empty() {
            continue;
        }
        let team = laps[0].team.clone();
        series.push(LineSeries {
            label: driver.clone(),
            color: style.driver_color(driver, &team),
            dashed: false,
            points,
        });
    }
    series
}

fn race_time_rows(race: &Session, drivers: &[String], style: &ChartStyle) -> Vec<BarRow> {
    drivers
        .iter()
        .map(|driver| {
            let team = race
                .driver_laps(driver)
                .first()
                .map(|lap| lap.team.clone())
                .unwrap_or_default();
            let total = total_race_time(race, driver).as_secs_f64();
            BarRow {
                label: driver.clone(),
                value: total,
                color: style.driver_color(driver, &team),
                annotation: Some(format!("{:.1}s", total)),
            }
        })
        .collect()
}

/// Render the full race & qualifying overview. Empty qualifying propagates as
/// `EmptyQualifyingResult`; unavailable telemetry degrades to the placeholder
/// panel.
pub fn render_race_overview(
    race: &Session,
    qualy: &Session,
    style: &ChartStyle,
    config: &OverviewConfig,
) -> Result<String, PitwallError> {
    let drivers = top_finishers(race, config.top_finishers);
    let ranking = fastest_laps_ranked(qualy)?;
    let pole = &ranking[0];
    let trace = fastest_lap_telemetry(race);

    let panel_height = config.panel_height;
    let mut panels = Vec::new();

    let lap_time_config = LineChartConfig {
        canvas_size: (620, panel_height),
        title: format!(
            "Top {} Lap Times - {} {}",
            config.top_finishers, race.info.event_name, race.info.year
        ),
        x_label: "Lap Number".to_string(),
        y_label: "Lap Time".to_string(),
        invert_y: false,
        y_formatter: Box::new(|secs| {
            analysis::format_lap_time(std::time::Duration::from_secs_f64(secs.max(0.0)))
        }),
    };
    panels.push(render_line_chart(
        &lap_time_config,
        style,
        &lap_time_series(race, &drivers, style),
    )?);

    let position_config = LineChartConfig {
        canvas_size: (620, panel_height),
        title: format!("Race Position Per Lap (Top {})", config.top_finishers),
        x_label: "Lap Number".to_string(),
        y_label: "Position".to_string(),
        invert_y: true,
        y_formatter: Box::new(|position| format!("{:.0}", position)),
    };
    panels.push(render_line_chart(
        &position_config,
        style,
        &position_series(race, &drivers, style),
    )?);

    let race_time_config = BarChartConfig {
        canvas_size: (300, panel_height),
        title: "Final Race Times".to_string(),
        x_label: "Race Time (s)".to_string(),
    };
    panels.push(render_bar_chart(
        &race_time_config,
        style,
        &race_time_rows(race, &drivers, style),
    )?);

    let delta_config = BarChartConfig {
        canvas_size: (340, panel_height),
        title: format!("Top {} Qualifying", config.qualifying_rows),
        x_label: "Delta to Pole (s)".to_string(),
    };
    let top_ranking: Vec<RankedLap> = ranking
        .iter()
        .take(config.qualifying_rows)
        .cloned()
        .collect();
    panels.push(render_bar_chart(
        &delta_config,
        style,
        &delta_bar_rows(&top_ranking, style),
    )?);

    let track_map = TrackMapRenderer::with_config(crate::chart::TrackMapConfig {
        canvas_size: (panel_height, panel_height),
        ..Default::default()
    });
    panels.push(track_map.render(&trace, style)?);

    let title = format!(
        "{} {} Race & Qualifying Overview",
        race.info.event_name, race.info.year
    );
    let subtitle = format!(
        "Pole Lap: {} ({})",
        analysis::format_lap_time(pole.lap_time),
        pole.driver
    );
    Ok(compose(&panels, &title, &subtitle, style))
}

/// Stitch panels side by side under a two-line suptitle
fn compose(panels: &[Panel], title: &str, subtitle: &str, style: &ChartStyle) -> String {
    let total_width: u32 = panels.iter().map(|p| p.width).sum::<u32>()
        + PANEL_GAP * (panels.len().saturating_sub(1)) as u32;
    let total_height =
        TITLE_HEIGHT + panels.iter().map(|p| p.height).max().unwrap_or(0) + PANEL_GAP;

    let mut body = String::new();
    body.push_str(&svg::rect(
        0.0,
        0.0,
        total_width as f32,
        total_height as f32,
        &style.background,
        "none",
    ));
    body.push('\n');
    body.push_str(&svg::text(
        total_width as f32 / 2.0,
        22.0,
        title,
        &style.text_color,
        16.0,
        "middle",
    ));
    body.push('\n');
    body.push_str(&svg::text(
        total_width as f32 / 2.0,
        42.0,
        subtitle,
        &style.text_color,
        12.0,
        "middle",
    ));
    body.push('\n');

    let mut offset_x = 0u32;
    for panel in panels {
        body.push_str(&format!(
            "  <g transform=\"translate({}, {})\">\n{}\n  </g>\n",
            offset_x, TITLE_HEIGHT, panel.body
        ));
        offset_x += panel.width + PANEL_GAP;
    }

    Panel {
        width: total_width,
        height: total_height,
        body,
    }
    .into_document()
}
