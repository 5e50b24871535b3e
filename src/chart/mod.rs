// Chart rendering module
// Renders the analytics tables as SVG documents: lap-time lines, position
// progression, total race time bars, delta-to-pole bars, and the speed map.
// Styling is an explicit ChartStyle passed to every renderer; there is no
// process-global style state.

pub mod bars;
pub mod lines;
pub mod overview;
pub(crate) mod svg;
pub mod track_map;

use std::collections::HashMap;

// Re-export commonly used types
pub use bars::{BarChartConfig, BarRow, bar_chart_height, render_bar_chart};
pub use lines::{LineChartConfig, LineSeries, render_line_chart};
pub use overview::{OverviewConfig, render_race_overview};
pub use svg::Panel;
pub use track_map::{TrackMapConfig, TrackMapRenderer};

/// Default team palette, keyed by team name as the data service reports it
const TEAM_PALETTE: &[(&str, &str)] = &[
    ("Red Bull Racing", "#3671c6"),
    ("Ferrari", "#e8002d"),
    ("Mercedes", "#27f4d2"),
    ("McLaren", "#ff8000"),
    ("Aston Martin", "#229971"),
    ("Alpine", "#0093cc"),
    ("Williams", "#64c4ff"),
    ("RB", "#6692ff"),
    ("Kick Sauber", "#52e252"),
    ("Haas F1 Team", "#b6babd"),
];

/// Fallback colors for teams the palette does not know
const FALLBACK_PALETTE: &[&str] = &[
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
];

/// Explicit styling for all chart renderers: driver/team color lookup plus
/// the shared canvas colors. Built per request so repeated analytics calls
/// stay independent.
#[derive(Clone, Debug)]
pub struct ChartStyle {
    pub background: String,
    pub text_color: String,
    pub grid_color: String,
    /// Outline color for bars
    pub edge_color: String,
    team_colors: HashMap<String, String>,
    driver_colors: HashMap<String, String>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: "#15151e".to_string(),
            text_color: "#f0f0f0".to_string(),
            grid_color: "#3a3a46".to_string(),
            edge_color: "#808080".to_string(),
            team_colors: TEAM_PALETTE
                .iter()
                .map(|(team, color)| (team.to_string(), color.to_string()))
                .collect(),
            driver_colors: HashMap::new(),
        }
    }
}

impl ChartStyle {
    /// Override the color for one team
    pub fn set_team_color(&mut self, team: &str, color: &str) {
        self.team_colors.insert(team.to_string(), color.to_string());
    }

    /// Override the color for one driver, taking precedence over the team color
    pub fn set_driver_color(&mut self, driver: &str, color: &str) {
        self.driver_colors
            .insert(driver.to_string(), color.to_string());
    }

    /// Color for a team, falling back to a deterministic palette pick so
    /// unknown teams still render consistently across charts
    pub fn team_color(&self, team: &str) -> String {
        if let Some(color) = self.team_colors.get(team) {
            return color.clone();
        }
        let index = team.bytes().map(usize::from).sum::<usize>() % FALLBACK_PALETTE.len();
        FALLBACK_PALETTE[index].to_string()
    }

    /// Color for a driver: explicit override first, then their team color
    pub fn driver_color(&self, driver: &str, team: &str) -> String {
        self.driver_colors
            .get(driver)
            .cloned()
            .unwrap_or_else(|| self.team_color(team))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_team_color() {
        let style = ChartStyle::default();
        assert_eq!(style.team_color("Ferrari"), "#e8002d");
    }

    #[test]
    fn test_unknown_team_color_is_deterministic() {
        let style = ChartStyle::default();
        let first = style.team_color("Brawn GP");
        let second = style.team_color("Brawn GP");
        assert_eq!(first, second);
        assert!(FALLBACK_PALETTE.contains(&first.as_str()));
    }

    #[test]
    fn test_driver_color_falls_back_to_team() {
        let mut style = ChartStyle::default();
        assert_eq!(style.driver_color("LEC", "Ferrari"), "#e8002d");
        style.set_driver_color("LEC", "#123456");
        assert_eq!(style.driver_color("LEC", "Ferrari"), "#123456");
    }
}
