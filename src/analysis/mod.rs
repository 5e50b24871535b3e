// Session analytics
// Derives the tables the charts are built from: top finishers, fastest
// qualifying laps ranked against pole, per-driver total race time, and the
// telemetry trace of the race's fastest lap. Stateless: every call builds its
// output fresh from the session passed in and performs no I/O of its own.

use std::time::Duration;

use itertools::Itertools;
use log::warn;

use crate::errors::PitwallError;
use crate::session::{Session, TelemetrySample};

/// One row of the ranked qualifying table: a driver's fastest valid lap with
/// its delta to the pole lap
#[derive(Clone, Debug, PartialEq)]
pub struct RankedLap {
    pub driver: String,
    pub team: String,
    pub lap_number: u32,
    pub lap_time: Duration,
    /// Lap time minus the pole lap time; zero for the pole row
    pub delta: Duration,
}

/// Position/speed trace of the race's single fastest lap. `available` is
/// false when the data service could not supply telemetry for that lap;
/// consumers render a placeholder instead of failing the whole pass.
#[derive(Clone, Debug, Default)]
pub struct TelemetryTrace {
    pub available: bool,
    pub driver: Option<String>,
    pub lap_number: Option<u32>,
    pub samples: Vec<TelemetrySample>,
}

/// Driver abbreviations of the first `n` classified finishers, in official
/// finishing order. Position is already a total order, so no tie-breaks.
pub fn top_finishers(race: &Session, n: usize) -> Vec<String> {
    race.results
        .iter()
        .filter_map(|r| r.position.map(|p| (p, r.driver.clone())))
        .sorted_by_key(|(position, _)| *position)
        .take(n)
        .map(|(_, driver)| driver)
        .collect()
}

/// Each driver's fastest valid qualifying lap, sorted ascending by lap time,
/// with the delta to pole appended. Drivers without a valid timed lap are
/// skipped; an entirely empty result is a recoverable error the caller
/// reports as "no qualifying laps found".
pub fn fastest_laps_ranked(qualy: &Session) -> Result<Vec<RankedLap>, PitwallError> {
    let drivers = qualy.laps.iter().map(|l| l.driver.as_str()).unique();

    let mut rows = Vec::new();
    for driver in drivers {
        let fastest = qualy
            .driver_laps(driver)
            .into_iter()
            .filter_map(|lap| lap.timed_valid().map(|time| (time, lap)))
            .min_by_key(|(time, _)| *time);
        if let Some((lap_time, lap)) = fastest {
            rows.push(RankedLap {
                driver: lap.driver.clone(),
                team: lap.team.clone(),
                lap_number: lap.lap_number,
                lap_time,
                delta: Duration::ZERO,
            });
        }
    }

    if rows.is_empty() {
        return Err(PitwallError::EmptyQualifyingResult);
    }

    rows.sort_by_key(|row| row.lap_time);
    let pole_time = rows[0].lap_time;
    for row in &mut rows {
        row.delta = row.lap_time - pole_time;
    }
    Ok(rows)
}

/// Sum of all of a driver's timed race laps, in/out and slow laps included.
/// Display-only aggregate: it can diverge from the official gaps and is never
/// used for ranking. A driver with zero laps sums to zero.
pub fn total_race_time(race: &Session, driver: &str) -> Duration {
    race.driver_laps(driver)
        .iter()
        .filter_map(|lap| lap.lap_time)
        .sum()
}

/// Telemetry trace of the single fastest valid lap across the whole race.
/// Never fails: when the lookup comes back empty (or no valid lap exists at
/// all) the trace is flagged unavailable and downstream shows a placeholder.
pub fn fastest_lap_telemetry(race: &Session) -> TelemetryTrace {
    let fastest = race
        .laps
        .iter()
        .filter_map(|lap| lap.timed_valid().map(|time| (time, lap)))
        .min_by_key(|(time, _)| *time);

    let Some((_, lap)) = fastest else {
        warn!("No valid timed lap in race session, skipping speed map");
        return TelemetryTrace::default();
    };

    match race.lap_telemetry(&lap.driver, lap.lap_number) {
        Ok(samples) => TelemetryTrace {
            available: true,
            driver: Some(lap.driver.clone()),
            lap_number: Some(lap.lap_number),
            samples: samples.to_vec(),
        },
        Err(e) => {
            warn!("Could not load telemetry: {}", e);
            TelemetryTrace::default()
        }
    }
}

/// Format a lap time as "m:ss.mmm"
pub fn format_lap_time(time: Duration) -> String {
    let total_ms = time.as_millis();
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    format!("{}:{:02}.{:03}", minutes, seconds, millis)
}
