// Session data model
// Holds the results table, laps table, and per-lap telemetry for one loaded
// race or qualifying session. All entities are provider-supplied and read-only.

pub mod loader;
pub mod store;

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::PitwallError;

pub use loader::load_session_archive;
pub use store::{FileSessionStore, SessionStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    Race,
    Qualifying,
}

impl SessionType {
    /// Short code used in archive file names, matching the data service
    /// session identifiers ("R", "Q")
    pub fn code(&self) -> &'static str {
        match self {
            Self::Race => "R",
            Self::Qualifying => "Q",
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Race => write!(f, "Race"),
            Self::Qualifying => write!(f, "Qualifying"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub year: u16,
    /// Human-readable event name (e.g. "Monaco Grand Prix")
    pub event_name: String,
    pub session_type: SessionType,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            year: 0,
            event_name: "Unknown".to_string(),
            session_type: SessionType::Race,
        }
    }
}

/// One row of the official classification for a session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RaceResult {
    /// Official finishing position; `None` for unclassified entries
    pub position: Option<u32>,
    /// Driver abbreviation (e.g. "VER")
    pub driver: String,
    pub team: String,
}

/// One driver's one lap, as supplied by the data service
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lap {
    pub driver: String,
    pub team: String,
    pub lap_number: u32,
    /// `None` when the service recorded no time for the lap
    pub lap_time: Option<Duration>,
    /// Position at the end of the lap; `None` on laps without position data
    pub position: Option<u32>,
    /// False for deleted/invalidated laps; the service's own classification
    pub is_valid: bool,
    /// True for representative-pace laps (excludes in/out/safety-car laps)
    pub is_quick: bool,
}

impl Lap {
    /// A lap usable for fastest-lap selection: valid and actually timed
    pub fn timed_valid(&self) -> Option<Duration> {
        if self.is_valid { self.lap_time } else { None }
    }
}

/// One position/speed sample of a telemetry trace
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub x: f32,
    pub y: f32,
    pub speed_kmh: f32,
}

/// A loaded session: results table, laps table, and per-lap telemetry lookup
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub info: SessionInfo,
    pub results: Vec<RaceResult>,
    pub laps: Vec<Lap>,
    telemetry: HashMap<(String, u32), Vec<TelemetrySample>>,
}

impl Session {
    pub fn new(info: SessionInfo) -> Self {
        Self {
            info,
            results: Vec::new(),
            laps: Vec::new(),
            telemetry: HashMap::new(),
        }
    }

    pub fn add_telemetry(&mut self, driver: &str, lap_number: u32, samples: Vec<TelemetrySample>) {
        self.telemetry
            .insert((driver.to_string(), lap_number), samples);
    }

    /// All laps for one driver, in lap number order
    pub fn driver_laps(&self, driver: &str) -> Vec<&Lap> {
        let mut laps: Vec<&Lap> = self.laps.iter().filter(|l| l.driver == driver).collect();
        laps.sort_by_key(|l| l.lap_number);
        laps
    }

    /// Timed representative-pace laps for one driver, in lap number order.
    /// Used for lap-time plotting only, never for fastest-lap selection.
    pub fn quick_laps(&self, driver: &str) -> Vec<&Lap> {
        self.driver_laps(driver)
            .into_iter()
            .filter(|l| l.is_quick && l.lap_time.is_some())
            .collect()
    }

    /// Telemetry samples for one lap. Fails recoverably when the service
    /// supplied no samples for that lap; callers degrade to a placeholder.
    pub fn lap_telemetry(
        &self,
        driver: &str,
        lap_number: u32,
    ) -> Result<&[TelemetrySample], PitwallError> {
        self.telemetry
            .get(&(driver.to_string(), lap_number))
            .filter(|samples| !samples.is_empty())
            .map(|samples| samples.as_slice())
            .ok_or(PitwallError::TelemetryUnavailable {
                driver: driver.to_string(),
                lap_number,
            })
    }

    /// All recorded telemetry, keyed by driver and lap number
    pub fn telemetry_entries(&self) -> impl Iterator<Item = (&str, u32, &[TelemetrySample])> {
        self.telemetry
            .iter()
            .map(|((driver, lap_number), samples)| (driver.as_str(), *lap_number, samples.as_slice()))
    }
}

/// One line of a session archive file (JSON Lines)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SessionRecord {
    Info(SessionInfo),
    Result(RaceResult),
    Lap(Lap),
    Telemetry {
        driver: String,
        lap_number: u32,
        samples: Vec<TelemetrySample>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lap(driver: &str, lap_number: u32, ms: u64) -> Lap {
        Lap {
            driver: driver.to_string(),
            team: "Test Team".to_string(),
            lap_number,
            lap_time: Some(Duration::from_millis(ms)),
            position: Some(1),
            is_valid: true,
            is_quick: true,
        }
    }

    #[test]
    fn test_driver_laps_sorted_by_lap_number() {
        let mut session = Session::new(SessionInfo::default());
        session.laps.push(lap("VER", 3, 92_000));
        session.laps.push(lap("VER", 1, 95_000));
        session.laps.push(lap("LEC", 1, 93_000));
        session.laps.push(lap("VER", 2, 91_000));

        let laps = session.driver_laps("VER");
        assert_eq!(laps.len(), 3);
        assert_eq!(
            laps.iter().map(|l| l.lap_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_quick_laps_filters_untimed_and_slow() {
        let mut session = Session::new(SessionInfo::default());
        session.laps.push(lap("VER", 1, 92_000));
        let mut in_lap = lap("VER", 2, 110_000);
        in_lap.is_quick = false;
        session.laps.push(in_lap);
        let mut untimed = lap("VER", 3, 0);
        untimed.lap_time = None;
        session.laps.push(untimed);

        let quick = session.quick_laps("VER");
        assert_eq!(quick.len(), 1);
        assert_eq!(quick[0].lap_number, 1);
    }

    #[test]
    fn test_timed_valid_excludes_deleted_laps() {
        let mut deleted = lap("VER", 1, 92_000);
        deleted.is_valid = false;
        assert!(deleted.timed_valid().is_none());
        assert!(lap("VER", 1, 92_000).timed_valid().is_some());
    }

    #[test]
    fn test_lap_telemetry_missing_is_recoverable() {
        let session = Session::new(SessionInfo::default());
        let result = session.lap_telemetry("VER", 1);
        assert!(matches!(
            result,
            Err(PitwallError::TelemetryUnavailable { .. })
        ));
    }

    #[test]
    fn test_lap_telemetry_empty_samples_treated_as_missing() {
        let mut session = Session::new(SessionInfo::default());
        session.add_telemetry("VER", 1, Vec::new());
        assert!(session.lap_telemetry("VER", 1).is_err());
    }
}
