// Integration tests for the full analytics pipeline
//
// This test suite validates the complete workflow:
// 1. Build race and qualifying session archives and store them
// 2. Load them back through the session store
// 3. Run the analytics pass (finishers, ranking, race times, telemetry)
// 4. Render the overview figure and check the recoverable degradations

use std::time::Duration;

use pitwall::analysis::{
    fastest_lap_telemetry, fastest_laps_ranked, top_finishers, total_race_time,
};
use pitwall::chart::{ChartStyle, OverviewConfig, render_race_overview};
use pitwall::errors::PitwallError;
use pitwall::session::{
    FileSessionStore, Lap, RaceResult, Session, SessionInfo, SessionStore, SessionType,
    TelemetrySample,
};

const EVENT: &str = "Monaco Grand Prix";
const YEAR: u16 = 2024;

fn lap(driver: &str, team: &str, lap_number: u32, ms: u64, position: u32) -> Lap {
    Lap {
        driver: driver.to_string(),
        team: team.to_string(),
        lap_number,
        lap_time: Some(Duration::from_millis(ms)),
        position: Some(position),
        is_valid: true,
        is_quick: true,
    }
}

/// Three-driver race with telemetry on the fastest lap
fn build_race() -> Session {
    let mut race = Session::new(SessionInfo {
        year: YEAR,
        event_name: EVENT.to_string(),
        session_type: SessionType::Race,
    });
    let entries = [
        ("LEC", "Ferrari", 1u32),
        ("PIA", "McLaren", 2),
        ("SAI", "Ferrari", 3),
    ];
    for (driver, team, position) in entries {
        race.results.push(RaceResult {
            position: Some(position),
            driver: driver.to_string(),
            team: team.to_string(),
        });
        // lap 2 is each driver's fastest; lap 3 is the pit lap
        let offsets = [120u64, 40, 21_000, 160, 200];
        for (i, offset) in offsets.iter().enumerate() {
            let lap_number = i as u32 + 1;
            let base = 78_000 + position as u64 * 300;
            let mut l = lap(driver, team, lap_number, base + offset, position);
            if lap_number == 3 {
                l.is_quick = false;
            }
            race.laps.push(l);
        }
    }
    // LEC lap 2 is the fastest lap of the race
    race.add_telemetry(
        "LEC",
        2,
        vec![
            TelemetrySample {
                x: 0.0,
                y: 0.0,
                speed_kmh: 95.0,
            },
            TelemetrySample {
                x: 420.0,
                y: 160.0,
                speed_kmh: 285.0,
            },
            TelemetrySample {
                x: 180.0,
                y: 330.0,
                speed_kmh: 140.0,
            },
        ],
    );
    race
}

fn build_qualy() -> Session {
    let mut qualy = Session::new(SessionInfo {
        year: YEAR,
        event_name: EVENT.to_string(),
        session_type: SessionType::Qualifying,
    });
    qualy.laps.push(lap("LEC", "Ferrari", 14, 70_270, 1));
    qualy.laps.push(lap("PIA", "McLaren", 12, 70_424, 2));
    qualy.laps.push(lap("SAI", "Ferrari", 11, 70_518, 3));
    // A deleted lap that would otherwise be pole
    let mut deleted = lap("PIA", "McLaren", 13, 69_900, 2);
    deleted.is_valid = false;
    qualy.laps.push(deleted);
    qualy
}

#[test]
fn test_store_round_trip_and_full_analytics_pass() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();
    store.save(&build_race()).unwrap();
    store.save(&build_qualy()).unwrap();

    let race = store.load(YEAR, EVENT, SessionType::Race).unwrap();
    let qualy = store.load(YEAR, EVENT, SessionType::Qualifying).unwrap();

    let finishers = top_finishers(&race, 10);
    assert_eq!(finishers, vec!["LEC", "PIA", "SAI"]);

    let ranking = fastest_laps_ranked(&qualy).unwrap();
    assert_eq!(ranking[0].driver, "LEC");
    assert_eq!(ranking[0].delta, Duration::ZERO);
    // PIA's deleted 69.9s lap must not beat LEC's pole
    assert_eq!(ranking[1].driver, "PIA");
    assert_eq!(ranking[1].delta, Duration::from_millis(154));

    // Sum of all five timed laps, pit lap included:
    // 78_420 + 78_340 + 99_300 + 78_460 + 78_500
    let total = total_race_time(&race, "LEC");
    assert_eq!(total, Duration::from_millis(413_020));

    let trace = fastest_lap_telemetry(&race);
    assert!(trace.available);
    assert_eq!(trace.driver.as_deref(), Some("LEC"));
    assert_eq!(trace.lap_number, Some(2));
    assert_eq!(trace.samples.len(), 3);
}

#[test]
fn test_overview_document_renders_end_to_end() {
    let document = render_race_overview(
        &build_race(),
        &build_qualy(),
        &ChartStyle::default(),
        &OverviewConfig::default(),
    )
    .unwrap();

    assert!(document.starts_with("<svg"));
    assert!(document.ends_with("</svg>"));
    assert!(document.contains("Monaco Grand Prix 2024 Race &amp; Qualifying Overview"));
    assert!(document.contains("Pole Lap: 1:10.270 (LEC)"));
    assert!(document.contains("LEC Fastest Lap Speed Map"));
}

#[test]
fn test_overview_degrades_when_race_has_no_telemetry() {
    let mut race = Session::new(build_race().info.clone());
    let full = build_race();
    race.results = full.results.clone();
    race.laps = full.laps.clone();

    let document = render_race_overview(
        &race,
        &build_qualy(),
        &ChartStyle::default(),
        &OverviewConfig::default(),
    )
    .unwrap();
    assert!(document.contains("Telemetry Not Available"));
}

#[test]
fn test_empty_qualifying_is_recoverable_not_a_crash() {
    let empty_qualy = Session::new(SessionInfo {
        year: YEAR,
        event_name: EVENT.to_string(),
        session_type: SessionType::Qualifying,
    });
    let result = render_race_overview(
        &build_race(),
        &empty_qualy,
        &ChartStyle::default(),
        &OverviewConfig::default(),
    );
    assert!(matches!(result, Err(PitwallError::EmptyQualifyingResult)));
}
