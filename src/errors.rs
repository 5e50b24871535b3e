// Error types for pitwall

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum PitwallError {
    // Errors for session archive loading
    #[snafu(display("Invalid session archive: {path}"))]
    InvalidSessionArchive { path: String },
    #[snafu(display("Error reading session archive"))]
    SessionLoaderError { source: io::Error },
    #[snafu(display("Session archive has no session info record: {path}"))]
    MissingSessionInfo { path: String },

    // Errors for the session store
    #[snafu(display("Could not find application data directory for the session store"))]
    NoDataDir,
    #[snafu(display("Session store I/O error"))]
    StoreIOError { source: io::Error },
    #[snafu(display("Error serializing session record"))]
    SessionSerializeError { source: serde_json::Error },
    #[snafu(display("No archived {session_type} session for {year} {event_name}"))]
    SessionNotFound {
        year: u16,
        event_name: String,
        session_type: String,
    },

    // Analytics errors
    #[snafu(display("No qualifying laps found"))]
    EmptyQualifyingResult,
    #[snafu(display("No telemetry recorded for {driver} lap {lap_number}"))]
    TelemetryUnavailable { driver: String, lap_number: u32 },

    // Chart rendering errors
    #[snafu(display("SVG generation failed: {reason}"))]
    SvgGenerationError { reason: String },
    #[snafu(display("Error writing chart file"))]
    ChartWriteError { source: io::Error },

    // Generic wrapper surfaced to the presentation layer for provider and
    // store failures this crate does not classify further
    #[snafu(display("analytics unavailable: {reason}"))]
    AnalyticsUnavailable { reason: String },
}
