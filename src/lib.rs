// Library interface for pitwall
// This allows integration tests to access internal modules

pub mod analysis;
pub mod chart;
pub mod errors;
pub mod session;

// Re-export commonly used types
pub use analysis::{RankedLap, TelemetryTrace};
pub use chart::{ChartStyle, OverviewConfig, TrackMapConfig, TrackMapRenderer};
pub use errors::PitwallError;
pub use session::{
    FileSessionStore, Lap, RaceResult, Session, SessionInfo, SessionStore, SessionType,
    TelemetrySample,
};
