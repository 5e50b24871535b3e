// Session archive loader
// Reads a JSON Lines session archive into a Session

use std::path::Path;

use crate::errors::PitwallError;
use crate::session::{Session, SessionRecord};

/// Load a session archive file. The first line must be the `Info` record;
/// `Result`, `Lap`, and `Telemetry` lines can appear in any order after it.
pub fn load_session_archive(source_file: &Path) -> Result<Session, PitwallError> {
    let records = serde_jsonlines::json_lines(source_file)
        .map_err(|e| PitwallError::SessionLoaderError { source: e })?
        .collect::<Result<Vec<SessionRecord>, std::io::Error>>()
        // json_lines reports lines that fail to parse as InvalidData
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => PitwallError::InvalidSessionArchive {
                path: format!("{:?}", source_file),
            },
            _ => PitwallError::SessionLoaderError { source: e },
        })?;

    let mut info = None;
    let mut session = Session::default();
    for record in records {
        match record {
            SessionRecord::Info(session_info) => {
                if info.is_none() {
                    info = Some(session_info);
                }
            }
            SessionRecord::Result(result) => session.results.push(result),
            SessionRecord::Lap(lap) => session.laps.push(lap),
            SessionRecord::Telemetry {
                driver,
                lap_number,
                samples,
            } => session.add_telemetry(&driver, lap_number, samples),
        }
    }

    match info {
        Some(session_info) => {
            session.info = session_info;
            Ok(session)
        }
        None => Err(PitwallError::MissingSessionInfo {
            path: format!("{:?}", source_file),
        }),
    }
}
