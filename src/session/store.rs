// File-based storage for archived sessions
// Each session is one JSON Lines file keyed by (year, event name, session type)

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use itertools::Itertools;
use log::debug;

use crate::errors::PitwallError;
use crate::session::{Session, SessionRecord, SessionType, load_session_archive};

/// Trait defining the interface for session archive storage operations
pub trait SessionStore {
    /// Save a loaded session to persistent storage
    fn save(&mut self, session: &Session) -> Result<(), PitwallError>;

    /// Load a session by year, event name, and session type. Every call
    /// reads fresh from storage: there is no cross-request cache, so
    /// concurrent callers never share session objects.
    fn load(
        &self,
        year: u16,
        event_name: &str,
        session_type: SessionType,
    ) -> Result<Session, PitwallError>;

    /// List the archive file stems available in storage
    fn list_available(&self) -> Result<Vec<String>, PitwallError>;

    /// Check whether an archive exists for the given session
    fn exists(&self, year: u16, event_name: &str, session_type: SessionType) -> bool;

    /// Delete an archived session
    fn delete(
        &mut self,
        year: u16,
        event_name: &str,
        session_type: SessionType,
    ) -> Result<(), PitwallError>;
}

/// File-based implementation of session archive storage
pub struct FileSessionStore {
    /// Base directory for session archive files
    storage_path: PathBuf,
}

const ARCHIVE_EXTENSION: &str = "jsonl";

impl FileSessionStore {
    pub fn new(storage_path: PathBuf) -> Result<Self, PitwallError> {
        if !storage_path.exists() {
            fs::create_dir_all(&storage_path)
                .map_err(|e| PitwallError::StoreIOError { source: e })?;
        }
        Ok(Self { storage_path })
    }

    /// Create a store in the default application data directory
    pub fn new_default() -> Result<Self, PitwallError> {
        Self::new(Self::default_storage_path()?)
    }

    pub fn default_storage_path() -> Result<PathBuf, PitwallError> {
        let app_data_dir = dirs::data_dir().ok_or(PitwallError::NoDataDir)?;
        Ok(app_data_dir.join("pitwall").join("sessions"))
    }

    fn archive_path(&self, year: u16, event_name: &str, session_type: SessionType) -> PathBuf {
        let filename = format!(
            "{}_{}_{}.{}",
            year,
            Self::normalize_event_name(event_name),
            session_type.code(),
            ARCHIVE_EXTENSION
        );
        self.storage_path.join(filename)
    }

    /// Normalize event name for consistent file naming
    fn normalize_event_name(event_name: &str) -> String {
        event_name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    }

    fn session_records(session: &Session) -> Vec<SessionRecord> {
        let mut records = vec![SessionRecord::Info(session.info.clone())];
        records.extend(session.results.iter().cloned().map(SessionRecord::Result));
        records.extend(session.laps.iter().cloned().map(SessionRecord::Lap));
        // Stable order keeps archive files byte-comparable across saves
        let telemetry = session
            .telemetry_entries()
            .sorted_by_key(|(driver, lap_number, _)| (driver.to_string(), *lap_number));
        for (driver, lap_number, samples) in telemetry {
            records.push(SessionRecord::Telemetry {
                driver: driver.to_string(),
                lap_number,
                samples: samples.to_vec(),
            });
        }
        records
    }
}

impl SessionStore for FileSessionStore {
    fn save(&mut self, session: &Session) -> Result<(), PitwallError> {
        let path = self.archive_path(
            session.info.year,
            &session.info.event_name,
            session.info.session_type,
        );
        debug!("Saving session archive to {:?}", path);

        let file = File::create(&path).map_err(|e| PitwallError::StoreIOError { source: e })?;
        let mut writer = BufWriter::new(file);
        for record in Self::session_records(session) {
            let line = serde_json::to_string(&record)
                .map_err(|e| PitwallError::SessionSerializeError { source: e })?;
            writeln!(writer, "{}", line).map_err(|e| PitwallError::StoreIOError { source: e })?;
        }
        writer
            .flush()
            .map_err(|e| PitwallError::StoreIOError { source: e })
    }

    fn load(
        &self,
        year: u16,
        event_name: &str,
        session_type: SessionType,
    ) -> Result<Session, PitwallError> {
        let path = self.archive_path(year, event_name, session_type);
        if !path.exists() {
            return Err(PitwallError::SessionNotFound {
                year,
                event_name: event_name.to_string(),
                session_type: session_type.to_string(),
            });
        }
        load_session_archive(&path)
    }

    fn list_available(&self) -> Result<Vec<String>, PitwallError> {
        let entries =
            fs::read_dir(&self.storage_path).map_err(|e| PitwallError::StoreIOError { source: e })?;

        let mut stems = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PitwallError::StoreIOError { source: e })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(ARCHIVE_EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    stems.push(stem.to_string());
                }
            }
        }
        stems.sort();
        Ok(stems)
    }

    fn exists(&self, year: u16, event_name: &str, session_type: SessionType) -> bool {
        self.archive_path(year, event_name, session_type).exists()
    }

    fn delete(
        &mut self,
        year: u16,
        event_name: &str,
        session_type: SessionType,
    ) -> Result<(), PitwallError> {
        let path = self.archive_path(year, event_name, session_type);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| PitwallError::StoreIOError { source: e })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::session::{Lap, RaceResult, SessionInfo, TelemetrySample};

    fn sample_session() -> Session {
        let mut session = Session::new(SessionInfo {
            year: 2024,
            event_name: "Monaco Grand Prix".to_string(),
            session_type: SessionType::Qualifying,
        });
        session.results.push(RaceResult {
            position: Some(1),
            driver: "LEC".to_string(),
            team: "Ferrari".to_string(),
        });
        session.laps.push(Lap {
            driver: "LEC".to_string(),
            team: "Ferrari".to_string(),
            lap_number: 1,
            lap_time: Some(Duration::from_millis(70_270)),
            position: Some(1),
            is_valid: true,
            is_quick: true,
        });
        session.add_telemetry(
            "LEC",
            1,
            vec![TelemetrySample {
                x: 10.0,
                y: -4.0,
                speed_kmh: 280.0,
            }],
        );
        session
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();

        store.save(&sample_session()).unwrap();
        let loaded = store
            .load(2024, "Monaco Grand Prix", SessionType::Qualifying)
            .unwrap();

        assert_eq!(loaded.info.event_name, "Monaco Grand Prix");
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.laps.len(), 1);
        assert_eq!(loaded.lap_telemetry("LEC", 1).unwrap().len(), 1);
    }

    #[test]
    fn test_load_missing_session_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();

        let result = store.load(1998, "Unknown Event", SessionType::Race);
        assert!(matches!(result, Err(PitwallError::SessionNotFound { .. })));
    }

    #[test]
    fn test_exists_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();

        store.save(&sample_session()).unwrap();
        assert!(store.exists(2024, "Monaco Grand Prix", SessionType::Qualifying));

        store
            .delete(2024, "Monaco Grand Prix", SessionType::Qualifying)
            .unwrap();
        assert!(!store.exists(2024, "Monaco Grand Prix", SessionType::Qualifying));
    }

    #[test]
    fn test_list_available_returns_sorted_stems() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();

        let mut qualy = sample_session();
        store.save(&qualy).unwrap();
        qualy.info.session_type = SessionType::Race;
        store.save(&qualy).unwrap();

        let stems = store.list_available().unwrap();
        assert_eq!(
            stems,
            vec![
                "2024_monaco_grand_prix_Q".to_string(),
                "2024_monaco_grand_prix_R".to_string()
            ]
        );
    }

    #[test]
    fn test_event_name_normalization() {
        assert_eq!(
            FileSessionStore::normalize_event_name("São Paulo Grand Prix"),
            "são_paulo_grand_prix"
        );
        assert_eq!(
            FileSessionStore::normalize_event_name("Monaco Grand Prix"),
            "monaco_grand_prix"
        );
    }
}
