use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use notewise_domain::{decode_json, encode_json};

use crate::session::SessionRecord;

/// Where finished sessions go, and where the analytics read them back from.
pub trait SessionStore {
    fn save(&mut self, record: &SessionRecord) -> Result<()>;
    fn load_all(&self) -> Result<Vec<SessionRecord>>;
}

/// Keeps records in memory; useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<SessionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn save(&mut self, record: &SessionRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<SessionRecord>> {
        Ok(self.records.clone())
    }
}

/// One pretty-printed JSON file per session, named after the session id.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data dir>/notewise/sessions`.
    pub fn default_location() -> Result<Self> {
        let base = dirs::data_dir().ok_or_else(|| anyhow!("no data directory available"))?;
        Ok(Self::new(base.join("notewise").join("sessions")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, record: &SessionRecord) -> PathBuf {
        self.dir.join(format!("{}.json", record.id))
    }
}

impl SessionStore for JsonFileStore {
    fn save(&mut self, record: &SessionRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create session directory {:?}", self.dir))?;
        let path = self.path_for(record);
        let bytes = encode_json(record)?;
        fs::write(&path, bytes).with_context(|| format!("write session {:?}", path))?;
        info!(id = %record.id, path = ?path, "session saved");
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<SessionRecord>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)
            .with_context(|| format!("read session directory {:?}", self.dir))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = fs::read(&path).with_context(|| format!("read session {:?}", path))?;
            match decode_json::<SessionRecord>(&bytes) {
                Ok(record) => records.push(record),
                Err(err) => warn!(path = ?path, %err, "skipping unreadable session file"),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PracticeSession;
    use notewise_domain::{Clef, NoteTarget};

    fn finished_session(midi: u8) -> SessionRecord {
        let target = NoteTarget::natural(midi, Clef::Bass).unwrap();
        let mut session = PracticeSession::from_targets(vec![target]).unwrap();
        session.record_played_note(midi);
        session.to_record()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "notewise-store-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        let record = finished_session(48);
        store.save(&record).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![record]);
    }

    #[test]
    fn missing_directory_loads_nothing() {
        let store = JsonFileStore::new(scratch_dir("missing"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn json_store_persists_and_skips_garbage() {
        let dir = scratch_dir("persist");
        let mut store = JsonFileStore::new(&dir);
        let record = finished_session(43);
        store.save(&record).unwrap();
        fs::write(dir.join("broken.json"), b"{").unwrap();
        fs::write(dir.join("notes.txt"), b"ignored").unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, record.id);
        assert_eq!(loaded[0].attempts, record.attempts);
        let _ = fs::remove_dir_all(&dir);
    }
}
