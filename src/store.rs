use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context as _, Result};
use log::debug;
use serde::{Serialize, de::DeserializeOwned};

use crate::traits::SnapshotStore;

/// Keeps one collection as a pretty-printed JSON array in a single file.
///
/// `save` truncates and rewrites the file in place. There is no temporary file
/// and no checksum, so a failure halfway through a write can leave a snapshot
/// that the next `load` rejects. Two processes sharing a file overwrite each
/// other's changes.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load<R: Serialize + DeserializeOwned>(&self, default: Vec<R>) -> Result<Vec<R>> {
        if !self.path.exists() {
            debug!("event=store_create path={}", self.path.display());
            self.save(&default)?;
            return Ok(default);
        }

        let file = File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        let records: Vec<R> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to read snapshot {}", self.path.display()))?;
        debug!(
            "event=store_load path={} records={}",
            self.path.display(),
            records.len()
        );
        Ok(records)
    }

    fn save<R: Serialize>(&self, records: &[R]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.path)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        debug!(
            "event=store_save path={} records={}",
            self.path.display(),
            records.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contact, ContactDraft, Task, TaskDraft};
    use crate::traits::Record;

    fn contacts() -> Vec<Contact> {
        vec![
            Contact::create(
                1,
                ContactDraft {
                    name: "Анна".to_string(),
                    phone: "+7 900 000-00-00".to_string(),
                    email: "anna@example.com".to_string(),
                },
            ),
            Contact::create(
                4,
                ContactDraft {
                    name: "Boris".to_string(),
                    phone: String::new(),
                    email: String::new(),
                },
            ),
        ]
    }

    #[test]
    fn test_load_creates_missing_store_with_default() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("contacts.json");
        let store = JsonFileStore::new(&path);

        let loaded: Vec<Contact> = store.load(Vec::new())?;
        assert!(loaded.is_empty());
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path)?.trim(), "[]");
        Ok(())
    }

    #[test]
    fn test_save_then_load_round_trips() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonFileStore::new(dir.path().join("contacts.json"));
        let records = contacts();

        store.save(&records)?;
        let loaded: Vec<Contact> = store.load(Vec::new())?;
        assert_eq!(loaded, records);
        Ok(())
    }

    #[test]
    fn test_snapshot_uses_stable_field_names() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tasks.json");
        let store = JsonFileStore::new(&path);
        let task = Task::create(
            2,
            TaskDraft {
                description: "buy milk".to_string(),
                deadline: "05-01-2024".to_string(),
            },
        );
        store.save(&[task])?;

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(raw[0]["id"], 2);
        assert_eq!(raw[0]["description"], "buy milk");
        assert_eq!(raw[0]["deadline"], "05-01-2024");
        assert_eq!(raw[0]["status"], "Не выполнено");
        Ok(())
    }

    #[test]
    fn test_load_rejects_corrupt_snapshot() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("contacts.json");
        fs::write(&path, "[{\"id\": 1, \"name\": ")?;

        let store = JsonFileStore::new(path);
        assert!(store.load::<Contact>(Vec::new()).is_err());
        Ok(())
    }
}
