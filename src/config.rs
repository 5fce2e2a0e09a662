use std::path::PathBuf;

use getset::Getters;

use crate::models::RecordKind;

const DEFAULT_NOTES_FILE: &str = "notes.json";
const DEFAULT_TASKS_FILE: &str = "tasks.json";
const DEFAULT_CONTACTS_FILE: &str = "contacts.json";
const DEFAULT_FINANCE_FILE: &str = "finance.json";
const DEFAULT_NOTES_EXPORT_FILE: &str = "notes_export.csv";

/// Where each collection lives and where exported tables go.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Config {
    #[getset(get = "pub")]
    data_dir: PathBuf,
    #[getset(get = "pub")]
    output_dir: PathBuf,
}

impl Config {
    /// # Arguments
    /// * `data_dir` - Directory holding the four snapshots.
    /// * `output_dir` - Directory for exports and reports; the data directory
    ///   when absent.
    pub fn new(data_dir: impl Into<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let output_dir = output_dir.unwrap_or_else(|| data_dir.clone());
        Config {
            data_dir,
            output_dir,
        }
    }

    pub fn store_path(&self, kind: RecordKind) -> PathBuf {
        let file = match kind {
            RecordKind::Note => DEFAULT_NOTES_FILE,
            RecordKind::Task => DEFAULT_TASKS_FILE,
            RecordKind::Contact => DEFAULT_CONTACTS_FILE,
            RecordKind::Finance => DEFAULT_FINANCE_FILE,
        };
        self.data_dir.join(file)
    }

    pub fn notes_export_path(&self) -> PathBuf {
        self.output_dir.join(DEFAULT_NOTES_EXPORT_FILE)
    }
}
