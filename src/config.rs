// File: src/config.rs
use crate::core::state::SelectionState;
use crate::persistence::PersistenceError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const DEFAULT_SNAPSHOT_PATH: &str = "annotator_session.bin";
const DEFAULT_CORPUS_PATH: &str = "corpus.json";

/// Startup settings. Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Selection state used when no snapshot exists yet.
    pub defaults: SelectionState,
    /// Where the local session snapshot is kept; `None` disables it.
    pub snapshot_path: Option<PathBuf>,
    /// Corpus JSON loaded at startup and written back on exit.
    pub corpus_path: Option<PathBuf>,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            defaults: SelectionState::default(),
            snapshot_path: Some(PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            corpus_path: Some(PathBuf::from(DEFAULT_CORPUS_PATH)),
        }
    }
}

impl AnnotatorConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, PersistenceError> {
        let reader = BufReader::new(File::open(path)?);
        let config: AnnotatorConfig = serde_json::from_reader(reader)?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, PersistenceError> {
        if path.exists() {
            Self::from_json_file(path)
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}
