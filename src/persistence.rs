// File: src/persistence.rs
use crate::core::corpus::Corpus;
use crate::core::engine::AnnotatorEngine;
use crate::core::state::SelectionState;
use crate::entry::EntrySession;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not replace {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The locally saved part of a session: filters, selections and the text
/// being typed. The corpus itself lives in the store.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
struct SerializableState {
    selection: SelectionState,
    entry: EntrySession,
}

/// Writes through a temp file in the same directory and renames it into place.
fn write_atomically<F>(path: &Path, write: F) -> Result<(), PersistenceError>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<(), PersistenceError>,
{
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let parent_dir = if parent_dir.as_os_str().is_empty() { Path::new(".") } else { parent_dir };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| PersistenceError::Persist {
        path: path.display().to_string(),
        source: e.error,
    })?;
    Ok(())
}

pub fn save_to_disk(engine: &AnnotatorEngine, path: &Path) -> Result<(), PersistenceError> {
    let state = SerializableState {
        selection: engine.state.clone(),
        entry: engine.entry.clone(),
    };
    write_atomically(path, |writer| {
        bincode::serialize_into(writer, &state)?;
        Ok(())
    })?;
    log::debug!("saved selection snapshot to {}", path.display());
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<AnnotatorEngine, PersistenceError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let state: SerializableState = bincode::deserialize_from(reader)?;

    let mut engine = AnnotatorEngine::with_state(state.selection.normalized());
    engine.entry = state.entry;

    Ok(engine)
}

/// Reads a corpus exported as JSON.
pub fn load_corpus_json(path: &Path) -> Result<Corpus, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    let corpus: Corpus = serde_json::from_reader(reader)?;
    log::info!(
        "loaded corpus from {}: {} graphemes, {} words, {} contexts",
        path.display(),
        corpus.graphemes.len(),
        corpus.words.len(),
        corpus.contexts.len()
    );
    Ok(corpus)
}

pub fn save_corpus_json(corpus: &Corpus, path: &Path) -> Result<(), PersistenceError> {
    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(writer, corpus)?;
        Ok(())
    })
}
