// File: src/error.rs
use crate::core::glyph::ParseGlyphError;
use crate::persistence::PersistenceError;
use crate::store::CorpusError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnnotatorError>;

#[derive(Debug, Error)]
pub enum AnnotatorError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Glyph(#[from] ParseGlyphError),

    #[error("{0}")]
    Command(String),
}
