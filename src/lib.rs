// src/lib.rs

pub mod config;
pub mod core;
pub mod entry;
pub mod error;
pub mod persistence;
pub mod store;

pub use crate::config::AnnotatorConfig;
pub use crate::core::corpus::Corpus;
pub use crate::core::direction::{Direction, EntityClass};
pub use crate::core::engine::AnnotatorEngine;
pub use crate::core::glyph::Glyph;
pub use crate::core::state::{Action, Mode, SelectionState};
pub use crate::core::views::Views;
pub use crate::error::{AnnotatorError, Result};
pub use crate::store::{CorpusStore, MemoryStore};
