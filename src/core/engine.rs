use crate::config::AnnotatorConfig;
use crate::core::corpus::Corpus;
use crate::core::glyph::Glyph;
use crate::core::memo::{
    ContextsKey, Generation, GraphemesKey, NGramsKey, PartsKey, ViewCache, WordsKey,
};
use crate::core::ngram::NGram;
use crate::core::state::{Action, SelectionState};
use crate::core::types::{Context, Grapheme, Word};
use crate::core::views::{self, Views};
use crate::entry::EntrySession;
use crate::persistence::{load_from_disk, save_to_disk, PersistenceError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// The engine owns the selection state and the current corpus snapshot.
// Selectors are memoized here; `views::*` stays callable without an engine.
pub struct AnnotatorEngine {
    pub state: SelectionState,
    pub entry: EntrySession,
    corpus: Arc<Corpus>,
    generation: Generation,
    cache: ViewCache,
    snapshot_path: Option<PathBuf>,
}

impl AnnotatorEngine {
    pub fn new() -> Self {
        Self::with_state(SelectionState::default())
    }

    pub fn with_state(state: SelectionState) -> Self {
        Self {
            state,
            entry: EntrySession::new(),
            corpus: Arc::new(Corpus::default()),
            generation: 0,
            cache: ViewCache::default(),
            snapshot_path: None,
        }
    }

    pub fn from_config(config: &AnnotatorConfig) -> Self {
        let mut engine = match &config.snapshot_path {
            Some(path) => Self::from_snapshot_or_new(path, config.defaults.clone()),
            None => Self::with_state(config.defaults.clone()),
        };
        engine.state = engine.state.clone().normalized();
        engine
    }

    /// Restores the last local snapshot, or starts from `defaults` when there
    /// is none. Later saves go back to the same path.
    pub fn from_snapshot_or_new<P: AsRef<Path>>(path: P, defaults: SelectionState) -> Self {
        let path = path.as_ref();
        let mut engine = match load_from_disk(path) {
            Ok(engine) => {
                log::info!("restored selection snapshot from {}", path.display());
                engine
            }
            Err(PersistenceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::with_state(defaults)
            }
            Err(e) => {
                log::warn!("ignoring unreadable snapshot {}: {}", path.display(), e);
                Self::with_state(defaults)
            }
        };
        engine.snapshot_path = Some(path.to_path_buf());
        engine
    }

    pub fn dispatch(&mut self, action: Action) {
        self.state.reduce(action);
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    /// Swaps in a new snapshot. Cached views for the old one become stale.
    pub fn set_corpus(&mut self, corpus: Arc<Corpus>) {
        if Arc::ptr_eq(&self.corpus, &corpus) {
            return;
        }
        self.corpus = corpus;
        self.generation += 1;
        self.cache.clear();
        log::debug!(
            "corpus generation {}: {} graphemes, {} words, {} contexts",
            self.generation,
            self.corpus.graphemes.len(),
            self.corpus.words.len(),
            self.corpus.contexts.len()
        );
    }

    pub fn vowel_glyphs(&mut self) -> &[Glyph] {
        let (state, corpus) = (&self.state, &self.corpus);
        self.cache
            .vowel_glyphs
            .get_or_compute(PartsKey::of(state, self.generation), || {
                views::visible_vowel_glyphs(state, corpus)
            })
    }

    pub fn consonant_glyphs(&mut self) -> &[Glyph] {
        let (state, corpus) = (&self.state, &self.corpus);
        self.cache
            .consonant_glyphs
            .get_or_compute(PartsKey::of(state, self.generation), || {
                views::visible_consonant_glyphs(state, corpus)
            })
    }

    pub fn graphemes(&mut self) -> &[Grapheme] {
        let (state, corpus) = (&self.state, &self.corpus);
        self.cache
            .graphemes
            .get_or_compute(GraphemesKey::of(state, self.generation), || {
                views::visible_graphemes(state, corpus)
            })
    }

    pub fn ngrams(&mut self) -> &[NGram] {
        let (state, corpus) = (&self.state, &self.corpus);
        self.cache
            .ngrams
            .get_or_compute(NGramsKey::of(state, self.generation), || {
                views::visible_ngrams(state, corpus)
            })
    }

    pub fn words(&mut self) -> &[Word] {
        let (state, corpus) = (&self.state, &self.corpus);
        self.cache
            .words
            .get_or_compute(WordsKey::of(state, self.generation), || {
                views::visible_words(state, corpus)
            })
    }

    pub fn contexts(&mut self) -> &[Context] {
        let (state, corpus) = (&self.state, &self.corpus);
        self.cache
            .contexts
            .get_or_compute(ContextsKey::of(state, self.generation), || {
                views::visible_contexts(state, corpus)
            })
    }

    /// All columns at once, served from the cache where inputs are unchanged.
    pub fn views(&mut self) -> Views {
        Views {
            vowel_glyphs: self.vowel_glyphs().to_vec(),
            consonant_glyphs: self.consonant_glyphs().to_vec(),
            graphemes: self.graphemes().to_vec(),
            ngrams: self.ngrams().to_vec(),
            words: self.words().to_vec(),
            contexts: self.contexts().to_vec(),
        }
    }

    pub fn cache(&self) -> &ViewCache {
        &self.cache
    }

    pub fn save_snapshot(&self) -> Result<(), PersistenceError> {
        if let Some(path) = &self.snapshot_path {
            save_to_disk(self, path)
        } else {
            Ok(()) // Nowhere to save to
        }
    }
}

impl Default for AnnotatorEngine {
    fn default() -> Self {
        Self::new()
    }
}
