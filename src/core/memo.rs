// File: src/core/memo.rs
use crate::core::direction::{Direction, Directions, EntityClass};
use crate::core::filter::GlyphFilter;
use crate::core::glyph::Glyph;
use crate::core::ngram::NGram;
use crate::core::state::{Mode, SelectionState};
use crate::core::types::{Context, ContextId, Grapheme, Word, WordId};

/// A single-slot cache: holds the last key and the value computed for it.
#[derive(Debug)]
pub struct MemoCell<K, V> {
    slot: Option<(K, V)>,
    hits: u64,
    misses: u64,
}

impl<K, V> Default for MemoCell<K, V> {
    fn default() -> Self {
        Self { slot: None, hits: 0, misses: 0 }
    }
}

impl<K: PartialEq, V> MemoCell<K, V> {
    /// Returns the cached value when `key` equals the last key, otherwise
    /// recomputes and replaces the slot.
    pub fn get_or_compute<F: FnOnce() -> V>(&mut self, key: K, compute: F) -> &V {
        let fresh = matches!(&self.slot, Some((last, _)) if *last == key);
        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.slot = None;
            log::debug!("memo miss #{}, recomputing", self.misses);
        }
        let (_, value) = self.slot.get_or_insert_with(|| (key, compute()));
        value
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

/// Identifies a corpus snapshot. Bumped whenever the engine receives a new one.
pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartsKey {
    pub generation: Generation,
    pub grapheme_direction: Direction,
    pub partial: bool,
    pub mode: Mode,
    pub selected_grapheme: Option<Glyph>,
    pub selected_ngram: Option<Vec<Glyph>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphemesKey {
    pub generation: Generation,
    pub filter: GlyphFilter,
    pub directions: Directions,
    pub selected_word: Option<WordId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NGramsKey {
    pub generation: Generation,
    pub filter: GlyphFilter,
    pub directions: Directions,
    pub n: usize,
    pub selected_word: Option<WordId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordsKey {
    pub generation: Generation,
    pub directions: Directions,
    pub mode: Mode,
    pub selected_grapheme: Option<Glyph>,
    pub selected_ngram: Option<Vec<Glyph>>,
    pub selected_context: Option<ContextId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextsKey {
    pub generation: Generation,
    pub directions: Directions,
    pub selected_word: Option<WordId>,
}

impl PartsKey {
    pub fn of(state: &SelectionState, generation: Generation) -> Self {
        Self {
            generation,
            grapheme_direction: state.direction(EntityClass::Grapheme),
            partial: state.filter.partial,
            mode: state.mode,
            selected_grapheme: state.selected_grapheme,
            selected_ngram: state.selected_ngram.clone(),
        }
    }
}

impl GraphemesKey {
    pub fn of(state: &SelectionState, generation: Generation) -> Self {
        Self {
            generation,
            filter: state.filter,
            directions: state.directions,
            selected_word: state.selected_word,
        }
    }
}

impl NGramsKey {
    pub fn of(state: &SelectionState, generation: Generation) -> Self {
        Self {
            generation,
            filter: state.filter,
            directions: state.directions,
            n: state.n,
            selected_word: state.selected_word,
        }
    }
}

impl WordsKey {
    pub fn of(state: &SelectionState, generation: Generation) -> Self {
        Self {
            generation,
            directions: state.directions,
            mode: state.mode,
            selected_grapheme: state.selected_grapheme,
            selected_ngram: state.selected_ngram.clone(),
            selected_context: state.selected_context,
        }
    }
}

impl ContextsKey {
    pub fn of(state: &SelectionState, generation: Generation) -> Self {
        Self { generation, directions: state.directions, selected_word: state.selected_word }
    }
}

/// One memo cell per selector, each keyed on exactly the inputs it reads.
#[derive(Debug, Default)]
pub struct ViewCache {
    pub vowel_glyphs: MemoCell<PartsKey, Vec<Glyph>>,
    pub consonant_glyphs: MemoCell<PartsKey, Vec<Glyph>>,
    pub graphemes: MemoCell<GraphemesKey, Vec<Grapheme>>,
    pub ngrams: MemoCell<NGramsKey, Vec<NGram>>,
    pub words: MemoCell<WordsKey, Vec<Word>>,
    pub contexts: MemoCell<ContextsKey, Vec<Context>>,
}

impl ViewCache {
    pub fn clear(&mut self) {
        self.vowel_glyphs.clear();
        self.consonant_glyphs.clear();
        self.graphemes.clear();
        self.ngrams.clear();
        self.words.clear();
        self.contexts.clear();
    }

    pub fn total_hits(&self) -> u64 {
        self.vowel_glyphs.hits()
            + self.consonant_glyphs.hits()
            + self.graphemes.hits()
            + self.ngrams.hits()
            + self.words.hits()
            + self.contexts.hits()
    }
}
