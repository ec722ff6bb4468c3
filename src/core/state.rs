// File: src/core/state.rs
use crate::core::direction::{Direction, Directions, EntityClass};
use crate::core::filter::{GlyphFilter, ReverseFilter};
use crate::core::glyph::Glyph;
use crate::core::ngram::MIN_NGRAM;
use crate::core::types::{ContextId, WordId};
use serde::{Deserialize, Serialize};

/// Whether the middle column lists single graphemes or n-grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Graphemes,
    NGrams,
}

/// Everything the user has chosen in the filter columns.
///
/// Selections are independent of each other: choosing a value in one column
/// never clears another column's selection. Directions decide whether a
/// selection has any effect elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionState {
    pub filter: GlyphFilter,
    pub n: usize,
    pub mode: Mode,
    pub directions: Directions,
    pub selected_grapheme: Option<Glyph>,
    pub selected_ngram: Option<Vec<Glyph>>,
    pub selected_word: Option<WordId>,
    pub selected_context: Option<ContextId>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            filter: GlyphFilter::default(),
            n: MIN_NGRAM,
            mode: Mode::Graphemes,
            directions: Directions::default(),
            selected_grapheme: None,
            selected_ngram: None,
            selected_word: None,
            selected_context: None,
        }
    }
}

/// A single user interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    SetVowelFilter(Option<Glyph>),
    SetConsonantFilter(Option<Glyph>),
    /// Sets the vowel filter, or clears it when the same part is chosen again.
    ToggleVowelFilter(Glyph),
    ToggleConsonantFilter(Glyph),
    SetReverseFilter(ReverseFilter),
    TogglePartial,
    ToggleExclusive,
    SetN(usize),
    SetMode(Mode),
    SetDirection(EntityClass, Direction),
    SelectGrapheme(Option<Glyph>),
    SelectNGram(Option<Vec<Glyph>>),
    SelectWord(Option<WordId>),
    SelectContext(Option<ContextId>),
    ToggleGrapheme(Glyph),
    ToggleNGram(Vec<Glyph>),
    ToggleWord(WordId),
    ToggleContext(ContextId),
}

fn toggle<T: PartialEq>(current: &mut Option<T>, value: T) {
    if current.as_ref() == Some(&value) {
        *current = None;
    } else {
        *current = Some(value);
    }
}

impl SelectionState {
    /// Applies an action in place. Never fails: out-of-range requests are
    /// clamped or resolved by the direction rules.
    pub fn reduce(&mut self, action: Action) {
        log::debug!("reduce {:?}", action);
        match action {
            Action::SetVowelFilter(v) => self.filter.vowel = v,
            Action::SetConsonantFilter(c) => self.filter.consonant = c,
            Action::ToggleVowelFilter(v) => toggle(&mut self.filter.vowel, v),
            Action::ToggleConsonantFilter(c) => toggle(&mut self.filter.consonant, c),
            Action::SetReverseFilter(r) => self.filter.reverse = r,
            Action::TogglePartial => self.filter.partial = !self.filter.partial,
            Action::ToggleExclusive => self.filter.exclusive = !self.filter.exclusive,
            Action::SetN(n) => self.n = n.max(MIN_NGRAM),
            Action::SetMode(mode) => self.mode = mode,
            Action::SetDirection(class, direction) => {
                self.directions.set(class, direction);
            }
            Action::SelectGrapheme(g) => self.selected_grapheme = g,
            Action::SelectNGram(ng) => self.selected_ngram = ng,
            Action::SelectWord(w) => self.selected_word = w,
            Action::SelectContext(c) => self.selected_context = c,
            Action::ToggleGrapheme(g) => toggle(&mut self.selected_grapheme, g),
            Action::ToggleNGram(ng) => toggle(&mut self.selected_ngram, ng),
            Action::ToggleWord(w) => toggle(&mut self.selected_word, w),
            Action::ToggleContext(c) => toggle(&mut self.selected_context, c),
        }
    }

    /// State-in, state-out form of [`SelectionState::reduce`].
    pub fn apply(mut self, action: Action) -> SelectionState {
        self.reduce(action);
        self
    }

    pub fn direction(&self, class: EntityClass) -> Direction {
        self.directions.get(class)
    }

    /// Repairs fields that can only be out of range when the state was
    /// restored from outside the reducer.
    pub fn normalized(mut self) -> SelectionState {
        self.n = self.n.max(MIN_NGRAM);
        self.directions = self.directions.normalized();
        self
    }
}
