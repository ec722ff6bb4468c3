// File: src/core/views.rs
//! Derived lists shown in each column.
//!
//! Every function here is a pure function of a [`SelectionState`] and a
//! [`Corpus`] snapshot. Ordering rules:
//!
//! - glyph parts: ascending numeric value
//! - graphemes and words: annotated entries first, alphabetically by sound or
//!   meaning, then unannotated entries in corpus order; words listed for a
//!   selected context keep their position in that context instead
//! - n-grams: descending occurrence count, ties in first-seen order
//! - contexts: newest (highest id) first

use crate::core::corpus::Corpus;
use crate::core::direction::{Direction, EntityClass};
use crate::core::filter::component_matches;
use crate::core::glyph::Glyph;
use crate::core::ngram::{self, word_contains_ngram, NGram, NGramCounter};
use crate::core::state::{Mode, SelectionState};
use crate::core::types::{is_annotated, Context, Grapheme, Word};
use std::cmp::Ordering;
use std::collections::HashSet;

/// All columns computed from one state and snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Views {
    pub vowel_glyphs: Vec<Glyph>,
    pub consonant_glyphs: Vec<Glyph>,
    pub graphemes: Vec<Grapheme>,
    pub ngrams: Vec<NGram>,
    pub words: Vec<Word>,
    pub contexts: Vec<Context>,
}

impl Views {
    pub fn compute(state: &SelectionState, corpus: &Corpus) -> Views {
        Views {
            vowel_glyphs: visible_vowel_glyphs(state, corpus),
            consonant_glyphs: visible_consonant_glyphs(state, corpus),
            graphemes: visible_graphemes(state, corpus),
            ngrams: visible_ngrams(state, corpus),
            words: visible_words(state, corpus),
            contexts: visible_contexts(state, corpus),
        }
    }
}

/// Annotated before unannotated, annotated ones alphabetically ignoring
/// case. Unannotated entries compare equal.
fn annotation_order(a: &str, b: &str) -> Ordering {
    match (is_annotated(a), is_annotated(b)) {
        (true, true) => {
            let (a, b) = (a.trim(), b.trim());
            a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// The selected word, if it still exists in the snapshot.
fn selected_word<'a>(state: &SelectionState, corpus: &'a Corpus) -> Option<&'a Word> {
    state.selected_word.and_then(|id| corpus.word(id))
}

fn visible_parts(
    state: &SelectionState,
    corpus: &Corpus,
    component: impl Fn(Glyph) -> Glyph,
) -> Vec<Glyph> {
    let mut parts: Vec<Glyph> = corpus
        .graphemes
        .iter()
        .map(|g| component(g.id))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    parts.sort();

    if state.direction(EntityClass::Grapheme) != Direction::Left {
        return parts;
    }
    let partial = state.filter.partial;
    let targets: Vec<Glyph> = match (state.mode, &state.selected_grapheme, &state.selected_ngram) {
        (Mode::Graphemes, Some(g), _) => vec![component(*g)],
        (Mode::NGrams, _, Some(ng)) => ng.iter().map(|&g| component(g)).collect(),
        _ => return parts,
    };
    parts.retain(|&part| targets.iter().any(|&t| component_matches(t, part, partial)));
    parts
}

/// Distinct vowel parts across all graphemes.
///
/// With the grapheme column pointing left, only parts found in the selected
/// grapheme (or any glyph of the selected n-gram) remain.
pub fn visible_vowel_glyphs(state: &SelectionState, corpus: &Corpus) -> Vec<Glyph> {
    visible_parts(state, corpus, Glyph::vowel)
}

pub fn visible_consonant_glyphs(state: &SelectionState, corpus: &Corpus) -> Vec<Glyph> {
    visible_parts(state, corpus, Glyph::consonant)
}

pub fn visible_graphemes(state: &SelectionState, corpus: &Corpus) -> Vec<Grapheme> {
    let mut graphemes: Vec<Grapheme> = if state.direction(EntityClass::Glyph) == Direction::Right {
        corpus
            .graphemes
            .iter()
            .filter(|g| state.filter.passes(g.id))
            .cloned()
            .collect()
    } else if let Some(word) = selected_word(state, corpus)
        .filter(|_| state.direction(EntityClass::Word) == Direction::Left)
    {
        corpus
            .graphemes
            .iter()
            .filter(|g| word.glyphs.contains(&g.id))
            .cloned()
            .collect()
    } else {
        corpus.graphemes.clone()
    };
    graphemes.sort_by(|a, b| annotation_order(&a.sound, &b.sound));
    graphemes
}

pub fn visible_ngrams(state: &SelectionState, corpus: &Corpus) -> Vec<NGram> {
    let glyph_right = state.direction(EntityClass::Glyph) == Direction::Right;
    let constraining_word = selected_word(state, corpus)
        .filter(|_| state.direction(EntityClass::Word) == Direction::Left);

    let mut counter = NGramCounter::new();
    for word in &corpus.words {
        for window in ngram::windows(&word.glyphs, state.n) {
            let included = if glyph_right {
                state.filter.passes_any(window)
            } else if let Some(selected) = constraining_word {
                word_contains_ngram(&selected.glyphs, window)
            } else {
                true
            };
            if included {
                counter.add(window);
            }
        }
    }
    log::debug!("{} distinct {}-grams visible", counter.len(), state.n);
    counter.into_ranked()
}

pub fn visible_words(state: &SelectionState, corpus: &Corpus) -> Vec<Word> {
    let selected_context = state
        .selected_context
        .filter(|&id| corpus.context(id).is_some())
        .filter(|_| state.direction(EntityClass::Context) == Direction::Left);
    if let Some(context) = selected_context {
        return corpus.words_in_context(context).into_iter().cloned().collect();
    }

    let mut words: Vec<Word> = if state.direction(EntityClass::Grapheme) == Direction::Right {
        match (state.mode, &state.selected_grapheme, &state.selected_ngram) {
            (Mode::Graphemes, Some(g), _) => corpus
                .words
                .iter()
                .filter(|w| w.glyphs.contains(g))
                .cloned()
                .collect(),
            (Mode::NGrams, _, Some(ng)) => corpus
                .words
                .iter()
                .filter(|w| word_contains_ngram(&w.glyphs, ng))
                .cloned()
                .collect(),
            _ => corpus.words.clone(),
        }
    } else {
        corpus.words.clone()
    };
    words.sort_by(|a, b| annotation_order(&a.meaning, &b.meaning));
    words
}

pub fn visible_contexts(state: &SelectionState, corpus: &Corpus) -> Vec<Context> {
    let mut contexts: Vec<Context> = match selected_word(state, corpus)
        .filter(|_| state.direction(EntityClass::Word) == Direction::Right)
    {
        Some(word) => corpus.contexts_for_word(word.id).into_iter().cloned().collect(),
        None => corpus.contexts.clone(),
    };
    contexts.sort_by_key(|c| std::cmp::Reverse(c.id));
    contexts
}
