// File: src/core/corpus.rs
use crate::core::glyph::{sound_guess, Glyph};
use crate::core::types::{Context, ContextId, ContextWordJunction, Grapheme, Word, WordId};
use serde::{Deserialize, Serialize};

/// An immutable view of everything the data store knows.
///
/// Selectors only ever read from a snapshot. Collections that have not been
/// loaded yet are simply empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub graphemes: Vec<Grapheme>,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub contexts: Vec<Context>,
    #[serde(default)]
    pub junctions: Vec<ContextWordJunction>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grapheme(&self, id: Glyph) -> Option<&Grapheme> {
        self.graphemes.iter().find(|g| g.id == id)
    }

    pub fn word(&self, id: WordId) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn word_by_glyphs(&self, glyphs: &[Glyph]) -> Option<&Word> {
        self.words.iter().find(|w| w.glyphs == glyphs)
    }

    pub fn context(&self, id: ContextId) -> Option<&Context> {
        self.contexts.iter().find(|c| c.id == id)
    }

    /// Junctions of one context, by ascending order.
    pub fn junctions_for_context(&self, context: ContextId) -> Vec<&ContextWordJunction> {
        let mut junctions: Vec<&ContextWordJunction> =
            self.junctions.iter().filter(|j| j.contexts_id == context).collect();
        junctions.sort_by_key(|j| j.order);
        junctions
    }

    /// The words of a context in reading order. Junctions pointing at unknown
    /// words are skipped; a word placed twice appears twice.
    pub fn words_in_context(&self, context: ContextId) -> Vec<&Word> {
        self.junctions_for_context(context)
            .into_iter()
            .filter_map(|j| self.word(j.words_id))
            .collect()
    }

    /// Contexts a word has been placed in, each listed once.
    pub fn contexts_for_word(&self, word: WordId) -> Vec<&Context> {
        self.contexts
            .iter()
            .filter(|c| {
                self.junctions
                    .iter()
                    .any(|j| j.words_id == word && j.contexts_id == c.id)
            })
            .collect()
    }

    pub fn sound_guess(&self, glyph: Glyph) -> String {
        sound_guess(glyph, |id| self.grapheme(id).map(|g| g.sound.as_str()))
    }

    /// The meaning if one was recorded, otherwise the glyph-by-glyph guess.
    pub fn word_translation(&self, word: &Word) -> String {
        if word.is_annotated() {
            word.meaning.clone()
        } else {
            self.glyphs_translation(&word.glyphs)
        }
    }

    /// Translation of a typed glyph sequence that may or may not be stored.
    pub fn glyphs_translation(&self, glyphs: &[Glyph]) -> String {
        match self.word_by_glyphs(glyphs) {
            Some(word) if word.is_annotated() => word.meaning.clone(),
            _ => glyphs.iter().map(|&g| self.sound_guess(g)).collect(),
        }
    }

    /// Reads a context back as text, `???` standing in for dangling junctions.
    pub fn context_translation(&self, context: ContextId) -> String {
        self.junctions_for_context(context)
            .into_iter()
            .map(|j| match self.word(j.words_id) {
                Some(word) => self.word_translation(word),
                None => "???".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Corpus {
        Corpus {
            graphemes: vec![
                Grapheme { id: Glyph(0x01), sound: "t".into() },
                Grapheme { id: Glyph(0x04), sound: "a".into() },
                Grapheme { id: Glyph(0x05), sound: String::new() },
            ],
            words: vec![
                Word { id: 1, glyphs: vec![Glyph(0x05)], meaning: String::new() },
                Word { id: 2, glyphs: vec![Glyph(0x05), Glyph(0x01)], meaning: "that".into() },
            ],
            contexts: vec![Context { id: 7, image: None, text: String::new() }],
            junctions: vec![
                ContextWordJunction { id: 1, order: 1, contexts_id: 7, words_id: 2 },
                ContextWordJunction { id: 2, order: 0, contexts_id: 7, words_id: 1 },
                ContextWordJunction { id: 3, order: 2, contexts_id: 7, words_id: 99 },
            ],
        }
    }

    #[test]
    fn context_words_follow_junction_order() {
        let c = corpus();
        let ids: Vec<WordId> = c.words_in_context(7).iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn translation_prefers_meaning_then_guess() {
        let c = corpus();
        assert_eq!(c.context_translation(7), "ta that ???");
        assert_eq!(c.glyphs_translation(&[Glyph(0x05), Glyph(0x01)]), "that");
        assert_eq!(c.glyphs_translation(&[Glyph(0x01), Glyph(0x05)]), "tta");
    }

    #[test]
    fn contexts_for_word_are_distinct() {
        let mut c = corpus();
        c.junctions.push(ContextWordJunction { id: 4, order: 3, contexts_id: 7, words_id: 2 });
        assert_eq!(c.contexts_for_word(2).len(), 1);
        assert!(c.contexts_for_word(42).is_empty());
    }
}
