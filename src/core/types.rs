// src/core/types.rs
use crate::core::glyph::Glyph;
use serde::{Deserialize, Serialize};

/// Identifier of a stored word.
pub type WordId = u64;
/// Identifier of a stored context (one image or text unit).
pub type ContextId = u64;
/// Identifier of a context/word junction row.
pub type JunctionId = u64;
/// Opaque reference to an uploaded image asset.
pub type AssetId = String;

/// A glyph that has been seen in at least one word, with its sound guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grapheme {
    pub id: Glyph,
    #[serde(default)]
    pub sound: String,
}

impl Grapheme {
    pub fn new(id: Glyph) -> Self {
        Self { id, sound: String::new() }
    }

    pub fn is_annotated(&self) -> bool {
        is_annotated(&self.sound)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    /// Ordered glyph sequence. Duplicates are allowed.
    pub glyphs: Vec<Glyph>,
    #[serde(default)]
    pub meaning: String,
}

impl Word {
    /// The deduplication key: glyph ids joined with commas.
    pub fn key(&self) -> String {
        word_key(&self.glyphs)
    }

    pub fn is_annotated(&self) -> bool {
        is_annotated(&self.meaning)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub id: ContextId,
    /// `None` marks the single textless context that collects typed words
    /// without an image.
    #[serde(default)]
    pub image: Option<AssetId>,
    #[serde(default)]
    pub text: String,
}

/// Places a word at a position inside a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWordJunction {
    pub id: JunctionId,
    pub order: u32,
    pub contexts_id: ContextId,
    pub words_id: WordId,
}

pub fn word_key(glyphs: &[Glyph]) -> String {
    glyphs
        .iter()
        .map(|g| g.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// A sound or meaning counts as annotated once it holds something other
/// than whitespace or the `?` placeholder.
pub fn is_annotated(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && text != "?"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_key_joins_ids_in_order() {
        assert_eq!(word_key(&[Glyph(10), Glyph(20), Glyph(10)]), "10,20,10");
        assert_eq!(word_key(&[]), "");
    }

    #[test]
    fn placeholder_is_not_an_annotation() {
        assert!(!is_annotated(""));
        assert!(!is_annotated(" ? "));
        assert!(is_annotated("ka"));
    }
}
