// File: src/entry.rs
use crate::core::corpus::Corpus;
use crate::core::glyph::Glyph;
use crate::core::types::AssetId;
use crate::store::{AddedWord, CorpusError, CorpusStore};
use serde::{Deserialize, Serialize};

/// Text being typed glyph by glyph before it is submitted to a context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySession {
    words: Vec<Vec<Glyph>>,
    current: Vec<Glyph>,
    image: Option<AssetId>,
}

impl EntrySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_glyph(&mut self, glyph: Glyph) {
        if !glyph.is_empty() {
            self.current.push(glyph);
        }
    }

    /// Removes the last glyph of the word in progress, or reopens the
    /// previous word when the current one is empty.
    pub fn backspace(&mut self) {
        if self.current.pop().is_none() {
            if let Some(previous) = self.words.pop() {
                self.current = previous;
            }
        }
    }

    /// Closes the word in progress. Empty words are dropped.
    pub fn finish_word(&mut self) {
        if !self.current.is_empty() {
            self.words.push(std::mem::take(&mut self.current));
        }
    }

    pub fn set_image(&mut self, image: Option<AssetId>) {
        self.image = image;
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn words(&self) -> &[Vec<Glyph>] {
        &self.words
    }

    pub fn current_word(&self) -> &[Glyph] {
        &self.current
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.current.is_empty()
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.current.clear();
        self.image = None;
    }

    /// The typed text read back through whatever is known so far.
    pub fn translation(&self, corpus: &Corpus) -> String {
        self.words
            .iter()
            .chain(std::iter::once(&self.current).filter(|w| !w.is_empty()))
            .map(|w| corpus.glyphs_translation(w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Sends the text to the store as one context and starts over.
    /// On error the session is left untouched.
    pub fn submit<S: CorpusStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<Vec<AddedWord>, CorpusError> {
        let mut words = self.words.clone();
        if !self.current.is_empty() {
            words.push(self.current.clone());
        }
        let added = store.submit_text(&words, self.image.as_deref())?;
        log::info!("submitted {} words", added.len());
        self.clear();
        Ok(added)
    }
}
