// File: src/store.rs
//! The data-access seam. The selectors never talk to a store directly; they
//! read a [`Corpus`] snapshot taken from one.

use crate::core::corpus::Corpus;
use crate::core::glyph::Glyph;
use crate::core::types::{
    word_key, AssetId, Context, ContextId, ContextWordJunction, Grapheme, JunctionId, Word, WordId,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorpusError {
    #[error("unknown grapheme {0}")]
    UnknownGrapheme(Glyph),

    #[error("unknown word {0}")]
    UnknownWord(WordId),

    #[error("unknown context {0}")]
    UnknownContext(ContextId),

    #[error("a word needs at least one glyph")]
    EmptyWord,

    #[error("nothing to submit")]
    EmptyText,

    #[error("grapheme {0} already exists")]
    DuplicateGrapheme(Glyph),

    #[error("word [{0}] already exists")]
    DuplicateWord(String),

    #[error("a context without an image already exists (id {0})")]
    DuplicateTextlessContext(ContextId),

    #[error("position {order} is already taken in context {context}")]
    OrderTaken { context: ContextId, order: u32 },

    #[error("context {0} has no position left after its last word")]
    OrderExhausted(ContextId),
}

pub type Result<T> = std::result::Result<T, CorpusError>;

/// What [`CorpusStore::add_word`] touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedWord {
    pub word_id: WordId,
    pub context_id: ContextId,
    pub junction_id: JunctionId,
    pub created_word: bool,
    pub created_graphemes: Vec<Glyph>,
}

/// Simple CRUD over the four collections.
pub trait CorpusStore {
    fn graphemes(&self) -> Vec<Grapheme>;
    fn words(&self) -> Vec<Word>;
    fn contexts(&self) -> Vec<Context>;
    /// All junctions, by ascending order.
    fn junctions_by_order(&self) -> Vec<ContextWordJunction>;

    fn grapheme(&self, id: Glyph) -> Option<Grapheme>;
    fn word(&self, id: WordId) -> Option<Word>;
    fn context(&self, id: ContextId) -> Option<Context>;

    fn create_grapheme(&mut self, id: Glyph) -> Result<Grapheme>;
    fn create_word(&mut self, glyphs: Vec<Glyph>) -> Result<Word>;
    fn create_context(&mut self, image: Option<AssetId>) -> Result<Context>;
    fn create_junction(
        &mut self,
        context: ContextId,
        word: WordId,
        order: u32,
    ) -> Result<ContextWordJunction>;

    fn update_grapheme(&mut self, id: Glyph, sound: &str) -> Result<Grapheme>;
    fn update_word(&mut self, id: WordId, meaning: &str) -> Result<Word>;
    fn update_context(&mut self, id: ContextId, text: &str) -> Result<Context>;

    fn snapshot(&self) -> Corpus {
        Corpus {
            graphemes: self.graphemes(),
            words: self.words(),
            contexts: self.contexts(),
            junctions: self.junctions_by_order(),
        }
    }

    /// Looks a word up by its identity, the exact glyph sequence.
    fn find_word(&self, glyphs: &[Glyph]) -> Option<Word> {
        self.words().into_iter().find(|w| w.glyphs == glyphs)
    }

    /// The context showing `image`, or the single textless context when
    /// `image` is `None`. Created on first use.
    fn find_or_create_context(&mut self, image: Option<&str>) -> Result<Context> {
        let existing = self
            .contexts()
            .into_iter()
            .find(|c| c.image.as_deref() == image);
        match existing {
            Some(context) => Ok(context),
            None => self.create_context(image.map(str::to_string)),
        }
    }

    /// One past the highest order used in `context`, or 0 when it is empty.
    fn next_order(&self, context: ContextId) -> Result<u32> {
        let last = self
            .junctions_by_order()
            .iter()
            .filter(|j| j.contexts_id == context)
            .map(|j| j.order)
            .max();
        match last {
            None => Ok(0),
            Some(order) => order.checked_add(1).ok_or(CorpusError::OrderExhausted(context)),
        }
    }

    fn order_taken(&self, context: ContextId, order: u32) -> bool {
        self.junctions_by_order()
            .iter()
            .any(|j| j.contexts_id == context && j.order == order)
    }

    /// Places a typed word into a context.
    ///
    /// Reuses the stored word with the same glyph sequence if there is one,
    /// appends at the end of the context when `order` is `None`, and records
    /// every glyph not seen before as a new grapheme. Nothing is written
    /// unless the whole placement succeeds.
    fn add_word(
        &mut self,
        glyphs: &[Glyph],
        context: ContextId,
        order: Option<u32>,
    ) -> Result<AddedWord> {
        if glyphs.is_empty() {
            return Err(CorpusError::EmptyWord);
        }
        if self.context(context).is_none() {
            return Err(CorpusError::UnknownContext(context));
        }
        let order = match order {
            Some(order) => order,
            None => self.next_order(context)?,
        };
        if self.order_taken(context, order) {
            return Err(CorpusError::OrderTaken { context, order });
        }

        let (word, created_word) = match self.find_word(glyphs) {
            Some(word) => (word, false),
            None => (self.create_word(glyphs.to_vec())?, true),
        };
        let junction = self.create_junction(context, word.id, order)?;

        let mut created_graphemes = Vec::new();
        for &glyph in glyphs {
            if self.grapheme(glyph).is_none() {
                self.create_grapheme(glyph)?;
                created_graphemes.push(glyph);
            }
        }

        Ok(AddedWord {
            word_id: word.id,
            context_id: context,
            junction_id: junction.id,
            created_word,
            created_graphemes,
        })
    }

    /// Adds a whole typed text to one context, word by word in reading order.
    fn submit_text(&mut self, words: &[Vec<Glyph>], image: Option<&str>) -> Result<Vec<AddedWord>> {
        let words: Vec<&Vec<Glyph>> = words.iter().filter(|w| !w.is_empty()).collect();
        if words.is_empty() {
            return Err(CorpusError::EmptyText);
        }
        let context = self.find_or_create_context(image)?;
        words
            .into_iter()
            .map(|glyphs| self.add_word(glyphs, context.id, None))
            .collect()
    }
}

/// An in-process store backed by a [`Corpus`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    corpus: Corpus,
    revision: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_corpus(corpus: Corpus) -> Self {
        Self { corpus, revision: 0 }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Incremented by every successful write.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn next_word_id(&self) -> WordId {
        self.corpus.words.iter().map(|w| w.id).max().unwrap_or(0) + 1
    }

    fn next_context_id(&self) -> ContextId {
        self.corpus.contexts.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }

    fn next_junction_id(&self) -> JunctionId {
        self.corpus.junctions.iter().map(|j| j.id).max().unwrap_or(0) + 1
    }
}

impl CorpusStore for MemoryStore {
    fn graphemes(&self) -> Vec<Grapheme> {
        self.corpus.graphemes.clone()
    }

    fn words(&self) -> Vec<Word> {
        self.corpus.words.clone()
    }

    fn contexts(&self) -> Vec<Context> {
        self.corpus.contexts.clone()
    }

    fn junctions_by_order(&self) -> Vec<ContextWordJunction> {
        let mut junctions = self.corpus.junctions.clone();
        junctions.sort_by_key(|j| (j.order, j.id));
        junctions
    }

    fn grapheme(&self, id: Glyph) -> Option<Grapheme> {
        self.corpus.grapheme(id).cloned()
    }

    fn word(&self, id: WordId) -> Option<Word> {
        self.corpus.word(id).cloned()
    }

    fn context(&self, id: ContextId) -> Option<Context> {
        self.corpus.context(id).cloned()
    }

    fn create_grapheme(&mut self, id: Glyph) -> Result<Grapheme> {
        if self.corpus.grapheme(id).is_some() {
            return Err(CorpusError::DuplicateGrapheme(id));
        }
        let grapheme = Grapheme::new(id);
        self.corpus.graphemes.push(grapheme.clone());
        self.revision += 1;
        log::info!("new grapheme {}", id);
        Ok(grapheme)
    }

    fn create_word(&mut self, glyphs: Vec<Glyph>) -> Result<Word> {
        if glyphs.is_empty() {
            return Err(CorpusError::EmptyWord);
        }
        if self.corpus.word_by_glyphs(&glyphs).is_some() {
            return Err(CorpusError::DuplicateWord(word_key(&glyphs)));
        }
        let word = Word { id: self.next_word_id(), glyphs, meaning: String::new() };
        self.corpus.words.push(word.clone());
        self.revision += 1;
        log::info!("new word {} [{}]", word.id, word.key());
        Ok(word)
    }

    fn create_context(&mut self, image: Option<AssetId>) -> Result<Context> {
        if image.is_none() {
            if let Some(existing) = self.corpus.contexts.iter().find(|c| c.image.is_none()) {
                return Err(CorpusError::DuplicateTextlessContext(existing.id));
            }
        }
        let context = Context { id: self.next_context_id(), image, text: String::new() };
        self.corpus.contexts.push(context.clone());
        self.revision += 1;
        log::info!("new context {} (image {:?})", context.id, context.image);
        Ok(context)
    }

    fn create_junction(
        &mut self,
        context: ContextId,
        word: WordId,
        order: u32,
    ) -> Result<ContextWordJunction> {
        if self.corpus.context(context).is_none() {
            return Err(CorpusError::UnknownContext(context));
        }
        if self.corpus.word(word).is_none() {
            return Err(CorpusError::UnknownWord(word));
        }
        if self
            .corpus
            .junctions
            .iter()
            .any(|j| j.contexts_id == context && j.order == order)
        {
            return Err(CorpusError::OrderTaken { context, order });
        }
        let junction = ContextWordJunction {
            id: self.next_junction_id(),
            order,
            contexts_id: context,
            words_id: word,
        };
        self.corpus.junctions.push(junction.clone());
        self.revision += 1;
        Ok(junction)
    }

    fn update_grapheme(&mut self, id: Glyph, sound: &str) -> Result<Grapheme> {
        let grapheme = self
            .corpus
            .graphemes
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(CorpusError::UnknownGrapheme(id))?;
        grapheme.sound = sound.to_string();
        self.revision += 1;
        log::info!("grapheme {} sounds like {:?}", id, sound);
        Ok(grapheme.clone())
    }

    fn update_word(&mut self, id: WordId, meaning: &str) -> Result<Word> {
        let word = self
            .corpus
            .words
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(CorpusError::UnknownWord(id))?;
        word.meaning = meaning.to_string();
        self.revision += 1;
        log::info!("word {} means {:?}", id, meaning);
        Ok(word.clone())
    }

    fn update_context(&mut self, id: ContextId, text: &str) -> Result<Context> {
        let context = self
            .corpus
            .contexts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CorpusError::UnknownContext(id))?;
        context.text = text.to_string();
        self.revision += 1;
        Ok(context.clone())
    }

    fn snapshot(&self) -> Corpus {
        let mut corpus = self.corpus.clone();
        corpus.junctions.sort_by_key(|j| (j.order, j.id));
        corpus
    }

    fn find_word(&self, glyphs: &[Glyph]) -> Option<Word> {
        self.corpus.word_by_glyphs(glyphs).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(ids: &[u16]) -> Vec<Glyph> {
        ids.iter().map(|&id| Glyph(id)).collect()
    }

    #[test]
    fn add_word_reuses_word_and_creates_graphemes_once() {
        let mut store = MemoryStore::new();
        let ctx = store.find_or_create_context(None).unwrap();

        let first = store.add_word(&g(&[10, 20]), ctx.id, None).unwrap();
        assert!(first.created_word);
        assert_eq!(first.created_graphemes, g(&[10, 20]));

        let second = store.add_word(&g(&[10, 20]), ctx.id, None).unwrap();
        assert!(!second.created_word);
        assert_eq!(second.word_id, first.word_id);
        assert!(second.created_graphemes.is_empty());

        let orders: Vec<u32> = store.junctions_by_order().iter().map(|j| j.order).collect();
        assert_eq!(orders, vec![0, 1]);
        assert_eq!(store.graphemes().len(), 2);
    }

    #[test]
    fn textless_context_is_unique() {
        let mut store = MemoryStore::new();
        let a = store.find_or_create_context(None).unwrap();
        let b = store.find_or_create_context(None).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(
            store.create_context(None),
            Err(CorpusError::DuplicateTextlessContext(a.id))
        );
        let img = store.find_or_create_context(Some("asset-1")).unwrap();
        assert_ne!(img.id, a.id);
        assert_eq!(store.find_or_create_context(Some("asset-1")).unwrap().id, img.id);
    }

    #[test]
    fn junction_order_is_unique_per_context() {
        let mut store = MemoryStore::new();
        let ctx = store.find_or_create_context(None).unwrap();
        store.add_word(&g(&[1, 2]), ctx.id, Some(0)).unwrap();
        assert_eq!(
            store.add_word(&g(&[3, 4]), ctx.id, Some(0)),
            Err(CorpusError::OrderTaken { context: ctx.id, order: 0 })
        );
    }

    #[test]
    fn failed_placement_leaves_store_untouched() {
        let mut store = MemoryStore::new();
        let ctx = store.find_or_create_context(None).unwrap();
        store.add_word(&g(&[1, 2]), ctx.id, Some(0)).unwrap();
        let (words, graphemes, revision) = (store.words(), store.graphemes(), store.revision());

        assert!(store.add_word(&g(&[7, 8]), ctx.id, Some(0)).is_err());
        assert_eq!(store.words(), words);
        assert_eq!(store.graphemes(), graphemes);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn append_after_last_position_is_an_error() {
        let mut store = MemoryStore::new();
        let ctx = store.find_or_create_context(None).unwrap();
        store.add_word(&g(&[1]), ctx.id, Some(u32::MAX)).unwrap();

        assert_eq!(
            store.add_word(&g(&[2]), ctx.id, None),
            Err(CorpusError::OrderExhausted(ctx.id))
        );
        assert_eq!(store.submit_text(&[g(&[3])], None), Err(CorpusError::OrderExhausted(ctx.id)));
        assert_eq!(store.words().len(), 1);
        // an explicit free position still works
        assert!(store.add_word(&g(&[2]), ctx.id, Some(0)).is_ok());
    }

    #[test]
    fn submit_text_appends_after_existing_words() {
        let mut store = MemoryStore::new();
        store.submit_text(&[g(&[1, 2]), g(&[3])], None).unwrap();
        store.submit_text(&[vec![], g(&[4, 5])], None).unwrap();
        let corpus = store.snapshot();
        assert_eq!(corpus.contexts.len(), 1);
        let words: Vec<Vec<Glyph>> = corpus
            .words_in_context(corpus.contexts[0].id)
            .iter()
            .map(|w| w.glyphs.clone())
            .collect();
        assert_eq!(words, vec![g(&[1, 2]), g(&[3]), g(&[4, 5])]);
        assert_eq!(store.submit_text(&[vec![]], None), Err(CorpusError::EmptyText));
    }

    #[test]
    fn updates_reject_unknown_ids() {
        let mut store = MemoryStore::new();
        assert_eq!(store.update_word(9, "x"), Err(CorpusError::UnknownWord(9)));
        assert_eq!(
            store.update_grapheme(Glyph(3), "k"),
            Err(CorpusError::UnknownGrapheme(Glyph(3)))
        );
        assert_eq!(store.add_word(&g(&[1]), 5, None), Err(CorpusError::UnknownContext(5)));
        assert_eq!(store.add_word(&[], 5, None), Err(CorpusError::EmptyWord));
    }
}
