// File: src/core/ngram.rs
use crate::core::glyph::Glyph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Smallest window the n-gram view will enumerate.
pub const MIN_NGRAM: usize = 2;

/// A distinct n-gram and how many windows across the corpus produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NGram {
    pub glyphs: Vec<Glyph>,
    pub count: usize,
}

/// True when `ngram` occurs as a contiguous run inside `word`.
pub fn word_contains_ngram(word: &[Glyph], ngram: &[Glyph]) -> bool {
    if ngram.is_empty() {
        return true;
    }
    if ngram.len() > word.len() {
        return false;
    }
    word.windows(ngram.len()).any(|window| window == ngram)
}

/// Every contiguous window of length `n`. Words shorter than `n` yield nothing.
pub fn windows(word: &[Glyph], n: usize) -> impl Iterator<Item = &[Glyph]> {
    let n = n.max(1);
    word.windows(n)
}

/// Deduplicates windows while counting them.
///
/// Keeps first-seen order so that [`NGramCounter::into_ranked`] can fall back
/// on it for equal counts.
#[derive(Debug, Default)]
pub struct NGramCounter {
    index: HashMap<Vec<Glyph>, usize>,
    entries: Vec<NGram>,
}

impl NGramCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// O(n) per window for hashing the key.
    pub fn add(&mut self, window: &[Glyph]) {
        if let Some(&slot) = self.index.get(window) {
            self.entries[slot].count += 1;
        } else {
            self.index.insert(window.to_vec(), self.entries.len());
            self.entries.push(NGram { glyphs: window.to_vec(), count: 1 });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most frequent first; equal counts keep the order they were first seen.
    pub fn into_ranked(self) -> Vec<NGram> {
        let mut entries = self.entries;
        entries.sort_by_key(|ng| std::cmp::Reverse(ng.count));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(ids: &[u16]) -> Vec<Glyph> {
        ids.iter().map(|&id| Glyph(id)).collect()
    }

    #[test]
    fn containment_is_contiguous_and_ordered() {
        assert!(word_contains_ngram(&g(&[1, 2, 3, 4]), &g(&[2, 3])));
        assert!(!word_contains_ngram(&g(&[1, 2, 3, 4]), &g(&[3, 2])));
        assert!(!word_contains_ngram(&g(&[1, 2, 3, 4]), &g(&[1, 3])));
        assert!(!word_contains_ngram(&g(&[1, 2]), &g(&[1, 2, 3])));
        assert!(word_contains_ngram(&g(&[1, 2]), &g(&[1, 2])));
        assert!(word_contains_ngram(&g(&[1, 2]), &[]));
    }

    #[test]
    fn short_words_have_no_windows() {
        assert_eq!(windows(&g(&[1]), 2).count(), 0);
        assert_eq!(windows(&g(&[1, 2, 3]), 2).count(), 2);
    }

    #[test]
    fn counter_ranks_by_count_then_first_seen() {
        let mut counter = NGramCounter::new();
        for word in [g(&[5, 6]), g(&[1, 2]), g(&[1, 2]), g(&[5, 6]), g(&[7, 8])] {
            counter.add(&word);
        }
        counter.add(&g(&[7, 8]));
        counter.add(&g(&[7, 8]));
        assert_eq!(counter.len(), 3);
        let ranked = counter.into_ranked();
        assert_eq!(
            ranked,
            vec![
                NGram { glyphs: g(&[7, 8]), count: 3 },
                NGram { glyphs: g(&[5, 6]), count: 2 },
                NGram { glyphs: g(&[1, 2]), count: 2 },
            ]
        );
    }
}
