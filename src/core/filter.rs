// File: src/core/filter.rs
use crate::core::glyph::Glyph;
use serde::{Deserialize, Serialize};

/// Whether the reverse-syllable circle is required, forbidden, or ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReverseFilter {
    Present,
    Absent,
    #[default]
    Either,
}

/// Per-glyph outcome of the three independent filter tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterMatch {
    pub matches_vowel: bool,
    pub matches_consonant: bool,
    pub reverse_pass: bool,
}

impl FilterMatch {
    /// Existential reduction over several glyphs: each field is true when it
    /// holds for at least one of them.
    pub fn any<I: IntoIterator<Item = FilterMatch>>(matches: I) -> FilterMatch {
        matches.into_iter().fold(
            FilterMatch { matches_vowel: false, matches_consonant: false, reverse_pass: false },
            |acc, m| FilterMatch {
                matches_vowel: acc.matches_vowel || m.matches_vowel,
                matches_consonant: acc.matches_consonant || m.matches_consonant,
                reverse_pass: acc.reverse_pass || m.reverse_pass,
            },
        )
    }
}

/// Compares one glyph part against a target component.
///
/// Partial mode is a bit-subset test (`target` contains every bit of `part`),
/// exact mode is equality.
pub fn component_matches(target: Glyph, part: Glyph, partial: bool) -> bool {
    if partial {
        target.contains(part)
    } else {
        target == part
    }
}

pub fn matches_filters(
    glyph: Glyph,
    vowel_filter: Option<Glyph>,
    consonant_filter: Option<Glyph>,
    reverse_filter: ReverseFilter,
    partial: bool,
) -> FilterMatch {
    let matches_vowel = vowel_filter.map_or(true, |f| component_matches(glyph.vowel(), f, partial));
    let matches_consonant =
        consonant_filter.map_or(true, |f| component_matches(glyph.consonant(), f, partial));
    let reverse_pass = match reverse_filter {
        ReverseFilter::Present => glyph.is_reversed(),
        ReverseFilter::Absent => !glyph.is_reversed(),
        ReverseFilter::Either => true,
    };
    FilterMatch { matches_vowel, matches_consonant, reverse_pass }
}

/// Folds a [`FilterMatch`] into a single verdict.
///
/// Only the filters that are set take part; with both set, `exclusive`
/// requires both to match, otherwise either is enough. The reverse-syllable
/// test always applies.
pub fn combined_pass(
    vowel_filter: Option<Glyph>,
    consonant_filter: Option<Glyph>,
    m: FilterMatch,
    exclusive: bool,
) -> bool {
    let parts_pass = match (vowel_filter, consonant_filter) {
        (None, None) => true,
        (Some(_), None) => m.matches_vowel,
        (None, Some(_)) => m.matches_consonant,
        (Some(_), Some(_)) if exclusive => m.matches_vowel && m.matches_consonant,
        (Some(_), Some(_)) => m.matches_vowel || m.matches_consonant,
    };
    m.reverse_pass && parts_pass
}

/// The glyph-part filter as the user has configured it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlyphFilter {
    pub vowel: Option<Glyph>,
    pub consonant: Option<Glyph>,
    pub reverse: ReverseFilter,
    pub partial: bool,
    pub exclusive: bool,
}

impl Default for GlyphFilter {
    fn default() -> Self {
        Self {
            vowel: None,
            consonant: None,
            reverse: ReverseFilter::Either,
            partial: true,
            exclusive: false,
        }
    }
}

impl GlyphFilter {
    pub fn evaluate(&self, glyph: Glyph) -> FilterMatch {
        matches_filters(glyph, self.vowel, self.consonant, self.reverse, self.partial)
    }

    pub fn passes(&self, glyph: Glyph) -> bool {
        combined_pass(self.vowel, self.consonant, self.evaluate(glyph), self.exclusive)
    }

    /// An n-gram passes when the reduced match of its glyphs passes; the
    /// vowel part may come from one glyph and the consonant part from another.
    pub fn passes_any(&self, glyphs: &[Glyph]) -> bool {
        let reduced = FilterMatch::any(glyphs.iter().map(|&g| self.evaluate(g)));
        combined_pass(self.vowel, self.consonant, reduced, self.exclusive)
    }

    pub fn is_active(&self) -> bool {
        self.vowel.is_some() || self.consonant.is_some() || self.reverse != ReverseFilter::Either
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // vowel 0x0C (both lower floor strokes), consonant 0x03, circle set
    const G: Glyph = Glyph(0x0C | 0x03 | 0x20);

    #[test]
    fn inactive_filters_pass_everything() {
        let m = matches_filters(G, None, None, ReverseFilter::Either, true);
        assert!(m.matches_vowel && m.matches_consonant && m.reverse_pass);
        assert!(combined_pass(None, None, m, true));
    }

    #[test]
    fn partial_mode_accepts_subsets() {
        let m = matches_filters(G, Some(Glyph(0x04)), None, ReverseFilter::Either, true);
        assert!(m.matches_vowel);
        let m = matches_filters(G, Some(Glyph(0x0C)), None, ReverseFilter::Either, true);
        assert!(m.matches_vowel);
        let m = matches_filters(G, Some(Glyph(0x40)), None, ReverseFilter::Either, true);
        assert!(!m.matches_vowel);
    }

    #[test]
    fn exact_mode_requires_equality() {
        let exact = matches_filters(G, Some(Glyph(0x0C)), None, ReverseFilter::Either, false);
        assert!(exact.matches_vowel);
        let subset = matches_filters(G, Some(Glyph(0x04)), None, ReverseFilter::Either, false);
        assert!(!subset.matches_vowel);
    }

    #[test]
    fn consonant_exact_compares_against_consonant_filter() {
        let m = matches_filters(G, Some(Glyph(0x0C)), Some(Glyph(0x03)), ReverseFilter::Either, false);
        assert!(m.matches_vowel);
        assert!(m.matches_consonant);
        let m = matches_filters(G, Some(Glyph(0x0C)), Some(Glyph(0x01)), ReverseFilter::Either, false);
        assert!(!m.matches_consonant);
    }

    #[test]
    fn reverse_filter_checks_circle() {
        assert!(matches_filters(G, None, None, ReverseFilter::Present, true).reverse_pass);
        assert!(!matches_filters(G, None, None, ReverseFilter::Absent, true).reverse_pass);
        assert!(matches_filters(Glyph(0x03), None, None, ReverseFilter::Absent, true).reverse_pass);
    }

    #[test]
    fn exclusive_switches_between_and_and_or() {
        let m = FilterMatch { matches_vowel: true, matches_consonant: false, reverse_pass: true };
        let v = Some(Glyph(0x04));
        let c = Some(Glyph(0x01));
        assert!(!combined_pass(v, c, m, true));
        assert!(combined_pass(v, c, m, false));
        // a single active filter ignores the other result
        assert!(combined_pass(v, None, m, true));
        assert!(!combined_pass(None, c, m, false));
    }

    #[test]
    fn reverse_failure_vetoes() {
        let m = FilterMatch { matches_vowel: true, matches_consonant: true, reverse_pass: false };
        assert!(!combined_pass(None, None, m, false));
    }

    #[test]
    fn ngram_match_is_existential_per_field() {
        let filter = GlyphFilter {
            vowel: Some(Glyph(0x04)),
            consonant: Some(Glyph(0x100)),
            exclusive: true,
            ..GlyphFilter::default()
        };
        // first glyph carries the vowel, second the consonant
        let window = [Glyph(0x04), Glyph(0x100)];
        assert!(!filter.passes(window[0]));
        assert!(!filter.passes(window[1]));
        assert!(filter.passes_any(&window));
        assert!(!filter.passes_any(&[Glyph(0x04), Glyph(0x04)]));
    }

    #[test]
    fn default_filter_is_inactive() {
        assert!(!GlyphFilter::default().is_active());
        let reversed = GlyphFilter { reverse: ReverseFilter::Absent, ..GlyphFilter::default() };
        assert!(reversed.is_active());
    }
}
