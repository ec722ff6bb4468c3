// File: src/core/glyph.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bits drawn as the vowel half of a glyph: the outer roof, the outer floor
/// and the left vertical line.
pub const VOWEL_MASK: u16 = 0x10CC;
/// Bits drawn as the consonant half: the inner strokes and the middle verticals.
pub const CONSONANT_MASK: u16 = 0x0F13;
/// The bottom circle, marking that the syllable is read vowel-first.
pub const REVERSE_MASK: u16 = 0x0020;
/// Every meaningful bit. Anything outside is ignored by the codec.
pub const GLYPH_MASK: u16 = VOWEL_MASK | CONSONANT_MASK | REVERSE_MASK;

const HALF_MASK: u16 = 0x3F;
const LEFT_LINE_BIT: u16 = 1 << 12;

/// A single glyph identifier, packed into the low 13 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Glyph(pub u16);

impl Glyph {
    pub const EMPTY: Glyph = Glyph(0);

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn vowel(self) -> Glyph {
        Glyph(self.0 & VOWEL_MASK)
    }

    pub fn consonant(self) -> Glyph {
        Glyph(self.0 & CONSONANT_MASK)
    }

    pub fn is_reversed(self) -> bool {
        self.0 & REVERSE_MASK != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 & GLYPH_MASK == 0
    }

    /// Packs the three components back into one identifier.
    /// Stray bits in either component are masked off.
    pub fn combine(vowel: Glyph, consonant: Glyph, reversed: bool) -> Glyph {
        let flag = if reversed { REVERSE_MASK } else { 0 };
        Glyph((vowel.0 & VOWEL_MASK) | (consonant.0 & CONSONANT_MASK) | flag)
    }

    /// Packs a glyph the way the typer draws it: six upper strokes, six lower
    /// strokes (the circle is the sixth lower stroke) and the left line.
    pub fn combine_halves(upper: u16, lower: u16, left_line: bool) -> Glyph {
        let line = if left_line { LEFT_LINE_BIT } else { 0 };
        Glyph(((upper & HALF_MASK) << 6) | (lower & HALF_MASK) | line)
    }

    pub fn upper_half(self) -> u16 {
        (self.0 >> 6) & HALF_MASK
    }

    pub fn lower_half(self) -> u16 {
        self.0 & HALF_MASK
    }

    /// Strokes present in this glyph, in bit order.
    pub fn strokes(self) -> impl Iterator<Item = Stroke> {
        Stroke::ALL.into_iter().filter(move |s| self.0 & s.bit() != 0)
    }

    /// True when every bit of `part` is also set in `self`.
    pub fn contains(self, part: Glyph) -> bool {
        (self.0 | part.0) == self.0
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid glyph '{input}': expected a decimal or 0x-prefixed hex number")]
pub struct ParseGlyphError {
    pub input: String,
}

impl FromStr for Glyph {
    type Err = ParseGlyphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u16::from_str_radix(hex, 16),
            None => s.parse::<u16>(),
        };
        parsed.map(Glyph).map_err(|_| ParseGlyphError { input: s.to_string() })
    }
}

/// Which half of the syllable a stroke belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Vowel,
    Consonant,
    Reverse,
}

/// One drawable stroke of a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stroke {
    LowerTopLeft,
    LowerTopRight,
    LowerBottomLeft,
    LowerBottomRight,
    LowerMiddleVertical,
    BottomCircle,
    UpperTopLeft,
    UpperTopRight,
    UpperBottomLeft,
    UpperBottomRight,
    UpperMiddleVertical,
    UpperBottomVertical,
    LeftVertical,
}

impl Stroke {
    pub const ALL: [Stroke; 13] = [
        Stroke::LowerTopLeft,
        Stroke::LowerTopRight,
        Stroke::LowerBottomLeft,
        Stroke::LowerBottomRight,
        Stroke::LowerMiddleVertical,
        Stroke::BottomCircle,
        Stroke::UpperTopLeft,
        Stroke::UpperTopRight,
        Stroke::UpperBottomLeft,
        Stroke::UpperBottomRight,
        Stroke::UpperMiddleVertical,
        Stroke::UpperBottomVertical,
        Stroke::LeftVertical,
    ];

    pub fn bit(self) -> u16 {
        1 << (self as u16)
    }

    pub fn component(self) -> Component {
        let bit = self.bit();
        if bit & VOWEL_MASK != 0 {
            Component::Vowel
        } else if bit & CONSONANT_MASK != 0 {
            Component::Consonant
        } else {
            Component::Reverse
        }
    }
}

/// Best-effort reading of a glyph from whatever sounds have been assigned
/// to its two halves so far.
///
/// `lookup` returns the recorded sound of a grapheme id, if that grapheme is
/// known. A half that is blank renders as nothing; a half that is drawn but
/// unannotated renders as `?`.
pub fn sound_guess<'a, F>(glyph: Glyph, lookup: F) -> String
where
    F: Fn(Glyph) -> Option<&'a str>,
{
    let part = |component: Glyph| -> String {
        if component.is_empty() {
            return String::new();
        }
        match lookup(component) {
            Some(sound) if !sound.is_empty() => sound.to_string(),
            _ => "?".to_string(),
        }
    };
    let vowel = part(glyph.vowel());
    let consonant = part(glyph.consonant());
    if glyph.is_reversed() {
        vowel + &consonant
    } else {
        consonant + &vowel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn masks_partition_thirteen_bits() {
        assert_eq!(VOWEL_MASK & CONSONANT_MASK, 0);
        assert_eq!(VOWEL_MASK & REVERSE_MASK, 0);
        assert_eq!(CONSONANT_MASK & REVERSE_MASK, 0);
        assert_eq!(GLYPH_MASK, 0x1FFF);
    }

    #[test]
    fn combine_recovers_components() {
        for vowel in [0u16, 0x04, 0x10CC, 0x1040] {
            for consonant in [0u16, 0x01, 0x0F13, 0x0300] {
                for reversed in [false, true] {
                    let g = Glyph::combine(Glyph(vowel), Glyph(consonant), reversed);
                    assert_eq!(g.vowel(), Glyph(vowel & VOWEL_MASK));
                    assert_eq!(g.consonant(), Glyph(consonant & CONSONANT_MASK));
                    assert_eq!(g.is_reversed(), reversed);
                }
            }
        }
    }

    #[test]
    fn combine_masks_stray_bits() {
        let g = Glyph::combine(Glyph(0xFFFF), Glyph(0), false);
        assert_eq!(g, Glyph(VOWEL_MASK));
    }

    #[test]
    fn halves_follow_drawing_layout() {
        let g = Glyph::combine_halves(0b000011, 0b100000, true);
        assert_eq!(g.bits(), (0b11 << 6) | 0b100000 | (1 << 12));
        assert!(g.is_reversed());
        assert_eq!(g.upper_half(), 0b11);
        assert_eq!(g.lower_half(), 0b100000);
        let strokes: Vec<Stroke> = g.strokes().collect();
        assert_eq!(
            strokes,
            vec![Stroke::BottomCircle, Stroke::UpperTopLeft, Stroke::UpperTopRight, Stroke::LeftVertical]
        );
        assert_eq!(Stroke::LeftVertical.component(), Component::Vowel);
        assert_eq!(Stroke::UpperMiddleVertical.component(), Component::Consonant);
    }

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!("4300".parse::<Glyph>(), Ok(Glyph(4300)));
        assert_eq!("0x10cc".parse::<Glyph>(), Ok(Glyph(0x10CC)));
        assert!("ten".parse::<Glyph>().is_err());
    }

    #[test]
    fn sound_guess_orders_by_reverse_flag() {
        let mut sounds: HashMap<Glyph, &str> = HashMap::new();
        sounds.insert(Glyph(0x04), "a");
        sounds.insert(Glyph(0x01), "t");
        let lookup = |g: Glyph| sounds.get(&g).copied();

        assert_eq!(sound_guess(Glyph(0x05), lookup), "ta");
        assert_eq!(sound_guess(Glyph(0x25), lookup), "at");
        // consonant only, vowel half blank
        assert_eq!(sound_guess(Glyph(0x01), lookup), "t");
        // unknown vowel half
        assert_eq!(sound_guess(Glyph(0x09), lookup), "t?");
    }

    #[test]
    fn empty_sound_reads_as_unknown() {
        let lookup = |g: Glyph| if g == Glyph(0x01) { Some("") } else { None };
        assert_eq!(sound_guess(Glyph(0x01), lookup), "?");
        assert_eq!(sound_guess(Glyph::EMPTY, lookup), "");
    }
}
