// File: src/core/direction.rs
use serde::{Deserialize, Serialize};

/// Which way filtering flows out of an entity class.
///
/// `Right` pushes this class's filter or selection onto its right-hand
/// neighbour; `Left` lets this class's selection constrain its left-hand
/// neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Off,
    Left,
    Right,
}

/// The four columns of the pipeline, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityClass {
    Glyph,
    Grapheme,
    Word,
    Context,
}

impl EntityClass {
    pub const ALL: [EntityClass; 4] =
        [EntityClass::Glyph, EntityClass::Grapheme, EntityClass::Word, EntityClass::Context];

    pub fn name(self) -> &'static str {
        match self {
            EntityClass::Glyph => "glyph",
            EntityClass::Grapheme => "grapheme",
            EntityClass::Word => "word",
            EntityClass::Context => "context",
        }
    }
}

/// Neighbouring classes. Upstream `Right` and downstream `Left` on the same
/// edge would drive each other, so at most one of them may be active.
struct Adjacency {
    upstream: EntityClass,
    downstream: EntityClass,
}

const ADJACENCY: [Adjacency; 3] = [
    Adjacency { upstream: EntityClass::Glyph, downstream: EntityClass::Grapheme },
    Adjacency { upstream: EntityClass::Grapheme, downstream: EntityClass::Word },
    Adjacency { upstream: EntityClass::Word, downstream: EntityClass::Context },
];

/// The four filter directions, kept free of contradictory pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Directions {
    glyph: Direction,
    grapheme: Direction,
    word: Direction,
    context: Direction,
}

impl Default for Directions {
    fn default() -> Self {
        Self {
            glyph: Direction::Right,
            grapheme: Direction::Right,
            word: Direction::Right,
            context: Direction::Off,
        }
    }
}

impl Directions {
    pub fn all_off() -> Self {
        Self {
            glyph: Direction::Off,
            grapheme: Direction::Off,
            word: Direction::Off,
            context: Direction::Off,
        }
    }

    pub fn get(&self, class: EntityClass) -> Direction {
        match class {
            EntityClass::Glyph => self.glyph,
            EntityClass::Grapheme => self.grapheme,
            EntityClass::Word => self.word,
            EntityClass::Context => self.context,
        }
    }

    fn slot_mut(&mut self, class: EntityClass) -> &mut Direction {
        match class {
            EntityClass::Glyph => &mut self.glyph,
            EntityClass::Grapheme => &mut self.grapheme,
            EntityClass::Word => &mut self.word,
            EntityClass::Context => &mut self.context,
        }
    }

    /// Sets one direction and clears whatever it contradicts.
    ///
    /// A direction pointing past either end of the pipeline has nothing to
    /// drive and is stored as `Off`. Returns the direction actually stored.
    pub fn set(&mut self, class: EntityClass, direction: Direction) -> Direction {
        let direction = match (class, direction) {
            (EntityClass::Glyph, Direction::Left) | (EntityClass::Context, Direction::Right) => {
                Direction::Off
            }
            (_, d) => d,
        };
        *self.slot_mut(class) = direction;

        for edge in &ADJACENCY {
            match direction {
                Direction::Right if edge.upstream == class => {
                    let other = self.slot_mut(edge.downstream);
                    if *other == Direction::Left {
                        log::debug!(
                            "{} -> right clears {} left",
                            class.name(),
                            edge.downstream.name()
                        );
                        *other = Direction::Off;
                    }
                }
                Direction::Left if edge.downstream == class => {
                    let other = self.slot_mut(edge.upstream);
                    if *other == Direction::Right {
                        log::debug!(
                            "{} -> left clears {} right",
                            class.name(),
                            edge.upstream.name()
                        );
                        *other = Direction::Off;
                    }
                }
                _ => {}
            }
        }
        direction
    }

    pub fn with(mut self, class: EntityClass, direction: Direction) -> Self {
        self.set(class, direction);
        self
    }

    /// True when no edge is driven from both ends and no end of the pipeline
    /// points outward.
    pub fn is_consistent(&self) -> bool {
        self.glyph != Direction::Left
            && self.context != Direction::Right
            && ADJACENCY.iter().all(|edge| {
                !(self.get(edge.upstream) == Direction::Right
                    && self.get(edge.downstream) == Direction::Left)
            })
    }

    /// Repairs a value that did not come through [`Directions::set`], such as
    /// a hand-edited snapshot. On a contested edge the downstream `Left` loses.
    pub fn normalized(mut self) -> Self {
        if self.glyph == Direction::Left {
            self.glyph = Direction::Off;
        }
        if self.context == Direction::Right {
            self.context = Direction::Off;
        }
        for edge in &ADJACENCY {
            if self.get(edge.upstream) == Direction::Right
                && self.get(edge.downstream) == Direction::Left
            {
                *self.slot_mut(edge.downstream) = Direction::Off;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_left_clears_grapheme_right() {
        let mut dirs = Directions::default();
        assert_eq!(dirs.get(EntityClass::Grapheme), Direction::Right);
        dirs.set(EntityClass::Word, Direction::Left);
        assert_eq!(dirs.get(EntityClass::Word), Direction::Left);
        assert_eq!(dirs.get(EntityClass::Grapheme), Direction::Off);
        // glyph -> grapheme edge is untouched
        assert_eq!(dirs.get(EntityClass::Glyph), Direction::Right);
    }

    #[test]
    fn right_clears_downstream_left() {
        let mut dirs = Directions::all_off()
            .with(EntityClass::Grapheme, Direction::Left)
            .with(EntityClass::Context, Direction::Left);
        dirs.set(EntityClass::Glyph, Direction::Right);
        assert_eq!(dirs.get(EntityClass::Grapheme), Direction::Off);
        dirs.set(EntityClass::Word, Direction::Right);
        assert_eq!(dirs.get(EntityClass::Context), Direction::Off);
    }

    #[test]
    fn left_only_clears_its_own_edge() {
        let mut dirs = Directions::default();
        dirs.set(EntityClass::Context, Direction::Left);
        assert_eq!(dirs.get(EntityClass::Word), Direction::Off);
        assert_eq!(dirs.get(EntityClass::Grapheme), Direction::Right);
        assert_eq!(dirs.get(EntityClass::Glyph), Direction::Right);
    }

    #[test]
    fn pipeline_ends_collapse_to_off() {
        let mut dirs = Directions::default();
        assert_eq!(dirs.set(EntityClass::Glyph, Direction::Left), Direction::Off);
        assert_eq!(dirs.set(EntityClass::Context, Direction::Right), Direction::Off);
        assert!(dirs.is_consistent());
    }

    #[test]
    fn every_transition_sequence_stays_consistent() {
        let choices = [Direction::Off, Direction::Left, Direction::Right];
        let mut dirs = Directions::default();
        for round in 0..200usize {
            let class = EntityClass::ALL[(round * 7 + round / 3) % 4];
            let direction = choices[(round * 5 + round / 4) % 3];
            dirs.set(class, direction);
            assert!(dirs.is_consistent(), "inconsistent after {:?} {:?}: {:?}", class, direction, dirs);
        }
    }

    #[test]
    fn normalized_repairs_contested_edges() {
        let raw = Directions {
            glyph: Direction::Left,
            grapheme: Direction::Right,
            word: Direction::Left,
            context: Direction::Right,
        };
        let fixed = raw.normalized();
        assert!(fixed.is_consistent());
        assert_eq!(fixed.get(EntityClass::Grapheme), Direction::Right);
        assert_eq!(fixed.get(EntityClass::Word), Direction::Off);
    }
}
