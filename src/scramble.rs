use itertools::Itertools;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::fmt;

pub const DEFAULT_SCRAMBLE_LENGTH: usize = 20;

/// Redraws allowed before falling back to drawing from the other faces only.
pub const MAX_REDRAWS: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Face {
    U,
    D,
    L,
    R,
    F,
    B,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::D, Face::L, Face::R, Face::F, Face::B];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Modifier {
    #[strum(serialize = "")]
    Clockwise,
    #[strum(serialize = "'")]
    Prime,
    #[strum(serialize = "2")]
    Double,
}

impl Modifier {
    pub const ALL: [Modifier; 3] = [Modifier::Clockwise, Modifier::Prime, Modifier::Double];
}

/// A single face turn in WCA notation, e.g. `R`, `U'`, `F2`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub face: Face,
    pub modifier: Modifier,
}

impl Move {
    pub fn new(face: Face, modifier: Modifier) -> Self {
        Self { face, modifier }
    }

    /// All 18 legal face turns of a 3x3x3 cube
    pub fn all() -> Vec<Move> {
        Face::ALL
            .iter()
            .cartesian_product(Modifier::ALL.iter())
            .map(|(&face, &modifier)| Move::new(face, modifier))
            .collect()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face, self.modifier)
    }
}

/// Ordered move sequence where no two adjacent moves turn the same face
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scramble {
    moves: Vec<Move>,
}

impl Scramble {
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl fmt::Display for Scramble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.moves.iter().join(" "))
    }
}

/// Produces random scrambles by rejection sampling over the 18 face turns
#[derive(Debug)]
pub struct ScrambleGenerator {
    rng: StdRng,
    moves: Vec<Move>,
}

impl ScrambleGenerator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic generator for reproducible sequences
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            moves: Move::all(),
        }
    }

    pub fn generate(&mut self, length: usize) -> Scramble {
        let mut moves: Vec<Move> = Vec::with_capacity(length);

        for _ in 0..length {
            let next = match moves.last() {
                Some(prev) => self.draw_avoiding(prev.face),
                None => self.draw(),
            };
            moves.push(next);
        }

        Scramble { moves }
    }

    fn draw(&mut self) -> Move {
        self.moves[self.rng.gen_range(0..self.moves.len())]
    }

    fn draw_avoiding(&mut self, face: Face) -> Move {
        for _ in 0..MAX_REDRAWS {
            let candidate = self.draw();
            if candidate.face != face {
                return candidate;
            }
        }

        // astronomically unlikely with a healthy rng, but keeps generation bounded
        let others: Vec<Move> = self
            .moves
            .iter()
            .copied()
            .filter(|m| m.face != face)
            .collect();
        others
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Move::new(Face::ALL[(face as usize + 1) % 6], Modifier::Clockwise))
    }
}

impl Default for ScrambleGenerator {
    fn default() -> Self {
        Self::new()
    }
}
