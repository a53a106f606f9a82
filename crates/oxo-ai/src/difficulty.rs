use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Chooses how many plies the search looks ahead for one move.
///
/// Implementations must never return more than `remaining_moves`; searching
/// past the last empty cell only repeats the same leaves.
pub trait DepthSelector {
    fn select_depth(&mut self, remaining_moves: usize) -> usize;
}

/// Always searches the same depth (clamped to the moves left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDepth(pub usize);

impl DepthSelector for FixedDepth {
    fn select_depth(&mut self, remaining_moves: usize) -> usize {
        usize::min(self.0, remaining_moves)
    }
}

/// Named playing strengths.
///
/// Each difficulty is a set of candidate search depths; one is drawn at
/// random for every move, so a game mixes stronger and weaker replies.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::FromStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[display("easy")]
    Easy,
    #[default]
    #[display("normal")]
    Normal,
    #[display("hard")]
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn candidate_depths(self) -> &'static [usize] {
        match self {
            Difficulty::Easy => &[1, 2],
            Difficulty::Normal => &[4, 6],
            Difficulty::Hard => &[9],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DepthSetError {
    #[display("candidate depth set is empty")]
    Empty,
    #[display("candidate depths must be at least 1")]
    ZeroDepth,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {_0:?}: expected 1 to 32 hex digits")]
pub struct ParseSeedError(#[error(not(source))] String);

/// Seed for deterministic depth selection.
///
/// Displayed and serialized as a 32-character hex string so that a recorded
/// game can be replayed with the same sequence of depths. Parsing accepts
/// shorter hex strings as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultySeed([u8; 16]);

impl DifficultySeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }
}

impl fmt::Display for DifficultySeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.to_u128())
    }
}

impl FromStr for DifficultySeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.len() > 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError(s.to_owned()));
        }
        u128::from_str_radix(s, 16)
            .map(Self::from_u128)
            .map_err(|_| ParseSeedError(s.to_owned()))
    }
}

impl Serialize for DifficultySeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DifficultySeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<DifficultySeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DifficultySeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        DifficultySeed(seed)
    }
}

/// Draws a search depth uniformly from a candidate set for every move.
///
/// The drawn depth is clamped to the number of empty cells, so near the end
/// of a game every difficulty searches to the end.
///
/// # Example
///
/// ```
/// use oxo_ai::{DepthSelector, Difficulty, DifficultySeed, DifficultySelector};
///
/// let seed = DifficultySeed::from_u128(42);
/// let mut selector = DifficultySelector::with_seed(Difficulty::Normal, seed);
///
/// let depth = selector.select_depth(9);
/// assert!(depth == 4 || depth == 6);
///
/// // Never deeper than the moves left
/// assert!(selector.select_depth(2) <= 2);
/// ```
#[derive(Debug, Clone)]
pub struct DifficultySelector {
    depths: Vec<usize>,
    seed: DifficultySeed,
    rng: Pcg32,
}

impl DifficultySelector {
    /// Creates a selector for `difficulty` with a random seed.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_seed(difficulty, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a reproducible depth sequence.
    #[must_use]
    pub fn with_seed(difficulty: Difficulty, seed: DifficultySeed) -> Self {
        Self {
            depths: difficulty.candidate_depths().to_vec(),
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Creates a selector drawing from a custom set of depths.
    pub fn from_depths<I>(depths: I, seed: DifficultySeed) -> Result<Self, DepthSetError>
    where
        I: IntoIterator<Item = usize>,
    {
        let depths: Vec<_> = depths.into_iter().collect();
        if depths.is_empty() {
            return Err(DepthSetError::Empty);
        }
        if depths.contains(&0) {
            return Err(DepthSetError::ZeroDepth);
        }
        Ok(Self {
            depths,
            seed,
            rng: Pcg32::from_seed(seed.0),
        })
    }

    #[must_use]
    pub fn candidate_depths(&self) -> &[usize] {
        &self.depths
    }

    #[must_use]
    pub fn seed(&self) -> DifficultySeed {
        self.seed
    }
}

impl DepthSelector for DifficultySelector {
    fn select_depth(&mut self, remaining_moves: usize) -> usize {
        let candidate = self.depths[self.rng.random_range(0..self.depths.len())];
        usize::min(candidate, remaining_moves)
    }
}
