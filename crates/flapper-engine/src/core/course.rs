use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::GameConfig;

/// Seed for deterministic pipe courses.
///
/// A 128-bit seed, serialized as a 32-character lowercase hex string. Two
/// episodes built from the same seed and config see the same sequence of gap
/// heights.
///
/// # Example
///
/// ```
/// use flapper_engine::{CourseSeed, GameConfig, PipeCourse};
/// use rand::Rng as _;
///
/// let seed: CourseSeed = rand::rng().random();
/// let config = GameConfig::default();
/// let mut a = PipeCourse::new(seed);
/// let mut b = PipeCourse::new(seed);
/// assert_eq!(a.next_gap_top(&config), b.next_gap_top(&config));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseSeed([u8; 16]);

impl CourseSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl Serialize for CourseSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for CourseSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid course seed: expected 32 hex characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16).map_err(|e| {
            serde::de::Error::custom(format!("invalid course seed: {hex_str} ({e})"))
        })?;
        Ok(Self::from_u128(num))
    }
}

impl Distribution<CourseSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CourseSeed {
        CourseSeed(rng.random())
    }
}

/// Source of gap heights for newly spawned pipes.
#[derive(Debug, Clone)]
pub struct PipeCourse {
    seed: CourseSeed,
    rng: Pcg32,
}

impl PipeCourse {
    #[must_use]
    pub fn new(seed: CourseSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> CourseSeed {
        self.seed
    }

    /// Draws the next gap top uniformly from `gap_top_min..gap_top_max`.
    pub fn next_gap_top(&mut self, config: &GameConfig) -> i32 {
        self.rng
            .random_range(config.gap_top_min..config.gap_top_max)
    }
}
