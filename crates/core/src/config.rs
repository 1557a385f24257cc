//! Engine-level tunables shared by generation, hints, and play sessions.

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;

pub const DEFAULT_SEED_PREFIX: &str = "logic-looper-";
pub const DEFAULT_MAX_HINTS: u32 = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prepended to the date string to form the generation seed.
    pub seed_prefix: String,
    pub difficulty_modifier: f64,
    pub max_hints: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed_prefix: DEFAULT_SEED_PREFIX.to_string(),
            difficulty_modifier: 1.0,
            max_hints: DEFAULT_MAX_HINTS,
        }
    }
}

impl EngineConfig {
    pub fn with_difficulty_modifier(mut self, modifier: f64) -> Self {
        self.difficulty_modifier = modifier;
        self
    }

    pub fn validate(&self) -> Result<(), PuzzleError> {
        check_difficulty_modifier(self.difficulty_modifier)
    }
}

pub(crate) fn check_difficulty_modifier(modifier: f64) -> Result<(), PuzzleError> {
    if modifier.is_finite() && modifier >= 0.0 {
        Ok(())
    } else {
        Err(PuzzleError::InvalidDifficulty(modifier))
    }
}
