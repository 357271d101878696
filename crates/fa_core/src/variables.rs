//! Run parameters with safe defaults and domain checks.
//!
//! Only two knobs exist: the player cap and the tie seed. The seed is echoed
//! in the run record so a draw can be replayed; it never changes which
//! inputs are valid.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::preference::MAX_PLAYERS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Params {
    /// Player cap, `1..=6`.
    pub max_players: usize,
    /// Seed for the tie RNG. `None` draws a fresh one per run.
    pub tie_seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_players: MAX_PLAYERS,
            tie_seed: None,
        }
    }
}

/// Reject out-of-domain values.
pub fn validate_domains(p: &Params) -> Result<(), CoreError> {
    if !(1..=MAX_PLAYERS).contains(&p.max_players) {
        return Err(CoreError::DomainOutOfRange("max_players"));
    }
    Ok(())
}
