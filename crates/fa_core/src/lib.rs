//! fa_core: Core types for the faction draft.
//!
//! This crate is **I/O-free**. It defines the stable types shared by the
//! workspace (`fa_io`, `fa_algo`, `fa_pipeline`, `fa_report`, `fa_cli`):
//!
//! - The closed faction catalog (6 base + 4 expansion factions)
//! - Choices, ranks, player names and preference records
//! - `Params` (max players, tie seed) with domain checks
//! - Seedable RNG (ChaCha20) for **ties and the leftover shuffle only**
//!
//! Serialization derives are gated behind the `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod faction;
pub mod preference;
pub mod rng;
pub mod variables;

pub mod errors {
    use alloc::string::String;
    use core::fmt;

    /// Minimal error set for core-domain parsing & validation.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum CoreError {
        /// Text is neither a catalog faction nor a no-preference spelling.
        UnknownFaction(String),
        /// Player names must be non-empty after trimming.
        EmptyPlayerName,
        /// Rank outside `1..=MAX_RANKS`.
        InvalidRank(u8),
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::UnknownFaction(s) => write!(f, "unknown faction: {s:?}"),
                CoreError::EmptyPlayerName => write!(f, "empty player name"),
                CoreError::InvalidRank(r) => write!(f, "invalid rank: {r}"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub use errors::CoreError;
pub use faction::{Faction, FactionSet};
pub use preference::{Choice, PlayerName, PreferenceRecord, Rank, RawPreference, MAX_PLAYERS, MAX_RANKS};
pub use rng::{RandomSource, TieCrumb, TieRng};
pub use variables::Params;
