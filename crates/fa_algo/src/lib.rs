// crates/fa_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Ranked faction draft.
//!
//! `assign` is the single entry point: it checks the player cap, parses the
//! raw choice cells, then runs four rank rounds of bidding followed by the
//! leftover distribution. All randomness comes from the caller's
//! [`RandomSource`](fa_core::RandomSource).

use fa_core::Rank;
use thiserror::Error;

pub mod allocator;
pub mod bidding;

pub use allocator::{allocate, assign, parse_records, partition, AllocOutcome, LeftoverDraw};
pub use bidding::{Award, Bids, RankRound};

/// Fatal allocation errors. Both abort before any assignment work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error("too many players: got {got}, at most {max} allowed")]
    TooManyPlayers { got: usize, max: usize },

    #[error("invalid faction {value:?} for player {player} (choice {rank})")]
    InvalidFaction {
        player: String,
        rank: Rank,
        value: String,
    },
}
