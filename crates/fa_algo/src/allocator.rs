//! Allocator entry points and the leftover distribution.
//!
//! Contract:
//! - More than `max_players` rows (cap 6) → `TooManyPlayers`, nothing parsed.
//! - Any cell that is neither a faction nor a no-preference spelling →
//!   `InvalidFaction`, nothing assigned.
//! - Otherwise: partition, four rank rounds over the with-preference group,
//!   shuffle what is left, hand it to the without-preference group.

use std::collections::{BTreeMap, BTreeSet};

use fa_core::{
    Choice, Faction, PlayerName, PreferenceRecord, RandomSource, Rank, RawPreference, TieCrumb,
    MAX_PLAYERS, MAX_RANKS,
};
use log::{debug, info};

use crate::bidding::{collect_bids, resolve_bids, DraftState, RankRound};
use crate::AllocError;

/// What the leftover step did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeftoverDraw {
    /// Unclaimed factions after the rank rounds, in shuffled order.
    pub pool: Vec<Faction>,
    /// Pool entries handed out, in hand-out order.
    pub handed_out: Vec<(PlayerName, Faction)>,
}

impl LeftoverDraw {
    /// Pool entries nobody took.
    pub fn remaining(&self) -> &[Faction] {
        &self.pool[self.handed_out.len()..]
    }
}

/// Final map plus the audit trail of how it was reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocOutcome {
    /// Player → faction (or unassigned), sorted by player name.
    pub assignments: BTreeMap<PlayerName, Option<Faction>>,
    pub with_preference: Vec<PlayerName>,
    pub without_preference: Vec<PlayerName>,
    pub rounds: Vec<RankRound>,
    pub nullified: BTreeMap<PlayerName, BTreeSet<Rank>>,
    pub leftover: LeftoverDraw,
    pub tie_crumbs: Vec<TieCrumb>,
}

impl AllocOutcome {
    pub fn faction_of(&self, player: &str) -> Option<Faction> {
        self.assignments
            .iter()
            .find(|(p, _)| p.as_str() == player)
            .and_then(|(_, f)| *f)
    }

    pub fn unassigned(&self) -> impl Iterator<Item = &PlayerName> {
        self.assignments
            .iter()
            .filter(|(_, f)| f.is_none())
            .map(|(p, _)| p)
    }
}

/// Check the cap, parse every cell, then run the draft.
pub fn assign<R: RandomSource>(
    rows: &[RawPreference],
    max_players: usize,
    rng: &mut R,
) -> Result<AllocOutcome, AllocError> {
    let cap = max_players.min(MAX_PLAYERS);
    if rows.len() > cap {
        return Err(AllocError::TooManyPlayers { got: rows.len(), max: cap });
    }
    let records = parse_records(rows)?;
    Ok(allocate(&records, cap, rng))
}

/// Parse the four choice cells of every row. Cells past the fourth are not
/// part of the table and are ignored.
pub fn parse_records(rows: &[RawPreference]) -> Result<Vec<PreferenceRecord>, AllocError> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut choices = [Choice::NoPreference; MAX_RANKS];
        for rank in Rank::ALL {
            let cell = row.cell(rank);
            choices[rank.index()] =
                Choice::parse(cell).map_err(|_| AllocError::InvalidFaction {
                    player: row.name.to_string(),
                    rank,
                    value: cell.to_string(),
                })?;
        }
        out.push(PreferenceRecord::new(row.name.clone(), choices));
    }
    Ok(out)
}

/// Split into (with-preference, without-preference), input order kept.
/// The with group is capped first; the without group gets the remaining room.
pub fn partition(
    records: &[PreferenceRecord],
    max_players: usize,
) -> (Vec<&PreferenceRecord>, Vec<&PreferenceRecord>) {
    let with: Vec<&PreferenceRecord> = records
        .iter()
        .filter(|r| r.has_preference())
        .take(max_players)
        .collect();
    let room = max_players.saturating_sub(with.len());
    let without: Vec<&PreferenceRecord> = records
        .iter()
        .filter(|r| !r.has_preference())
        .take(room)
        .collect();
    (with, without)
}

/// Run the draft over already-parsed records. Never fails.
pub fn allocate<R: RandomSource>(
    records: &[PreferenceRecord],
    max_players: usize,
    rng: &mut R,
) -> AllocOutcome {
    let (with, without) = partition(records, max_players);
    let mut state = DraftState::new(with.iter().chain(without.iter()).map(|r| r.player.clone()));

    let mut rounds = Vec::with_capacity(MAX_RANKS);
    let mut tie_crumbs = Vec::new();
    for rank in Rank::ALL {
        let bids = collect_bids(&state, &with, rank);
        let resolved = resolve_bids(&bids, rank, rng);
        state.apply(&bids, &resolved);

        tie_crumbs.extend(resolved.awards.iter().filter_map(|a| a.crumb.clone()));
        rounds.push(RankRound {
            rank,
            unlocked: bids.unlocked,
            bids: bids.by_faction,
            awards: resolved.awards,
        });
    }

    let leftover = distribute_leftover(&mut state, &without, rng);

    let outcome = AllocOutcome {
        with_preference: with.iter().map(|r| r.player.clone()).collect(),
        without_preference: without.iter().map(|r| r.player.clone()).collect(),
        assignments: state.assignments,
        rounds,
        nullified: state.nullified,
        leftover,
        tie_crumbs,
    };
    info!(
        "draft done: {} assigned, {} unassigned, {} tie(s)",
        outcome.assignments.values().filter(|f| f.is_some()).count(),
        outcome.unassigned().count(),
        outcome.tie_crumbs.len()
    );
    outcome
}

/// Shuffle every still-available faction and deal it, front first, to the
/// without-preference players in input order. Locked expansions are not part
/// of the pool.
fn distribute_leftover<R: RandomSource>(
    state: &mut DraftState,
    without: &[&PreferenceRecord],
    rng: &mut R,
) -> LeftoverDraw {
    let mut pool = state.available.clone();
    rng.shuffle(&mut pool);
    debug!("leftover pool: {pool:?}");

    let mut handed_out = Vec::new();
    let mut deck = pool.iter().copied();
    for rec in without {
        if state.is_assigned(&rec.player) {
            continue;
        }
        let Some(f) = deck.next() else {
            debug!("leftover pool empty; {} stays unassigned", rec.player);
            break;
        };
        state.claim(&rec.player, f);
        handed_out.push((rec.player.clone(), f));
    }
    LeftoverDraw { pool, handed_out }
}
