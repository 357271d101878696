//! One rank round: collect bids, resolve them, fold the result into state.
//!
//! Each pass is split into two pure steps (`collect_bids`, `resolve_bids`)
//! and one explicit update (`DraftState::apply`). Tie losers are recorded as
//! nullified `(player, rank)` pairs instead of editing their records.

use std::collections::{BTreeMap, BTreeSet};

use fa_core::{Faction, PlayerName, PreferenceRecord, RandomSource, Rank, TieCrumb};
use log::debug;

/// A faction handed to a player in a rank round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Award {
    pub faction: Faction,
    pub player: PlayerName,
    pub rank: Rank,
    /// Every bidder for `faction` at `rank`, input order. Length 1 = uncontested.
    pub contenders: Vec<PlayerName>,
    /// Present iff the award was decided by the RNG.
    pub crumb: Option<TieCrumb>,
}

impl Award {
    #[inline]
    pub fn contested(&self) -> bool {
        self.contenders.len() > 1
    }
}

/// Bids gathered for one rank, before resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bids {
    /// Expansion factions first named during this pass, in the order named.
    pub unlocked: Vec<Faction>,
    /// Faction → bidders (input order). Iterates in catalog order.
    pub by_faction: BTreeMap<Faction, Vec<PlayerName>>,
}

/// Audit record of one rank round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankRound {
    pub rank: Rank,
    pub unlocked: Vec<Faction>,
    pub bids: BTreeMap<Faction, Vec<PlayerName>>,
    pub awards: Vec<Award>,
}

/// Output of `resolve_bids`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ResolvedRank {
    pub awards: Vec<Award>,
    pub nullified: Vec<(PlayerName, Rank)>,
}

/// Mutable draft state, touched only through `apply` and `claim`.
#[derive(Clone, Debug)]
pub(crate) struct DraftState {
    /// Biddable factions: base first (catalog order), unlocks appended.
    pub available: Vec<Faction>,
    pub claimed: BTreeSet<Faction>,
    pub assignments: BTreeMap<PlayerName, Option<Faction>>,
    pub nullified: BTreeMap<PlayerName, BTreeSet<Rank>>,
}

impl DraftState {
    pub fn new<I: IntoIterator<Item = PlayerName>>(players: I) -> Self {
        Self {
            available: Faction::BASE.to_vec(),
            claimed: BTreeSet::new(),
            assignments: players.into_iter().map(|p| (p, None)).collect(),
            nullified: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn is_assigned(&self, p: &PlayerName) -> bool {
        matches!(self.assignments.get(p), Some(Some(_)))
    }

    #[inline]
    pub fn is_nullified(&self, p: &PlayerName, rank: Rank) -> bool {
        self.nullified.get(p).is_some_and(|rs| rs.contains(&rank))
    }

    /// Open for bids: currently available, or an expansion nobody has claimed.
    #[inline]
    pub fn is_biddable(&self, f: Faction) -> bool {
        self.available.contains(&f) || (f.is_expansion() && !self.claimed.contains(&f))
    }

    /// Give `f` to `p` and retire it for good.
    pub fn claim(&mut self, p: &PlayerName, f: Faction) {
        self.assignments.insert(p.clone(), Some(f));
        self.available.retain(|x| *x != f);
        self.claimed.insert(f);
    }

    /// Fold one resolved rank into the state.
    pub fn apply(&mut self, bids: &Bids, resolved: &ResolvedRank) {
        for f in &bids.unlocked {
            if !self.available.contains(f) && !self.claimed.contains(f) {
                self.available.push(*f);
            }
        }
        for a in &resolved.awards {
            self.claim(&a.player, a.faction);
        }
        for (p, r) in &resolved.nullified {
            self.nullified.entry(p.clone()).or_default().insert(*r);
        }
    }
}

/// Gather the bids of every still-unassigned player at `rank`.
///
/// An expansion faction named for the first time is unlocked on the spot and
/// stays biddable for the rest of the pass.
pub(crate) fn collect_bids(state: &DraftState, group: &[&PreferenceRecord], rank: Rank) -> Bids {
    let mut bids = Bids::default();
    for rec in group {
        if state.is_assigned(&rec.player) || state.is_nullified(&rec.player, rank) {
            continue;
        }
        let Some(faction) = rec.choice(rank).faction() else {
            continue;
        };
        if !state.is_biddable(faction) {
            debug!("rank {rank}: {} names {faction}, no longer available", rec.player);
            continue;
        }
        if !state.available.contains(&faction) && !bids.unlocked.contains(&faction) {
            debug!("rank {rank}: {faction} unlocked by {}", rec.player);
            bids.unlocked.push(faction);
        }
        bids.by_faction.entry(faction).or_default().push(rec.player.clone());
    }
    bids
}

/// Resolve bids in catalog order. A sole bidder wins without touching the
/// RNG; contested factions draw one winner uniformly and nullify this rank
/// for every loser.
pub(crate) fn resolve_bids<R: RandomSource>(bids: &Bids, rank: Rank, rng: &mut R) -> ResolvedRank {
    let mut out = ResolvedRank::default();
    for (&faction, bidders) in &bids.by_faction {
        let (winner_ix, crumb) = match bidders.len() {
            0 => continue,
            1 => (0, None),
            n => {
                let ctx = format!("rank:{rank}/{faction}");
                let crumb = rng.pick(&ctx, n).unwrap_or(TieCrumb {
                    ctx,
                    pick: 0,
                    word_index: rng.words_consumed(),
                });
                (crumb.pick.min(n - 1), Some(crumb))
            }
        };

        let winner = bidders[winner_ix].clone();
        debug!(
            "rank {rank}: {faction} -> {winner} ({} bidder{})",
            bidders.len(),
            if bidders.len() == 1 { "" } else { "s" }
        );
        for (i, loser) in bidders.iter().enumerate() {
            if i != winner_ix {
                out.nullified.push((loser.clone(), rank));
            }
        }
        out.awards.push(Award {
            faction,
            player: winner,
            rank,
            contenders: bidders.clone(),
            crumb,
        });
    }
    out
}
