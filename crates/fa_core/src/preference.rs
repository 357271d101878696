//! Players, ranks, choices and preference records.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::faction::Faction;

/// Hard cap on processed players per run.
pub const MAX_PLAYERS: usize = 6;

/// Number of ranked choice columns per player.
pub const MAX_RANKS: usize = 4;

/// Accepted spellings of "no preference" (compared case-insensitively, trimmed).
pub const NO_PREFERENCE_TOKENS: [&str; 5] = ["", "-", "none", "no preference", "any"];

/// True if `s` spells the no-preference sentinel.
pub fn is_no_preference(s: &str) -> bool {
    let s = s.trim();
    NO_PREFERENCE_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(s))
}

/* -------------------------------------------------------------------------- */
/*                                 PlayerName                                 */
/* -------------------------------------------------------------------------- */

/// Player identifier; unique within a run. Ordering is lexicographic and is
/// the presentation order of the final map.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: impl AsRef<str>) -> Result<Self, CoreError> {
        let s = s.as_ref().trim();
        if s.is_empty() {
            return Err(CoreError::EmptyPlayerName);
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PlayerName {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerName::new(s)
    }
}

impl TryFrom<String> for PlayerName {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        PlayerName::new(s)
    }
}

impl From<PlayerName> for String {
    fn from(p: PlayerName) -> String {
        p.0
    }
}

/* -------------------------------------------------------------------------- */
/*                                    Rank                                    */
/* -------------------------------------------------------------------------- */

/// 1-based preference rank (1 = most preferred).
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Rank(u8);

impl Rank {
    /// Ranks in processing order.
    pub const ALL: [Rank; MAX_RANKS] = [Rank(1), Rank(2), Rank(3), Rank(4)];

    pub fn new(r: u8) -> Result<Self, CoreError> {
        if (1..=MAX_RANKS as u8).contains(&r) {
            Ok(Self(r))
        } else {
            Err(CoreError::InvalidRank(r))
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// 0-based column index.
    #[inline]
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/* -------------------------------------------------------------------------- */
/*                                   Choice                                   */
/* -------------------------------------------------------------------------- */

/// One parsed choice cell.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub enum Choice {
    Faction(Faction),
    #[default]
    NoPreference,
}

impl Choice {
    /// Parse a raw cell: a catalog faction (any casing) or a no-preference
    /// spelling. Anything else is `UnknownFaction`.
    pub fn parse(raw: &str) -> Result<Choice, CoreError> {
        if is_no_preference(raw) {
            return Ok(Choice::NoPreference);
        }
        raw.parse::<Faction>().map(Choice::Faction)
    }

    #[inline]
    pub fn faction(self) -> Option<Faction> {
        match self {
            Choice::Faction(f) => Some(f),
            Choice::NoPreference => None,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Faction(x) => f.write_str(x.name()),
            Choice::NoPreference => f.write_str("-"),
        }
    }
}

/* -------------------------------------------------------------------------- */
/*                               Records (raw/typed)                          */
/* -------------------------------------------------------------------------- */

/// Row shape handed over by the table loader: a validated name plus up to
/// four raw choice cells, unparsed.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawPreference {
    pub name: PlayerName,
    #[cfg_attr(feature = "serde", serde(default))]
    pub choices: Vec<String>,
}

impl RawPreference {
    pub fn new<I, S>(name: PlayerName, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name,
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// Raw cell at `rank`; missing trailing cells read as empty.
    pub fn cell(&self, rank: Rank) -> &str {
        self.choices.get(rank.index()).map(String::as_str).unwrap_or("")
    }
}

/// A validated preference record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PreferenceRecord {
    pub player: PlayerName,
    pub choices: [Choice; MAX_RANKS],
}

impl PreferenceRecord {
    /// Build from up to `MAX_RANKS` choices; missing ones are `NoPreference`,
    /// extras are dropped.
    pub fn new(player: PlayerName, choices: impl IntoIterator<Item = Choice>) -> Self {
        let mut out = [Choice::NoPreference; MAX_RANKS];
        for (slot, c) in out.iter_mut().zip(choices) {
            *slot = c;
        }
        Self { player, choices: out }
    }

    #[inline]
    pub fn choice(&self, rank: Rank) -> Choice {
        self.choices[rank.index()]
    }

    /// With-preference iff the first choice names a faction.
    #[inline]
    pub fn has_preference(&self) -> bool {
        self.choice(Rank::ALL[0]) != Choice::NoPreference
    }
}
