//! The closed faction catalog.
//!
//! Ten factions, partitioned into six **base** factions (always biddable) and
//! four **expansion** factions (biddable only once someone names them).
//! Declaration order is the catalog order; `Ord` follows it, so a
//! `BTreeMap<Faction, _>` iterates base factions first, then expansions.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Which part of the catalog a faction belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FactionSet {
    Base,
    Expansion,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Faction {
    // base
    Atreides,
    #[cfg_attr(feature = "serde", serde(rename = "Bene Gesserit"))]
    BeneGesserit,
    Emperor,
    Fremen,
    Harkonnen,
    #[cfg_attr(feature = "serde", serde(rename = "Spacing Guild"))]
    SpacingGuild,
    // expansion
    Choam,
    Ixian,
    Richese,
    Tleilaxu,
}

impl Faction {
    /// Every faction in catalog order.
    pub const ALL: [Faction; 10] = [
        Faction::Atreides,
        Faction::BeneGesserit,
        Faction::Emperor,
        Faction::Fremen,
        Faction::Harkonnen,
        Faction::SpacingGuild,
        Faction::Choam,
        Faction::Ixian,
        Faction::Richese,
        Faction::Tleilaxu,
    ];

    /// Always available from the first rank onward.
    pub const BASE: [Faction; 6] = [
        Faction::Atreides,
        Faction::BeneGesserit,
        Faction::Emperor,
        Faction::Fremen,
        Faction::Harkonnen,
        Faction::SpacingGuild,
    ];

    /// Unlocked by the first bid that names them.
    pub const EXPANSION: [Faction; 4] = [
        Faction::Choam,
        Faction::Ixian,
        Faction::Richese,
        Faction::Tleilaxu,
    ];

    /// Canonical (catalog) spelling.
    pub const fn name(self) -> &'static str {
        match self {
            Faction::Atreides => "Atreides",
            Faction::BeneGesserit => "Bene Gesserit",
            Faction::Emperor => "Emperor",
            Faction::Fremen => "Fremen",
            Faction::Harkonnen => "Harkonnen",
            Faction::SpacingGuild => "Spacing Guild",
            Faction::Choam => "Choam",
            Faction::Ixian => "Ixian",
            Faction::Richese => "Richese",
            Faction::Tleilaxu => "Tleilaxu",
        }
    }

    pub const fn set(self) -> FactionSet {
        match self {
            Faction::Choam | Faction::Ixian | Faction::Richese | Faction::Tleilaxu => {
                FactionSet::Expansion
            }
            _ => FactionSet::Base,
        }
    }

    #[inline]
    pub const fn is_expansion(self) -> bool {
        matches!(self.set(), FactionSet::Expansion)
    }

    /// Case-insensitive lookup by name; surrounding whitespace is ignored.
    pub fn from_name_ci(s: &str) -> Option<Faction> {
        let s = s.trim();
        Faction::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Faction {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Faction::from_name_ci(s).ok_or_else(|| CoreError::UnknownFaction(s.into()))
    }
}
