//! crates/fa_pipeline/src/validate.rs
//! Structural checks on the loaded table before any allocation.
//! Deterministic outputs; no RNG.
//!
//! Errors here mirror the allocator's fatal errors so `--validate-only` can
//! report every bad cell at once instead of stopping at the first one.

use std::collections::BTreeSet;

use fa_core::{
    preference::is_no_preference,
    variables::{validate_domains, Params},
    Choice, Faction, RawPreference, Rank, MAX_PLAYERS, MAX_RANKS,
};
use serde::Serialize;

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityRef {
    Root,
    Param { name: &'static str },
    Player { player: String },
    Cell { player: String, rank: u8 },
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityRef::Root => f.write_str("table"),
            EntityRef::Param { name } => write!(f, "param {name}"),
            EntityRef::Player { player } => write!(f, "player {player}"),
            EntityRef::Cell { player, rank } => write!(f, "player {player}, choice {rank}"),
        }
    }
}

/// One validation finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    #[serde(rename = "where")]
    pub where_: EntityRef,
}

/// Deterministic report: pass = (no Error); ordering of issues is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

/// Top-level entry point.
pub fn validate(rows: &[RawPreference], params: &Params) -> ValidationReport {
    let mut issues: Vec<ValidationIssue> = Vec::new();

    issues.extend(check_params(params));
    issues.extend(check_player_count(rows, params));
    for row in rows {
        issues.extend(check_row(row));
    }

    sort_issues_stably(&mut issues);
    ValidationReport {
        pass: !issues.iter().any(|i| i.severity == Severity::Error),
        issues,
    }
}

// ------------------------------------------------------------------------------------------------
// Checks
// ------------------------------------------------------------------------------------------------

fn check_params(p: &Params) -> Vec<ValidationIssue> {
    match validate_domains(p) {
        Ok(()) => Vec::new(),
        Err(e) => vec![ValidationIssue {
            severity: Severity::Error,
            code: "Param.OutOfDomain",
            message: format!("{e} (got {}, allowed 1..={MAX_PLAYERS})", p.max_players),
            where_: EntityRef::Param { name: "max_players" },
        }],
    }
}

fn check_player_count(rows: &[RawPreference], p: &Params) -> Vec<ValidationIssue> {
    let cap = p.max_players.min(MAX_PLAYERS);
    if rows.len() <= cap {
        return Vec::new();
    }
    vec![ValidationIssue {
        severity: Severity::Error,
        code: "Player.TooMany",
        message: format!("{} players in table, at most {cap} allowed", rows.len()),
        where_: EntityRef::Root,
    }]
}

/// Errors:
/// - "Choice.Unknown" for a cell that is neither a faction nor a sentinel
///
/// Warnings:
/// - "Choice.NonCanonicalCase", "Choice.Repeated",
///   "Choice.IgnoredAfterNoPreference", "Choice.TooMany"
fn check_row(row: &RawPreference) -> Vec<ValidationIssue> {
    let player = row.name.to_string();
    let mut issues = Vec::new();

    if row.choices.len() > MAX_RANKS {
        issues.push(ValidationIssue {
            severity: Severity::Warning,
            code: "Choice.TooMany",
            message: format!(
                "{} choices given, only the first {MAX_RANKS} are used",
                row.choices.len()
            ),
            where_: EntityRef::Player { player: player.clone() },
        });
    }

    let mut seen: BTreeSet<Faction> = BTreeSet::new();
    let mut named_after_sentinel = false;
    for rank in Rank::ALL {
        let cell = row.cell(rank);
        let at = || EntityRef::Cell { player: player.clone(), rank: rank.get() };
        match Choice::parse(cell) {
            Err(_) => issues.push(ValidationIssue {
                severity: Severity::Error,
                code: "Choice.Unknown",
                message: format!("{:?} is not a faction", cell.trim()),
                where_: at(),
            }),
            Ok(Choice::NoPreference) => {}
            Ok(Choice::Faction(f)) => {
                if cell.trim() != f.name() {
                    issues.push(ValidationIssue {
                        severity: Severity::Warning,
                        code: "Choice.NonCanonicalCase",
                        message: format!("{:?} read as {:?}", cell.trim(), f.name()),
                        where_: at(),
                    });
                }
                if !seen.insert(f) {
                    issues.push(ValidationIssue {
                        severity: Severity::Warning,
                        code: "Choice.Repeated",
                        message: format!("{f} already chosen at a higher rank"),
                        where_: at(),
                    });
                }
                if rank != Rank::ALL[0] && is_no_preference(row.cell(Rank::ALL[0])) {
                    named_after_sentinel = true;
                }
            }
        }
    }

    if named_after_sentinel {
        issues.push(ValidationIssue {
            severity: Severity::Warning,
            code: "Choice.IgnoredAfterNoPreference",
            message: "first choice is no preference; later choices are ignored and the \
                      player draws from the leftover pool"
                .to_string(),
            where_: EntityRef::Player { player },
        });
    }
    issues
}

// ------------------------------------------------------------------------------------------------
// Utilities
// ------------------------------------------------------------------------------------------------

/// Sort by code, then where, then message.
fn sort_issues_stably(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| {
        a.code
            .cmp(b.code)
            .then_with(|| a.where_.cmp(&b.where_))
            .then_with(|| a.message.cmp(&b.message))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use fa_core::PlayerName;

    fn raw(name: &str, cells: &[&str]) -> RawPreference {
        RawPreference::new(PlayerName::new(name).unwrap(), cells.iter().copied())
    }

    fn codes(r: &ValidationReport) -> Vec<&'static str> {
        r.issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn clean_table_passes() {
        let rows = [
            raw("Alice", &["Atreides", "Harkonnen", "-", "-"]),
            raw("Bob", &["Atreides", "Fremen", "-", "-"]),
        ];
        let r = validate(&rows, &Params::default());
        assert!(r.pass);
        assert!(r.issues.is_empty());
    }

    #[test]
    fn unknown_cells_are_all_reported() {
        let rows = [raw("A", &["Mentats", "Fremen", "Sardaukar"])];
        let r = validate(&rows, &Params::default());
        assert!(!r.pass);
        assert_eq!(r.errors().count(), 2);
        assert_eq!(
            r.issues[0].where_,
            EntityRef::Cell { player: "A".into(), rank: 1 }
        );
    }

    #[test]
    fn too_many_players_respects_the_configured_cap() {
        let rows: Vec<_> = (0..4).map(|i| raw(&format!("P{i}"), &["-"])).collect();
        assert!(validate(&rows, &Params::default()).pass);
        let r = validate(&rows, &Params { max_players: 3, tie_seed: None });
        assert_eq!(codes(&r), vec!["Player.TooMany"]);
    }

    #[test]
    fn warnings_do_not_fail_the_report() {
        let rows = [
            raw("A", &["fremen", "Fremen"]),
            raw("B", &["-", "Ixian"]),
            raw("C", &["Emperor", "-", "-", "-", "Choam"]),
        ];
        let r = validate(&rows, &Params::default());
        assert!(r.pass);
        assert_eq!(
            codes(&r),
            vec![
                "Choice.IgnoredAfterNoPreference",
                "Choice.NonCanonicalCase",
                "Choice.Repeated",
                "Choice.TooMany",
            ]
        );
        assert_eq!(r.warnings().count(), 4);
    }

    #[test]
    fn bad_param_is_an_error() {
        let r = validate(&[], &Params { max_players: 0, tie_seed: None });
        assert_eq!(codes(&r), vec!["Param.OutOfDomain"]);
        assert!(!r.pass);
    }
}
