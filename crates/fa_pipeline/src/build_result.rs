//! build_result.rs
//! Assemble the two artifacts of a run from an `AllocOutcome`:
//! - `AssignmentDoc` (the final map, `ASG:<sha256>`)
//! - `RunRecordDoc` (inputs echo + audit trail, `RUN:<sha256>`)
//!
//! Ids are the SHA-256 of the canonical JSON of the doc without its `id`.
//! Every list is in a fixed order, so the same draw yields the same bytes.

use std::collections::BTreeMap;

use fa_algo::{AllocOutcome, RankRound};
use fa_core::{Faction, TieCrumb};
use fa_io::hasher;
use serde::{Deserialize, Serialize};

use crate::allocate::SeedSource;
use crate::{EngineMeta, PipelineError};

/* ---------------------------------- Assignment ---------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub player: String,
    pub faction: Option<Faction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDoc {
    pub id: String, // "ASG:<hex64>"
    /// Sorted by player name.
    pub assignments: Vec<AssignmentRow>,
    pub unassigned: Vec<String>,
    /// Unclaimed factions after the draft, in shuffled pool order.
    pub leftover: Vec<Faction>,
}

/* ---------------------------------- Run record ---------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardEcho {
    pub faction: Faction,
    pub player: String,
    pub contested: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub crumb: Option<TieCrumb>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEcho {
    pub rank: u8,
    pub unlocked: Vec<Faction>,
    /// Faction name → bidders in input order.
    pub bids: BTreeMap<String, Vec<String>>,
    pub awards: Vec<AwardEcho>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandOut {
    pub player: String,
    pub faction: Faction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecordDoc {
    pub id: String, // "RUN:<hex64>"
    pub engine: EngineMeta,
    pub input_sha256: String,
    pub max_players: usize,
    pub tie_seed: u64,
    pub tie_seed_source: String,
    pub with_preference: Vec<String>,
    pub without_preference: Vec<String>,
    pub rounds: Vec<RoundEcho>,
    /// Player → ranks lost to a tie.
    pub nullified: BTreeMap<String, Vec<u8>>,
    pub leftover_pool: Vec<Faction>,
    pub handed_out: Vec<HandOut>,
    pub tie_crumbs: Vec<TieCrumb>,
    pub result_id: String,
}

/// Inputs echoed into the run record.
#[derive(Debug, Clone)]
pub struct RunEcho<'a> {
    pub engine: &'a EngineMeta,
    pub input_sha256: &'a str,
    pub max_players: usize,
    pub tie_seed: u64,
    pub seed_source: SeedSource,
}

/* ---------------------------------- Builders ---------------------------------- */

pub fn build_assignment(outcome: &AllocOutcome) -> Result<AssignmentDoc, PipelineError> {
    let mut doc = AssignmentDoc {
        id: String::new(),
        assignments: outcome
            .assignments
            .iter()
            .map(|(p, f)| AssignmentRow { player: p.to_string(), faction: *f })
            .collect(),
        unassigned: outcome.unassigned().map(|p| p.to_string()).collect(),
        leftover: outcome.leftover.remaining().to_vec(),
    };
    doc.id = hasher::asg_id(&doc).map_err(|e| PipelineError::Build(e.to_string()))?;
    Ok(doc)
}

pub fn build_run_record(
    outcome: &AllocOutcome,
    echo: &RunEcho<'_>,
    result_id: &str,
) -> Result<RunRecordDoc, PipelineError> {
    let names = |xs: &[fa_core::PlayerName]| xs.iter().map(|p| p.to_string()).collect::<Vec<_>>();
    let mut doc = RunRecordDoc {
        id: String::new(),
        engine: echo.engine.clone(),
        input_sha256: echo.input_sha256.to_string(),
        max_players: echo.max_players,
        tie_seed: echo.tie_seed,
        tie_seed_source: match echo.seed_source {
            SeedSource::Params => "params".into(),
            SeedSource::Entropy => "entropy".into(),
        },
        with_preference: names(&outcome.with_preference),
        without_preference: names(&outcome.without_preference),
        rounds: outcome.rounds.iter().map(round_echo).collect(),
        nullified: outcome
            .nullified
            .iter()
            .map(|(p, ranks)| (p.to_string(), ranks.iter().map(|r| r.get()).collect()))
            .collect(),
        leftover_pool: outcome.leftover.pool.clone(),
        handed_out: outcome
            .leftover
            .handed_out
            .iter()
            .map(|(p, f)| HandOut { player: p.to_string(), faction: *f })
            .collect(),
        tie_crumbs: outcome.tie_crumbs.clone(),
        result_id: result_id.to_string(),
    };
    doc.id = hasher::run_id(&doc).map_err(|e| PipelineError::Build(e.to_string()))?;
    Ok(doc)
}

fn round_echo(r: &RankRound) -> RoundEcho {
    RoundEcho {
        rank: r.rank.get(),
        unlocked: r.unlocked.clone(),
        bids: r
            .bids
            .iter()
            .map(|(f, ps)| (f.name().to_string(), ps.iter().map(|p| p.to_string()).collect()))
            .collect(),
        awards: r
            .awards
            .iter()
            .map(|a| AwardEcho {
                faction: a.faction,
                player: a.player.to_string(),
                contested: a.contested(),
                crumb: a.crumb.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_identifiers;
    use fa_algo::assign;
    use fa_core::{PlayerName, RawPreference, TieRng};

    fn outcome(seed: u64) -> AllocOutcome {
        let rows = [
            RawPreference::new(PlayerName::new("Alice").unwrap(), ["Atreides", "Harkonnen"]),
            RawPreference::new(PlayerName::new("Bob").unwrap(), ["Atreides", "Fremen"]),
            RawPreference::new(PlayerName::new("Cy").unwrap(), ["-"]),
        ];
        assign(&rows, 6, &mut TieRng::from_seed_u64(seed)).unwrap()
    }

    #[test]
    fn assignment_doc_is_sorted_and_self_hashed() {
        let doc = build_assignment(&outcome(1)).unwrap();
        let players: Vec<&str> = doc.assignments.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(players, vec!["Alice", "Bob", "Cy"]);
        assert!(doc.unassigned.is_empty());
        assert_eq!(doc.leftover.len(), 3);
        assert!(hasher::is_valid_id(hasher::ASG_PREFIX, &doc.id));
        assert_eq!(doc.id, hasher::asg_id(&doc).unwrap());
    }

    #[test]
    fn run_record_echoes_the_draw() {
        let out = outcome(5);
        let engine = engine_identifiers();
        let asg = build_assignment(&out).unwrap();
        let echo = RunEcho {
            engine: &engine,
            input_sha256: "00",
            max_players: 6,
            tie_seed: 5,
            seed_source: SeedSource::Params,
        };
        let run = build_run_record(&out, &echo, &asg.id).unwrap();
        assert_eq!(run.result_id, asg.id);
        assert_eq!(run.rounds.len(), 4);
        assert_eq!(run.rounds[0].bids["Atreides"], vec!["Alice", "Bob"]);
        assert!(run.rounds[0].awards[0].contested);
        assert_eq!(run.tie_crumbs.len(), 1);
        assert_eq!(run.nullified.values().next(), Some(&vec![1u8]));
        assert_eq!(run.handed_out.len(), 1);
        assert!(hasher::is_valid_id(hasher::RUN_PREFIX, &run.id));

        let again = build_run_record(&outcome(5), &echo, &asg.id).unwrap();
        assert_eq!(run.id, again.id);
    }

    #[test]
    fn factions_serialize_by_display_name() {
        let row = AssignmentRow { player: "Ann".into(), faction: Some(Faction::BeneGesserit) };
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"player":"Ann","faction":"Bene Gesserit"}"#
        );
        let none = AssignmentRow { player: "Bo".into(), faction: None };
        assert!(serde_json::to_string(&none).unwrap().ends_with(r#""faction":null}"#));
    }
}
