//! fa_report/src/lib.rs: Offline report model + renderers (text/Markdown/JSON).
//!
//! Rules:
//! - No I/O here. Callers pass artifacts already parsed as `serde_json::Value`.
//! - No recomputation: the model echoes the assignment doc (and, optionally,
//!   the run record's integrity fields). Intermediate draft state is never
//!   shown.
//! - Row order is the artifact's order (sorted by player name upstream).

#![deny(unsafe_code)]

use std::fmt;

use serde::Serialize;
use serde_json::Value;

pub mod render_json;
pub mod render_markdown;
pub mod render_text;

pub use render_json::render_json;
pub use render_markdown::render_markdown;
pub use render_text::render_text;

// ---- Artifact type aliases (loosely-coupled) ----
pub type AssignmentArtifact = Value;
pub type RunRecordArtifact = Value;

// ===== Errors =====
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    MissingField(&'static str),
    Inconsistent(&'static str),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::MissingField(p) => write!(f, "artifact is missing {p}"),
            ReportError::Inconsistent(m) => write!(f, "artifacts disagree: {m}"),
        }
    }
}

impl std::error::Error for ReportError {}

// ===== Model =====
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportModel {
    pub rows: Vec<ReportRow>,
    pub unassigned: Vec<String>,
    pub leftover: Vec<String>,
    pub integrity: Option<Integrity>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub player: String,
    pub faction: Option<String>,
}

/// Footer ids, present only when a run record is supplied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Integrity {
    pub assignment_id: String,
    pub run_id: String,
    pub input_sha256: String,
    pub tie_seed: u64,
}

/// Output formats understood by the renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderFormat {
    Text,
    Markdown,
    Json,
}

/// Helper: string at JSON Pointer.
#[inline]
pub fn j_str(v: &Value, ptr: &str) -> Option<String> {
    v.pointer(ptr).and_then(Value::as_str).map(str::to_string)
}

/// Helper: integer at JSON Pointer.
#[inline]
pub fn j_u64(v: &Value, ptr: &str) -> Option<u64> {
    v.pointer(ptr).and_then(Value::as_u64)
}

fn j_str_list(v: &Value, ptr: &'static str) -> Result<Vec<String>, ReportError> {
    let arr = v
        .pointer(ptr)
        .and_then(Value::as_array)
        .ok_or(ReportError::MissingField(ptr))?;
    Ok(arr.iter().filter_map(Value::as_str).map(str::to_string).collect())
}

/// Build the model from the assignment doc and, if given, the run record.
pub fn build_model(
    assignment: &AssignmentArtifact,
    run: Option<&RunRecordArtifact>,
) -> Result<ReportModel, ReportError> {
    let rows = assignment
        .pointer("/assignments")
        .and_then(Value::as_array)
        .ok_or(ReportError::MissingField("/assignments"))?
        .iter()
        .map(|row| {
            Ok(ReportRow {
                player: j_str(row, "/player").ok_or(ReportError::MissingField("/assignments/*/player"))?,
                faction: j_str(row, "/faction"),
            })
        })
        .collect::<Result<Vec<_>, ReportError>>()?;

    let integrity = match run {
        None => None,
        Some(run) => Some(map_integrity(assignment, run)?),
    };

    Ok(ReportModel {
        rows,
        unassigned: j_str_list(assignment, "/unassigned")?,
        leftover: j_str_list(assignment, "/leftover")?,
        integrity,
    })
}

fn map_integrity(assignment: &Value, run: &Value) -> Result<Integrity, ReportError> {
    let assignment_id = j_str(assignment, "/id").ok_or(ReportError::MissingField("/id"))?;
    let result_id = j_str(run, "/result_id").ok_or(ReportError::MissingField("/result_id"))?;
    if result_id != assignment_id {
        return Err(ReportError::Inconsistent("run record points at another assignment"));
    }
    Ok(Integrity {
        assignment_id,
        run_id: j_str(run, "/id").ok_or(ReportError::MissingField("/id"))?,
        input_sha256: j_str(run, "/input_sha256").ok_or(ReportError::MissingField("/input_sha256"))?,
        tie_seed: j_u64(run, "/tie_seed").ok_or(ReportError::MissingField("/tie_seed"))?,
    })
}

/// Render `model` in `format`.
pub fn render(model: &ReportModel, format: RenderFormat) -> String {
    match format {
        RenderFormat::Text => render_text(model),
        RenderFormat::Markdown => render_markdown(model),
        RenderFormat::Json => render_json(model).to_string(),
    }
}
