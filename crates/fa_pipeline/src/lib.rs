//! fa_pipeline: deterministic pipeline surface (load → validate → allocate → build).
//! This crate does no parsing of its own: I/O, canonical JSON and hashing go
//! through `fa_io`, the draft through `fa_algo`.

use std::path::Path;

use fa_algo::AllocError;
use fa_core::variables::Params;
use fa_io::{
    loader::{self, LoadedTable},
    IoError,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod allocate;
pub mod build_result;
pub mod validate;

pub use allocate::{ResolvedSeed, SeedSource};
pub use build_result::{AssignmentDoc, AssignmentRow, RunRecordDoc};
pub use validate::{EntityRef, Severity, ValidationIssue, ValidationReport};

/// Engine identifiers recorded in every run record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

/// Pipeline context: the table is already loaded; params are final (file +
/// CLI overrides merged by the caller).
#[derive(Debug)]
pub struct PipelineCtx {
    pub table: LoadedTable,
    pub params: Params,
    pub engine_meta: EngineMeta,
}

/// Top-level outputs of a run.
#[derive(Debug)]
pub struct PipelineOutputs {
    pub assignment: AssignmentDoc,
    pub run_record: RunRecordDoc,
    pub validation: ValidationReport,
}

/// Single error surface for the pipeline orchestration.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Alloc(#[from] AllocError),

    #[error("validation failed: {0}")]
    Validate(String),

    #[error("build error: {0}")]
    Build(String),
}

// -------------------------------------- Public API --------------------------------------

/// Orchestrate the pipeline with a preloaded table.
///
/// Validation warnings are logged; validation errors are left for the
/// allocator, which owns `TooManyPlayers` and `InvalidFaction`. A bad param
/// domain is the one error raised here.
pub fn run_with_ctx(ctx: PipelineCtx) -> Result<PipelineOutputs, PipelineError> {
    // --- VALIDATE ---
    let validation = validate::validate(&ctx.table.rows, &ctx.params);
    for issue in validation.warnings() {
        warn!("{}: {} ({})", issue.code, issue.message, issue.where_);
    }
    if let Some(bad) = validation.errors().find(|i| i.code == "Param.OutOfDomain") {
        return Err(PipelineError::Validate(bad.message.clone()));
    }

    // --- ALLOCATE ---
    let seed = allocate::resolve_seed(&ctx.params);
    let outcome = allocate::allocate_with_seed(&ctx.table.rows, &ctx.params, seed.seed)?;

    // --- BUILD ---
    let assignment = build_result::build_assignment(&outcome)?;
    let echo = build_result::RunEcho {
        engine: &ctx.engine_meta,
        input_sha256: &ctx.table.sha256,
        max_players: ctx.params.max_players,
        tie_seed: seed.seed,
        seed_source: seed.source,
    };
    let run_record = build_result::build_run_record(&outcome, &echo, &assignment.id)?;
    info!("run {} produced {}", run_record.id, assignment.id);

    Ok(PipelineOutputs { assignment, run_record, validation })
}

/// Convenience entry: load the table from disk, then run.
pub fn run_from_path<P: AsRef<Path>>(input: P, params: Params) -> Result<PipelineOutputs, PipelineError> {
    let table = loader::load_table(input.as_ref())?;
    run_with_ctx(PipelineCtx {
        table,
        params,
        engine_meta: engine_identifiers(),
    })
}

/// Load and validate only; nothing is allocated.
pub fn validate_path<P: AsRef<Path>>(input: P, params: &Params) -> Result<ValidationReport, PipelineError> {
    let table = loader::load_table(input.as_ref())?;
    Ok(validate::validate(&table.rows, params))
}

/// Engine identifiers for the run record.
pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        vendor: "fa".to_string(),
        name: "fa_engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: if cfg!(debug_assertions) { "dev" } else { "release" }.to_string(),
    }
}
