// crates/fa_cli/src/main.rs
//
// Exit codes, typed error mapping, logging setup, the validate-only
// short-circuit and the full run path (load → params → draw → artifacts →
// rendering).

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Bad input: too many players, unknown faction, malformed table or params.
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    /// Artifact build or report rendering failed.
    pub const BUILD: i32 = 5;
}

use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args, CliError};
use fa_core::variables::{validate_domains, Params};
use fa_io::{canonical_json, loader, IoError};
use fa_pipeline::{engine_identifiers, run_with_ctx, validate, PipelineCtx, PipelineError, PipelineOutputs};
use fa_report::{build_model, render, ReportError};
use log::{debug, info, LevelFilter};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Io(String),
    Build(String),
    Render(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "invalid input: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Build(m) => write!(f, "build: {m}"),
            MainError::Render(m) => write!(f, "render: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("fa: error: {e}");
            let rc = match e {
                CliError::NotFound(_) => exitcodes::IO,
                CliError::NonLocalPath(_) => exitcodes::VALIDATION,
            };
            return ExitCode::from(rc as u8);
        }
    };
    init_logging(&args);

    let res = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    let rc = match res {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("fa: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// stderr logger; `-v`/`--quiet` pick the level, `RUST_LOG` has the last word.
fn init_logging(args: &Args) {
    let level = if args.quiet {
        LevelFilter::Error
    } else {
        match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    };
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Build(_) | MainError::Render(_) => BUILD,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Path(m) => MainError::Io(m),
        other => MainError::Validation(other.to_string()),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Io(io) => map_io_err(io),
        PipelineError::Alloc(a) => MainError::Validation(a.to_string()),
        PipelineError::Validate(m) => MainError::Validation(m),
        PipelineError::Build(m) => MainError::Build(m),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Render(e.to_string())
}

/// Params file (or defaults) with `--seed` / `--max-players` applied on top.
fn resolve_params(args: &Args) -> Result<Params, MainError> {
    let mut params = match &args.params {
        Some(p) => loader::load_params(p).map_err(map_io_err)?,
        None => Params::default(),
    };
    if let Some(seed) = args.seed {
        params.tie_seed = Some(seed);
    }
    if let Some(cap) = args.max_players {
        params.max_players = cap;
    }
    validate_domains(&params).map_err(|e| MainError::Validation(e.to_string()))?;
    debug!("params: {params:?}");
    Ok(params)
}

/// Load and check the table; print every issue. Nothing is drawn.
fn validate_only(args: &Args) -> Result<i32, MainError> {
    let params = resolve_params(args)?;
    let table = loader::load_table(&args.input).map_err(map_io_err)?;
    let report = validate::validate(&table.rows, &params);

    let mut out = std::io::stdout().lock();
    for issue in &report.issues {
        let sev = match issue.severity {
            fa_pipeline::Severity::Error => "error",
            fa_pipeline::Severity::Warning => "warning",
        };
        writeln!(out, "{sev} {} [{}]: {}", issue.code, issue.where_, issue.message)
            .map_err(|e| MainError::Io(e.to_string()))?;
    }
    if report.pass {
        if !args.quiet {
            eprintln!("validate-only: {} players OK", table.rows.len());
        }
        Ok(exitcodes::OK)
    } else {
        Ok(exitcodes::VALIDATION)
    }
}

fn run_once(args: &Args) -> Result<i32, MainError> {
    let params = resolve_params(args)?;
    let table = loader::load_table(&args.input).map_err(map_io_err)?;
    info!("loaded {} players from {}", table.rows.len(), args.input.display());

    let outs = run_with_ctx(PipelineCtx {
        table,
        params,
        engine_meta: engine_identifiers(),
    })
    .map_err(map_pipeline_err)?;

    if let Some(dir) = &args.out {
        write_artifacts(dir, &outs)?;
        info!("artifacts written to {}", dir.display());
    }

    print_reports(args, &outs)?;
    Ok(exitcodes::OK)
}

fn write_artifacts(out_dir: &Path, outs: &PipelineOutputs) -> Result<(), MainError> {
    fs::create_dir_all(out_dir).map_err(|e| MainError::Io(format!("mkdir {}: {e}", out_dir.display())))?;

    canonical_json::write_canonical_file(&out_dir.join("assignment.json"), &outs.assignment)
        .map_err(|e| MainError::Io(format!("write assignment.json: {e}")))?;
    canonical_json::write_canonical_file(&out_dir.join("run_record.json"), &outs.run_record)
        .map_err(|e| MainError::Io(format!("write run_record.json: {e}")))?;
    Ok(())
}

fn print_reports(args: &Args, outs: &PipelineOutputs) -> Result<(), MainError> {
    let asg = serde_json::to_value(&outs.assignment)
        .map_err(|e| MainError::Render(format!("assignment to JSON: {e}")))?;
    let run = serde_json::to_value(&outs.run_record)
        .map_err(|e| MainError::Render(format!("run_record to JSON: {e}")))?;
    let model = build_model(&asg, Some(&run)).map_err(map_report_err)?;

    let mut out = std::io::stdout().lock();
    for fmt in args.formats() {
        let body = render(&model, fmt);
        out.write_all(body.as_bytes()).map_err(|e| MainError::Io(e.to_string()))?;
        if !body.ends_with('\n') {
            out.write_all(b"\n").map_err(|e| MainError::Io(e.to_string()))?;
        }
    }
    Ok(())
}
