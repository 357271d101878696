// crates/fa_cli/src/args.rs
//
// Offline CLI argument surface.
// - Inputs are local files only (any scheme:// is rejected)
// - Seed override accepts decimal u64 or 0x-hex up to 16 nybbles
// - --validate-only loads and checks the table without drawing

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use clap::{ArgAction, Parser, ValueEnum};
use fa_report::RenderFormat;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "fa",
    version,
    disable_help_subcommand = true,
    about = "Assign factions to players from ranked preferences"
)]
pub struct Args {
    /// Preference table: .csv (name, choice 1..choice 4) or .json.
    #[arg(long)]
    pub input: PathBuf,

    /// Params JSON ({"max_players": .., "tie_seed": ..}).
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Tie RNG seed override. Decimal u64 or 0x-hex (≤16 hex digits).
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u64>,

    /// Player cap override (1..=6).
    #[arg(long)]
    pub max_players: Option<usize>,

    /// Write assignment.json and run_record.json into this directory.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Output format(s) printed to stdout. Defaults to text.
    #[arg(long, value_enum, num_args = 1..)]
    pub render: Vec<RenderArg>,

    /// Load and validate the table only; no draw.
    #[arg(long)]
    pub validate_only: bool,

    /// Only errors on stderr.
    #[arg(long)]
    pub quiet: bool,

    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderArg {
    Text,
    Markdown,
    Json,
}

impl From<RenderArg> for RenderFormat {
    fn from(r: RenderArg) -> Self {
        match r {
            RenderArg::Text => RenderFormat::Text,
            RenderArg::Markdown => RenderFormat::Markdown,
            RenderArg::Json => RenderFormat::Json,
        }
    }
}

impl Args {
    /// Requested formats, `text` when none were given.
    pub fn formats(&self) -> Vec<RenderFormat> {
        if self.render.is_empty() {
            vec![RenderFormat::Text]
        } else {
            self.render.iter().copied().map(Into::into).collect()
        }
    }
}

/// Errors surfaced by argument validation.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be a local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Seed parser: decimal u64 or 0x-hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty seed".into());
    }
    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if rest.is_empty() || rest.len() > 16 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("hex seed must be 1..16 hex digits".into());
        }
        u64::from_str_radix(rest, 16).map_err(|_| "hex seed out of range".into())
    } else {
        s.parse::<u64>().map_err(|_| "decimal seed must be a valid u64".into())
    }
}

/// Entry point used by main.rs.
pub fn parse_and_validate() -> Result<Args, CliError> {
    check(Args::parse())
}

/// Same as `parse_and_validate`, over an explicit argv.
#[cfg(test)]
pub fn parse_from<I, T>(argv: I) -> Result<Args, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    check(Args::parse_from(argv))
}

fn check(mut args: Args) -> Result<Args, CliError> {
    let all = [Some(args.input.as_path()), args.params.as_deref(), args.out.as_deref()];
    for p in all.into_iter().flatten() {
        ensure_local_path(p)?;
    }

    ensure_local_exists(&args.input, "--input")?;
    if let Some(p) = &args.params {
        ensure_local_exists(p, "--params")?;
    }

    args.input = normalize_path(&args.input);
    args.params = args.params.take().map(|p| normalize_path(&p));
    args.out = args.out.take().map(|p| normalize_path(&p));
    Ok(args)
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    match p.to_str() {
        Some(s) if has_scheme(s) => Err(CliError::NonLocalPath(s.to_string())),
        _ => Ok(()),
    }
}

fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Best-effort absolute path; falls back to CWD-relative when the path does not exist yet.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}
