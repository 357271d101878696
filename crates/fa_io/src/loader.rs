//! Loader: read a local preference table (CSV or JSON) and the optional params
//! file. Cells are kept raw; parsing into factions happens in the allocator,
//! which owns the `InvalidFaction` error. No network I/O.

#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use fa_core::{
    variables::{self, Params},
    PlayerName, RawPreference, MAX_RANKS,
};
use log::debug;

use crate::{hasher, IoError};

/// Inputs above this size are rejected before parsing.
pub const MAX_INPUT_BYTES: u64 = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(TableFormat::Csv),
            Some("json") => Ok(TableFormat::Json),
            _ => Err(IoError::Table(format!(
                "{}: expected a .csv or .json table",
                path.display()
            ))),
        }
    }
}

/// A loaded table: rows in file order plus the digest of the raw bytes.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub format: TableFormat,
    pub rows: Vec<RawPreference>,
    pub sha256: String,
}

// ----------------------------- Public loaders -----------------------------

pub fn load_table(path: &Path) -> Result<LoadedTable, IoError> {
    let format = TableFormat::from_path(path)?;
    let bytes = read_with_limit(path)?;
    let rows = match format {
        TableFormat::Csv => parse_csv(&bytes)?,
        TableFormat::Json => parse_json(&bytes)?,
    };
    check_unique_names(&rows)?;
    debug!("loaded {} row(s) from {}", rows.len(), path.display());
    Ok(LoadedTable {
        format,
        rows,
        sha256: hasher::sha256_hex(&bytes),
    })
}

pub fn load_params(path: &Path) -> Result<Params, IoError> {
    let bytes = read_with_limit(path)?;
    let params: Params = serde_json::from_slice(&bytes).map_err(|e| IoError::Json {
        pointer: "/".into(),
        msg: e.to_string(),
    })?;
    variables::validate_domains(&params).map_err(|e| IoError::Params(e.to_string()))?;
    Ok(params)
}

// ----------------------------- Format parsers -----------------------------

/// Header row with `name` and `choice 1` .. `choice 4`; only `name` and
/// `choice 1` are required. Other columns are ignored.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<RawPreference>, IoError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = rdr.headers()?.clone();
    let find = |want: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(want));
    let name_ix = find("name").ok_or_else(|| IoError::Table("missing `name` column".into()))?;
    let mut choice_ix = Vec::with_capacity(MAX_RANKS);
    for r in 1..=MAX_RANKS {
        match find(&format!("choice {r}")) {
            Some(ix) => choice_ix.push(ix),
            None if r == 1 => return Err(IoError::Table("missing `choice 1` column".into())),
            None => break,
        }
    }

    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);
        if rec.iter().all(str::is_empty) {
            continue;
        }
        let name = PlayerName::new(rec.get(name_ix).unwrap_or(""))
            .map_err(|_| IoError::Table(format!("empty player name on line {line}")))?;
        let cells = choice_ix.iter().map(|&ix| rec.get(ix).unwrap_or(""));
        rows.push(RawPreference::new(name, cells));
    }
    Ok(rows)
}

/// `[{"name": "...", "choices": ["...", ...]}, ...]`
pub fn parse_json(bytes: &[u8]) -> Result<Vec<RawPreference>, IoError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn check_unique_names(rows: &[RawPreference]) -> Result<(), IoError> {
    let mut seen = BTreeSet::new();
    for r in rows {
        if !seen.insert(r.name.as_str()) {
            return Err(IoError::Table(format!("duplicate player name {:?}", r.name.as_str())));
        }
    }
    Ok(())
}

fn read_with_limit(path: &Path) -> Result<Vec<u8>, IoError> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let mut buf = Vec::new();
    f.take(MAX_INPUT_BYTES + 1).read_to_end(&mut buf)?;
    if buf.len() as u64 > MAX_INPUT_BYTES {
        return Err(IoError::Path(format!(
            "{}: larger than {MAX_INPUT_BYTES} bytes",
            path.display()
        )));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_headers_are_case_insensitive_and_short_tables_pad() {
        let csv = "Name , Choice 1,choice 2\nAlice,Atreides,harkonnen\nBob,-,\n";
        let rows = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name.as_str(), "Alice");
        assert_eq!(rows[0].choices, vec!["Atreides", "harkonnen"]);
        assert_eq!(rows[1].choices, vec!["-", ""]);
    }

    #[test]
    fn csv_requires_name_and_first_choice() {
        let err = parse_csv(b"player,choice 1\nA,Fremen\n").unwrap_err();
        assert!(matches!(&err, IoError::Table(m) if m.contains("name")));
        let err = parse_csv(b"name,choice 2\nA,Fremen\n").unwrap_err();
        assert!(matches!(&err, IoError::Table(m) if m.contains("choice 1")));
    }

    #[test]
    fn csv_empty_name_reports_line() {
        let err = parse_csv(b"name,choice 1\nA,Fremen\n  ,Emperor\n").unwrap_err();
        assert!(matches!(&err, IoError::Table(m) if m.contains("line 3")), "{err}");
    }

    #[test]
    fn json_rows_default_choices() {
        let rows = parse_json(br#"[{"name":"Ann","choices":["Ixian"]},{"name":"Ben"}]"#).unwrap();
        assert_eq!(rows[0].choices, vec!["Ixian"]);
        assert!(rows[1].choices.is_empty());
        assert!(matches!(parse_json(b"{}"), Err(IoError::Json { .. })));
    }

    #[test]
    fn duplicate_names_rejected() {
        let rows = parse_json(br#"[{"name":"Ann"},{"name":" Ann "}]"#).unwrap();
        assert!(matches!(check_unique_names(&rows), Err(IoError::Table(_))));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(TableFormat::from_path(Path::new("t.CSV")).unwrap(), TableFormat::Csv);
        assert_eq!(TableFormat::from_path(Path::new("t.json")).unwrap(), TableFormat::Json);
        assert!(TableFormat::from_path(Path::new("t.xlsx")).is_err());
    }
}
