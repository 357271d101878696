//! crates/fa_io/src/lib.rs
//! Local I/O for the faction draft.
//!
//! - `loader`: preference tables (CSV or JSON) and the params file.
//! - `canonical_json`: sorted-key compact JSON bytes and atomic writes.
//! - `hasher`: SHA-256 digests and the `ASG:`/`RUN:` artifact ids.
//!
//! Everything fails through one error type, [`IoError`].

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod canonical_json;
pub mod hasher;
pub mod loader;

/// Unified error for fa_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, read, create_dir_all, rename, fsync).
    #[error("io/path error: {0}")]
    Path(String),

    /// Malformed CSV; `line` is 1-based (0 when unknown).
    #[error("csv error on line {line}: {msg}")]
    Csv { line: u64, msg: String },

    /// JSON parse/shape errors with a JSON Pointer-ish location.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Table shape: missing columns, empty or duplicate player names.
    #[error("table error: {0}")]
    Table(String),

    /// Params file content out of domain.
    #[error("params error: {0}")]
    Params(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps no pointer, only a position.
        IoError::Json {
            pointer: "/".to_string(),
            msg: e.to_string(),
        }
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            msg: e.to_string(),
        }
    }
}

/* ---------------- Public prelude ---------------- */

pub mod prelude {
    pub use crate::{IoError, IoResult};

    pub use crate::canonical_json;
    pub use crate::hasher;
    pub use crate::loader;

    pub use crate::canonical_json::{to_canonical_bytes, write_canonical_file};
    pub use crate::hasher::{sha256_canonical, sha256_hex};
    pub use crate::loader::{load_params, load_table, LoadedTable, TableFormat};
}
