// src/split/error.rs
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SplitError>;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("marker `{marker}` not found")]
    RegionNotFound { marker: String },

    #[error("no unique region at line {line}: {reason}")]
    AmbiguousRegion { line: usize, reason: String },

    #[error("malformed region at line {line}: {reason}")]
    MalformedRegion { line: usize, reason: String },

    #[error("row opening at line {line} has no `{attr}` value")]
    MissingCategoryKey { line: usize, attr: String },

    #[error("placeholder `{placeholder}` must occur exactly once, outside the rows (template has {found})")]
    PlaceholderNotFound { placeholder: String, found: usize },

    #[error("placeholder `{placeholder}` still occurs {count} time(s) after the rewrite")]
    PlaceholderSurvived { placeholder: String, count: usize },

    #[error("no files in {} match {}", dir.display(), patterns.join(", "))]
    NoInputFiles { dir: PathBuf, patterns: Vec<String> },

    #[error("cannot derive an output name for `{file}` and partition `{partition}`")]
    OutputName { file: String, partition: String },

    #[error("output {} collides with another output or the input", path.display())]
    OutputCollision { path: PathBuf },

    #[error("worker lost: {reason}")]
    WorkerLost { reason: String },

    #[error("bad pattern `{pattern}`: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SplitError {
    /// Stable short name, used in per-file report lines.
    pub fn kind(&self) -> &'static str {
        match self {
            SplitError::RegionNotFound { .. } => "RegionNotFound",
            SplitError::AmbiguousRegion { .. } => "AmbiguousRegion",
            SplitError::MalformedRegion { .. } => "MalformedRegion",
            SplitError::MissingCategoryKey { .. } => "MissingCategoryKey",
            SplitError::PlaceholderNotFound { .. } => "PlaceholderNotFound",
            SplitError::PlaceholderSurvived { .. } => "PlaceholderSurvived",
            SplitError::NoInputFiles { .. } => "NoInputFiles",
            SplitError::OutputName { .. } => "OutputName",
            SplitError::OutputCollision { .. } => "OutputCollision",
            SplitError::WorkerLost { .. } => "WorkerLost",
            SplitError::Pattern { .. } => "Pattern",
            SplitError::Io { .. } => "Io",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SplitError::Io { path: path.into(), source }
    }
}
