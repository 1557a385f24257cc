//! Error types for puzzle generation, play sessions, and activity-log loading.

use std::io;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PuzzleError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("difficulty modifier must be finite and non-negative, got {0}")]
    InvalidDifficulty(f64),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("no hints remaining ({used} of {budget} used)")]
    HintsExhausted { used: u32, budget: u32 },

    #[error("puzzle already solved")]
    AlreadySolved,
}

/// Describes why an activity log file could not be fully loaded.
#[derive(Error, Debug)]
pub enum ActivityLoadError {
    #[error("activity log I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("activity log file is empty")]
    EmptyFile,

    #[error("invalid activity log header at line {line}: {message}")]
    InvalidHeader { line: usize, message: String },

    #[error("invalid activity record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    /// The file ended without a trailing newline.
    #[error("incomplete activity log line at line {line}")]
    IncompleteLine { line: usize },

    /// Previous-hash link mismatch, or the recomputed hash differs from the stored one.
    #[error("SHA-256 hash chain broken at line {line}")]
    HashChainBroken { line: usize },
}
