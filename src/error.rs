//! Error types for the analysis pipeline
//!
//! Only structural problems abort a run. Statistical degeneracies (zero
//! variance, all-zero differences) are carried as NaN/Inf values instead.

use thiserror::Error;

/// Errors that can abort an analysis run
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Not a single data column could be resolved to (Subject, Group, Condition)
    #[error("No data parsed: {columns} data column(s), none matched the PD/CO + NoStim/Stim naming scheme")]
    EmptyResult { columns: usize },

    #[error("Malformed input table: {0}")]
    MalformedTable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data for {test}: need at least {needed} values, got {got}")]
    InsufficientData {
        test: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("Paired samples differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
