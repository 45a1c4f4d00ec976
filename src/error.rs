//! Error type shared by every stage of the dashboard pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single dashboard computation.
///
/// None of these are recoverable for the render in progress: the pipeline
/// aborts and the message is surfaced to whoever asked for the page.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("cannot read order source '{}': {reason}", path.display())]
    SourceRead { path: PathBuf, reason: String },

    #[error("row {line}: column '{column}' value {value:?} is not a valid {expected}")]
    TypeCoercion {
        line: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("row {line}: order date {value:?} does not match DD-MM-YYYY")]
    DateParse { line: usize, value: String },

    #[error("row {line}: time taken {value:?} has no '(min) ' prefix and is not a number")]
    TimeParse { line: usize, value: String },

    #[error("no rows for {group} after filtering")]
    EmptyGroup { group: String },

    #[error("invalid filter: {0}")]
    InvalidFilter(String),
}

impl DashboardError {
    /// Short machine-readable tag, used by the API error body.
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::SourceRead { .. } => "source_read",
            DashboardError::TypeCoercion { .. } => "type_coercion",
            DashboardError::DateParse { .. } => "date_parse",
            DashboardError::TimeParse { .. } => "time_parse",
            DashboardError::EmptyGroup { .. } => "empty_group",
            DashboardError::InvalidFilter(_) => "invalid_filter",
        }
    }

    pub(crate) fn empty_group(group: impl Into<String>) -> Self {
        DashboardError::EmptyGroup { group: group.into() }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
