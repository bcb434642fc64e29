//! Pipeline error types.

use glitch_edit::Error as EditError;
use glitch_fx::FxError;
use thiserror::Error;

/// Errors that end a whole run.
///
/// Per-segment effect failures never show up here; they are collected in the
/// run summary instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Nothing to process.
    #[error("No segments to process; select segments or apply to a whole track")]
    NoTargets,

    /// The host could not open or close the undo transaction.
    #[error("Transaction '{label}' failed: {source}")]
    Transaction {
        label: String,
        #[source]
        source: EditError,
    },

    /// Invalid settings file or values.
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// Edit error outside per-segment processing.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// Effect configuration error.
    #[error(transparent)]
    Fx(#[from] FxError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings deserialization error.
    #[error("Settings parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub(crate) fn transaction(label: &str, source: EditError) -> Self {
        Self::Transaction {
            label: label.into(),
            source,
        }
    }
}

/// Pipeline result type.
pub type Result<T> = std::result::Result<T, PipelineError>;
