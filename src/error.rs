//! Error types for stages and the pipeline

use std::fmt;

/// Errors produced by an individual stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageError {
    /// The stage's transform failed.
    Failed(String),
    /// One-time asynchronous setup for the stage failed.
    SetupFailed(String),
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::Failed(msg) => write!(f, "Stage failed: {}", msg),
            StageError::SetupFailed(msg) => write!(f, "Stage setup failed: {}", msg),
        }
    }
}

impl std::error::Error for StageError {}

/// Errors surfaced by `Pipeline::process` and `Pipeline::process_batch`.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A required stage failed; the run is aborted and the error propagated.
    Stage { stage: String, source: StageError },
    /// `process_batch` was given a concurrency of zero.
    InvalidConcurrency(usize),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Stage { stage, source } => {
                write!(f, "Stage '{}' failed: {}", stage, source)
            }
            PipelineError::InvalidConcurrency(value) => {
                write!(f, "concurrency must be a positive integer, got {}", value)
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Stage { source, .. } => Some(source),
            PipelineError::InvalidConcurrency(_) => None,
        }
    }
}
