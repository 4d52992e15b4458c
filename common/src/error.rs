//! Error taxonomy for the pipeline.
//!
//! Every failure an external invocation or stage can produce is
//! classified into exactly one of these variants. Fatal variants abort
//! the run; the rest are recorded against the stage and the run
//! continues.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad CLI arguments or domain syntax. Fatal, pre-flight.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required external tool or input file is absent. Fatal,
    /// raised per stage before any subprocess for it is spawned.
    #[error("missing dependency: {0}")]
    MissingDependency(String),

    /// A subprocess exited nonzero or timed out. Soft: logged,
    /// recorded against the stage, never aborts the run.
    #[error("{tool}: {detail}")]
    ToolFailure { tool: String, detail: String },

    /// A stage cannot proceed because an upstream artifact was never
    /// produced. Fatal for that stage and anything depending solely on
    /// it; sibling stages are unaffected.
    #[error("stage '{stage}' requires artifact '{artifact}', which was not produced")]
    UnmetDataDependency {
        stage: &'static str,
        artifact: &'static str,
    },

    /// Workspace paths cannot be created or written. Fatal.
    #[error("workspace i/o: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for variants that abort the entire run.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::ToolFailure { .. } | Error::UnmetDataDependency { .. }
        )
    }
}
