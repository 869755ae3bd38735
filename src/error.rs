//! Error types for dungeon generation

use thiserror::Error;

use crate::generation::Stage;

/// Errors that can occur while configuring or driving the generation pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DungeonError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A stage was requested before the stages it depends on have run
    #[error("cannot start at stage {requested:?}: stage {pending:?} has not run yet")]
    StageNotReady {
        /// Stage the caller asked to regenerate from
        requested: Stage,
        /// Earliest stage that still has no output
        pending: Stage,
    },
}

/// Result type alias for dungeon operations
pub type Result<T> = std::result::Result<T, DungeonError>;
