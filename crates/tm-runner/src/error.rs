//! Error types for tm-runner

use thiserror::Error;
use tm_core::CoreError;
use tm_db::DbError;

/// Migration run errors
#[derive(Error, Debug)]
pub enum RunError {
    /// Current version could not be read (X001)
    #[error("[X001] Failed to load current version")]
    CurrentVersion(#[source] DbError),

    /// Plan could not be resolved
    #[error(transparent)]
    Resolve(#[from] CoreError),

    /// Plan refers to a migration the catalog does not have (X004)
    #[error("[X004] Plan refers to migration index {index}, but the catalog has {len}")]
    PlanOutOfRange { index: usize, len: usize },

    /// Script file could not be read or parsed (X002)
    #[error("[X002] Failed to load \"{name}\"")]
    Load {
        name: String,
        #[source]
        source: CoreError,
    },

    /// Script execution or version update failed and was rolled back (X003)
    #[error("[X003] Migration \"{name}\" failed")]
    Apply {
        name: String,
        #[source]
        source: DbError,
    },
}

impl RunError {
    /// Name of the migration that failed, if the failure was in one
    pub fn migration_name(&self) -> Option<&str> {
        match self {
            RunError::Load { name, .. } | RunError::Apply { name, .. } => Some(name),
            RunError::CurrentVersion(_)
            | RunError::Resolve(_)
            | RunError::PlanOutOfRange { .. } => None,
        }
    }
}

/// Result type alias for RunError
pub type RunResult<T> = Result<T, RunError>;
