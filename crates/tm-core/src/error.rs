//! Error types for tm-core

use crate::script::ScriptError;
use crate::version::Version;
use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// S001: Migration script does not follow the `-- @up` / `-- @down` layout
    #[error("[S001] Invalid file \"{name}\"")]
    InvalidScript {
        name: String,
        #[source]
        source: ScriptError,
    },

    /// C001: File name does not start with a version number
    #[error("[C001] \"{name}\" does not specify a version")]
    MissingVersion { name: String },

    /// C002: Leading digits are zero or do not fit a version
    #[error("[C002] \"{name}\" does not have a valid version")]
    InvalidVersion { name: String },

    /// C003: Two files resolve to the same version
    #[error("[C003] Duplicate version {version} found in \"{first}\" and \"{second}\"")]
    DuplicateVersion {
        version: Version,
        first: String,
        second: String,
    },

    /// C004: File name in the migrations directory is not valid UTF-8
    #[error("[C004] Migration file name is not valid UTF-8: {name}")]
    NonUtf8FileName { name: String },

    /// R001: Version recorded in the database has no matching migration
    #[error("[R001] Current version {0} not found")]
    CurrentVersionNotFound(Version),

    /// R002: Requested goto target has no matching migration
    #[error("[R002] Target version {0} not found")]
    TargetVersionNotFound(Version),

    /// A001: Command argument could not be parsed
    #[error("[A001] {message}")]
    InvalidArgument { message: String },

    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Required setting is absent
    #[error("[E002] {key} is not set or is empty")]
    MissingSetting { key: &'static str },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Config file parse error
    #[error("[E004] Failed to parse config")]
    YamlParse(#[from] serde_yaml::Error),

    /// E005: IO error with file path context
    #[error("[E005] Failed to read '{path}'")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

impl CoreError {
    /// Whether the failure stems from how the tool was invoked, in which case
    /// usage text should accompany the message.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidArgument { .. }
                | CoreError::ConfigNotFound { .. }
                | CoreError::MissingSetting { .. }
                | CoreError::ConfigInvalid { .. }
                | CoreError::YamlParse(_)
        )
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
