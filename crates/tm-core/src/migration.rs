//! Migration records and lazy script loading.

use crate::error::{CoreError, CoreResult};
use crate::plan::Direction;
use crate::script::Script;
use crate::version::Version;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Where migration script text comes from.
///
/// The catalog only knows names and paths; bodies are read through this seam
/// immediately before a migration runs.
pub trait ScriptSource {
    /// Read the full text of `migration`'s file.
    fn read(&self, migration: &Migration) -> std::io::Result<String>;
}

/// Reads scripts from the migration's path on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FsScriptSource;

impl ScriptSource for FsScriptSource {
    fn read(&self, migration: &Migration) -> std::io::Result<String> {
        std::fs::read_to_string(migration.path())
    }
}

/// Serves scripts from memory, keyed by migration name
#[derive(Debug, Clone, Default)]
pub struct MemoryScriptSource {
    scripts: HashMap<String, String>,
}

impl MemoryScriptSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the text for the migration called `name`
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.scripts.insert(name.into(), text.into());
        self
    }
}

impl ScriptSource for MemoryScriptSource {
    fn read(&self, migration: &Migration) -> std::io::Result<String> {
        self.scripts.get(migration.name()).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no script registered for {}", migration.name()),
            )
        })
    }
}

/// Load state of a migration's script bodies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScriptState {
    /// Bodies have not been read yet
    #[default]
    Unloaded,
    /// Bodies were read and parsed
    Loaded(Script),
}

/// One versioned, reversible schema change
#[derive(Debug, Clone)]
pub struct Migration {
    name: String,
    path: PathBuf,
    version: Version,
    state: ScriptState,
}

impl Migration {
    /// Create an unloaded migration
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, version: Version) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            version,
            state: ScriptState::Unloaded,
        }
    }

    /// File name, used for diagnostics and progress output
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the script file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn state(&self) -> &ScriptState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ScriptState::Loaded(_))
    }

    /// Parsed bodies, if already loaded
    pub fn script(&self) -> Option<&Script> {
        match &self.state {
            ScriptState::Loaded(script) => Some(script),
            ScriptState::Unloaded => None,
        }
    }

    /// Read and parse the bodies if not already loaded.
    ///
    /// On failure the migration stays `Unloaded`.
    pub fn load(&mut self, source: &dyn ScriptSource) -> CoreResult<&Script> {
        if let ScriptState::Unloaded = self.state {
            let text = source.read(self).map_err(|e| CoreError::IoWithPath {
                path: self.path.display().to_string(),
                source: e,
            })?;
            let script = Script::parse_str(&text).map_err(|e| CoreError::InvalidScript {
                name: self.name.clone(),
                source: e,
            })?;
            log::debug!("Loaded script for migration {}", self.name);
            self.state = ScriptState::Loaded(script);
        }

        match &self.state {
            ScriptState::Loaded(script) => Ok(script),
            ScriptState::Unloaded => unreachable!("script state set above"),
        }
    }

    /// Body to run for `direction`, if loaded
    pub fn body(&self, direction: Direction) -> Option<&str> {
        self.script().map(|script| match direction {
            Direction::Forward => script.up.as_str(),
            Direction::Backward => script.down.as_str(),
        })
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
