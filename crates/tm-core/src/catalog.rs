//! Migration discovery and ordering.

use crate::error::{CoreError, CoreResult};
use crate::migration::Migration;
use crate::plan::Position;
use crate::version::Version;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// All available migrations, strictly increasing by version.
///
/// Version 0 is never a member; it is represented by [`Position::Origin`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    migrations: Vec<Migration>,
}

impl Catalog {
    /// Discover every entry in `dir` other than subdirectories.
    ///
    /// Symlinks are followed, so a link to a directory is skipped and a link
    /// to a file is a migration. A dangling link is an error. Each file name
    /// must start with a non-zero version, and no two files may share a
    /// version. Script bodies are not read here.
    pub fn load(dir: &Path) -> CoreResult<Self> {
        let io_err = |e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            let metadata = std::fs::metadata(&path).map_err(|e| CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            })?;
            if metadata.is_dir() {
                log::debug!("Skipping directory {}", path.display());
                continue;
            }
            let name = entry
                .file_name()
                .into_string()
                .map_err(|raw| CoreError::NonUtf8FileName {
                    name: raw.to_string_lossy().into_owned(),
                })?;
            names.push(name);
        }

        Self::from_names(dir, names)
    }

    /// Build a catalog from file names found in `dir`.
    pub fn from_names<I, S>(dir: &Path, names: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut migrations = Vec::new();
        let mut seen: HashMap<Version, String> = HashMap::new();

        for name in names {
            let name: String = name.into();
            let version = Version::from_file_name(&name)?;

            if let Some(first) = seen.get(&version) {
                return Err(CoreError::DuplicateVersion {
                    version,
                    first: first.clone(),
                    second: name,
                });
            }
            seen.insert(version, name.clone());

            let path: PathBuf = dir.join(&name);
            migrations.push(Migration::new(name, path, version));
        }

        migrations.sort_unstable_by_key(Migration::version);
        log::debug!("Catalog built with {} migrations", migrations.len());

        Ok(Self { migrations })
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Migration> {
        self.migrations.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Migration> {
        self.migrations.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Migration> {
        self.migrations.iter()
    }

    /// Versions in catalog order
    pub fn versions(&self) -> Vec<Version> {
        self.migrations.iter().map(Migration::version).collect()
    }

    /// Index of the newest migration
    pub fn last_index(&self) -> Option<usize> {
        self.migrations.len().checked_sub(1)
    }

    /// Locate `version` in the order.
    ///
    /// Version 0 maps to [`Position::Origin`]; any other version must belong
    /// to exactly one migration. Binary search, O(log n).
    pub fn position(&self, version: Version) -> Option<Position> {
        if version.is_zero() {
            return Some(Position::Origin);
        }
        self.migrations
            .binary_search_by_key(&version, Migration::version)
            .ok()
            .map(Position::At)
    }

    /// Version recorded after `position` is reached, `None` if the position
    /// lies past the end of the catalog
    pub fn version_at(&self, position: Position) -> Option<Version> {
        match position {
            Position::Origin => Some(Version::ZERO),
            Position::At(index) => self.migrations.get(index).map(Migration::version),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Migration;
    type IntoIter = std::slice::Iter<'a, Migration>;

    fn into_iter(self) -> Self::IntoIter {
        self.migrations.iter()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
