//! Strongly-typed migration version.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of a migration in the single total order of schema changes.
///
/// `Version::ZERO` is the state before any migration has been applied. It is
/// never the version of a real migration. Every version fits in a signed
/// 64-bit integer so it can be stored in a `BIGINT` column unchanged.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// The pre-migration sentinel.
    pub const ZERO: Version = Version(0);

    /// Largest representable version (`i64::MAX`).
    pub const MAX: Version = Version(i64::MAX as u64);

    /// Create a version, returning `None` if it exceeds [`Version::MAX`].
    pub fn new(value: u64) -> Option<Self> {
        if value > Self::MAX.0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Return the raw value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Whether this is the pre-migration sentinel.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Value as stored by the database backends.
    pub fn as_i64(self) -> i64 {
        // Construction caps the value at i64::MAX.
        self.0 as i64
    }

    /// Extract the version encoded by the leading run of digits in a
    /// migration file name, e.g. `"0042_add_users.sql"` → `42`.
    pub fn from_file_name(name: &str) -> CoreResult<Self> {
        let digits_len = name
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();

        if digits_len == 0 {
            return Err(CoreError::MissingVersion {
                name: name.to_string(),
            });
        }

        let invalid = || CoreError::InvalidVersion {
            name: name.to_string(),
        };

        let value: u64 = name[..digits_len].parse().map_err(|_| invalid())?;
        match Self::new(value) {
            Some(version) if !version.is_zero() => Ok(version),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| CoreError::InvalidArgument {
                message: format!("\"{s}\" is not a valid target"),
            })
    }
}

impl TryFrom<i64> for Version {
    type Error = i64;

    /// Convert a stored value, handing it back if it is negative.
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value).map(Self).map_err(|_| value)
    }
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
