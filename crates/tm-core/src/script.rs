//! Migration script parsing.
//!
//! A migration file holds an optional preamble, an `-- @up` header followed by
//! the forward body, and an `-- @down` header followed by the reverse body.
//! Bodies are kept verbatim, one `\n`-terminated line per source line.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

static MARKER_RE: OnceLock<Regex> = OnceLock::new();

fn marker_re() -> &'static Regex {
    MARKER_RE.get_or_init(|| Regex::new(r"^\s*--\s*@(up|down)\s*$").expect("valid regex"))
}

/// Section header directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Up,
    Down,
}

impl Marker {
    /// Match a header line, returning `None` for ordinary lines.
    pub fn match_line(line: &str) -> Option<Self> {
        let caps = marker_re().captures(line)?;
        match &caps[1] {
            "up" => Some(Marker::Up),
            _ => Some(Marker::Down),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Up => write!(f, "-- @up"),
            Marker::Down => write!(f, "-- @down"),
        }
    }
}

/// Structural problems in a migration file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("missing required up marker '-- @up'")]
    MissingUp,

    #[error("down before up: found '-- @down' before '-- @up'")]
    DownBeforeUp,

    #[error("duplicate up marker '-- @up'")]
    DuplicateUp,

    #[error("unexpected marker after down: '{0}'")]
    UnexpectedMarker(Marker),

    #[error("missing required down marker '-- @down'")]
    MissingDown,
}

/// Forward and reverse bodies of one migration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    /// Applied when moving forward to this migration's version
    pub up: String,

    /// Applied when reverting this migration
    pub down: String,
}

#[derive(Clone, Copy)]
enum Section {
    Preamble,
    Up,
    Down,
}

impl Script {
    /// Parse a script from its ordered lines.
    pub fn parse<I, S>(lines: I) -> Result<Self, ScriptError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut section = Section::Preamble;
        let mut script = Script::default();

        for line in lines {
            let line = line.as_ref();
            let marker = Marker::match_line(line);

            match (section, marker) {
                (Section::Preamble, Some(Marker::Up)) => section = Section::Up,
                (Section::Preamble, Some(Marker::Down)) => return Err(ScriptError::DownBeforeUp),
                (Section::Preamble, None) => {}
                (Section::Up, Some(Marker::Down)) => section = Section::Down,
                (Section::Up, Some(Marker::Up)) => return Err(ScriptError::DuplicateUp),
                (Section::Up, None) => push_line(&mut script.up, line),
                (Section::Down, Some(m)) => return Err(ScriptError::UnexpectedMarker(m)),
                (Section::Down, None) => push_line(&mut script.down, line),
            }
        }

        match section {
            Section::Preamble => Err(ScriptError::MissingUp),
            Section::Up => Err(ScriptError::MissingDown),
            Section::Down => Ok(script),
        }
    }

    /// Parse a script from file contents.
    pub fn parse_str(text: &str) -> Result<Self, ScriptError> {
        Self::parse(text.lines())
    }
}

fn push_line(body: &mut String, line: &str) {
    body.push_str(line);
    body.push('\n');
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
