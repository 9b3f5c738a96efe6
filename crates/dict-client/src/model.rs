//! Plain records returned by a DICT session.

use std::fmt;

use serde::Serialize;

/// Database name asking the server to search every database.
pub const ALL_DATABASES: &str = "*";

/// Database name asking the server to stop at the first database with a hit.
pub const FIRST_MATCH: &str = "!";

/// Strategy name selecting the server's default matching strategy.
pub const DEFAULT_STRATEGY: &str = ".";

/// A dictionary corpus advertised by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Database {
    name: String,
    description: String,
}

impl Database {
    /// Creates a database descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// The `*` pseudo-database covering every corpus.
    #[must_use]
    pub fn all() -> Self {
        Self::new(ALL_DATABASES, "All databases")
    }

    /// The `!` pseudo-database returning results from the first corpus that has any.
    #[must_use]
    pub fn first_match() -> Self {
        Self::new(FIRST_MATCH, "First matching database")
    }

    /// Short identifier used on the wire.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for Database {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.name)
    }
}

/// A word-matching algorithm supported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MatchingStrategy {
    name: String,
    description: String,
}

impl MatchingStrategy {
    /// Creates a strategy descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// The `.` pseudo-strategy deferring to the server's default.
    #[must_use]
    pub fn server_default() -> Self {
        Self::new(DEFAULT_STRATEGY, "Server default")
    }

    /// Short identifier used on the wire.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for MatchingStrategy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.name)
    }
}

/// One definition of a word, as returned by a single database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    word: String,
    database: Database,
    text: Vec<String>,
}

impl Definition {
    pub(crate) fn new(word: impl Into<String>, database: Database, text: Vec<String>) -> Self {
        Self {
            word: word.into(),
            database,
            text,
        }
    }

    /// The word that was looked up.
    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Database the definition came from.
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.database
    }

    /// Definition body, one entry per line.
    #[must_use]
    pub fn text(&self) -> &[String] {
        &self.text
    }
}
