//! Outbound command lines.

use std::fmt;

/// A client command, rendered without its line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command<'a> {
    ShowDatabases,
    ShowStrategies,
    Match {
        database: &'a str,
        strategy: &'a str,
        word: &'a str,
    },
    Define {
        database: &'a str,
        word: &'a str,
    },
    Quit,
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ShowDatabases => formatter.write_str("SHOW DB"),
            Self::ShowStrategies => formatter.write_str("SHOW STRAT"),
            Self::Match {
                database,
                strategy,
                word,
            } => write!(
                formatter,
                "MATCH {} {} {}",
                Argument(database),
                Argument(strategy),
                Argument(word)
            ),
            Self::Define { database, word } => {
                write!(formatter, "DEFINE {} {}", Argument(database), Argument(word))
            }
            Self::Quit => formatter.write_str("QUIT"),
        }
    }
}

/// Writes an argument verbatim when it is a plain atom and as a quoted
/// string otherwise.
struct Argument<'a>(&'a str);

impl Argument<'_> {
    fn needs_quotes(&self) -> bool {
        self.0.is_empty()
            || self
                .0
                .chars()
                .any(|ch| ch.is_whitespace() || ch.is_control() || matches!(ch, '"' | '\'' | '\\'))
    }
}

impl fmt::Display for Argument<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.needs_quotes() {
            return formatter.write_str(self.0);
        }
        formatter.write_str("\"")?;
        for ch in self.0.chars() {
            if matches!(ch, '"' | '\\') {
                formatter.write_str("\\")?;
            }
            write!(formatter, "{ch}")?;
        }
        formatter.write_str("\"")
    }
}
