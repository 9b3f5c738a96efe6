//! Status-line classification.

use crate::grammar::MalformedLine;

/// Server accepted the connection.
pub(crate) const CONNECTION_ACCEPTED: u16 = 220;
/// Database list follows.
pub(crate) const DATABASES_FOLLOW: u16 = 110;
/// Strategy list follows.
pub(crate) const STRATEGIES_FOLLOW: u16 = 111;
/// Definitions follow.
pub(crate) const DEFINITIONS_FOLLOW: u16 = 150;
/// One definition follows.
pub(crate) const DEFINITION_FOLLOWS: u16 = 151;
/// Match list follows.
pub(crate) const MATCHES_FOLLOW: u16 = 152;
/// Command completed.
pub(crate) const OK: u16 = 250;
/// No match.
pub(crate) const NO_MATCH: u16 = 552;
/// No databases present.
pub(crate) const NO_DATABASES: u16 = 554;
/// No strategies available.
pub(crate) const NO_STRATEGIES: u16 = 555;

/// A reply line carrying a three-digit status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusLine {
    code: u16,
    text: String,
    raw: String,
}

impl StatusLine {
    /// Parses `ddd` or `ddd text`.
    pub(crate) fn parse(line: &str) -> Result<Self, MalformedLine> {
        let Some((digits, rest)) = line.split_at_checked(3) else {
            return Err(MalformedLine::new(line, "missing status code"));
        };
        if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(MalformedLine::new(line, "missing status code"));
        }
        let text = match rest.strip_prefix(' ') {
            Some(text) => text.trim_start(),
            None if rest.is_empty() => rest,
            None => return Err(MalformedLine::new(line, "status code not followed by a space")),
        };
        let code = digits
            .parse()
            .map_err(|_| MalformedLine::new(line, "missing status code"))?;
        Ok(Self {
            code,
            text: text.to_owned(),
            raw: line.to_owned(),
        })
    }

    pub(crate) const fn code(&self) -> u16 {
        self.code
    }

    /// Free text following the code.
    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    /// The line exactly as received.
    pub(crate) fn raw(&self) -> &str {
        &self.raw
    }

    pub(crate) fn into_raw(self) -> String {
        self.raw
    }
}
