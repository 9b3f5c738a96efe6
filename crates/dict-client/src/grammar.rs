//! Field grammar for the data lines of DICT replies.
//!
//! Replies mix bare atoms and double-quoted strings separated by spaces, for
//! example `wn "WordNet (r) 3.0"` in a database list or
//! `151 "ice cream" wn "WordNet"` as a definition header. Every parser here
//! returns a [`MalformedLine`] instead of guessing when a field is missing.

use std::fmt;

use thiserror::Error;

/// A server line that does not satisfy the field contract of its position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct MalformedLine {
    line: String,
    reason: &'static str,
}

impl MalformedLine {
    pub(crate) fn new(line: &str, reason: &'static str) -> Self {
        Self {
            line: line.to_owned(),
            reason,
        }
    }

    /// The offending line.
    #[must_use]
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Which field contract the line broke.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.reason
    }
}

impl fmt::Display for MalformedLine {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} in {:?}", self.reason, self.line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) text: String,
    pub(crate) quoted: bool,
}

/// Splits a line into space-separated atoms and quoted strings.
///
/// Inside quotes a backslash escapes the following character.
pub(crate) fn tokenize(line: &str) -> Result<Vec<Token>, MalformedLine> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&next) = chars.peek() {
        if next.is_whitespace() {
            chars.next();
            continue;
        }

        let mut text = String::new();
        if next == '"' {
            chars.next();
            let mut closed = false;
            while let Some(ch) = chars.next() {
                match ch {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some(escaped) => text.push(escaped),
                        None => break,
                    },
                    other => text.push(other),
                }
            }
            if !closed {
                return Err(MalformedLine::new(line, "unterminated quoted string"));
            }
            tokens.push(Token { text, quoted: true });
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                text.push(ch);
                chars.next();
            }
            tokens.push(Token {
                text,
                quoted: false,
            });
        }
    }

    Ok(tokens)
}

/// Parses `name description` from a database or strategy listing.
///
/// The description is free text; surrounding quotes are removed.
pub(crate) fn parse_catalog_entry(line: &str) -> Result<(String, String), MalformedLine> {
    let Some((name, description)) = line.trim().split_once(' ') else {
        return Err(MalformedLine::new(line, "missing description"));
    };
    if name.is_empty() || name.contains('"') {
        return Err(MalformedLine::new(line, "missing name"));
    }
    Ok((name.to_owned(), strip_quotes(description.trim())))
}

fn strip_quotes(description: &str) -> String {
    match tokenize(description).as_deref() {
        Ok([only]) if only.quoted => only.text.clone(),
        _ => description.replace('"', ""),
    }
}

/// Extracts the quoted headword from a match listing line such as `wn "sun"`.
pub(crate) fn parse_match_entry(line: &str) -> Result<String, MalformedLine> {
    tokenize(line)?
        .into_iter()
        .find(|token| token.quoted)
        .map(|token| token.text)
        .ok_or_else(|| MalformedLine::new(line, "missing quoted headword"))
}

/// Fields of a `151` definition header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefinitionHeader {
    pub(crate) word: String,
    pub(crate) database: String,
    pub(crate) description: Option<String>,
}

/// Parses the text after the `151` code: `word database ["description"]`.
pub(crate) fn parse_definition_header(
    raw: &str,
    text: &str,
) -> Result<DefinitionHeader, MalformedLine> {
    let tokens = tokenize(text).map_err(|error| MalformedLine::new(raw, error.reason))?;
    let mut fields = tokens.into_iter();
    let word = fields
        .next()
        .ok_or_else(|| MalformedLine::new(raw, "missing headword"))?;
    let database = fields
        .next()
        .filter(|token| !token.text.is_empty())
        .ok_or_else(|| MalformedLine::new(raw, "missing database name"))?;
    let description = fields.next().map(|token| token.text);
    Ok(DefinitionHeader {
        word: word.text,
        database: database.text,
        description,
    })
}
