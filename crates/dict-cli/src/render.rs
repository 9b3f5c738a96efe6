//! Renders lookup results as text or JSON.

use std::io::Write;

use dict_client::{Database, Definition, MatchingStrategy};
use serde::Serialize;

use crate::AppError;
use crate::cli::OutputFormat;

/// Result of one lookup, ready to be written out.
#[derive(Debug)]
pub(crate) enum Rendered {
    Databases(Vec<Database>),
    Strategies(Vec<MatchingStrategy>),
    Headwords(Vec<String>),
    Definitions(Vec<Definition>),
}

impl Rendered {
    pub(crate) fn write<W: Write>(&self, format: OutputFormat, out: &mut W) -> Result<(), AppError> {
        match format {
            OutputFormat::Json => self.write_json(out),
            OutputFormat::Human => self.write_human(out).map_err(AppError::WriteOutput),
        }
    }

    fn write_json<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        match self {
            Self::Databases(entries) => json_line(out, entries),
            Self::Strategies(entries) => json_line(out, entries),
            Self::Headwords(entries) => json_line(out, entries),
            Self::Definitions(entries) => json_line(out, entries),
        }
    }

    fn write_human<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        match self {
            Self::Databases(entries) => {
                catalog(out, entries.iter().map(|db| (db.name(), db.description())))
            }
            Self::Strategies(entries) => catalog(
                out,
                entries
                    .iter()
                    .map(|strategy| (strategy.name(), strategy.description())),
            ),
            Self::Headwords(entries) => {
                for headword in entries {
                    writeln!(out, "{headword}")?;
                }
                Ok(())
            }
            Self::Definitions(entries) => {
                for (index, definition) in entries.iter().enumerate() {
                    if index > 0 {
                        writeln!(out)?;
                    }
                    definition_block(out, definition)?;
                }
                Ok(())
            }
        }
    }
}

fn json_line<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), AppError> {
    serde_json::to_writer(&mut *out, value).map_err(AppError::Serialise)?;
    writeln!(out).map_err(AppError::WriteOutput)
}

fn catalog<'a, W: Write>(
    out: &mut W,
    entries: impl Iterator<Item = (&'a str, &'a str)> + Clone,
) -> std::io::Result<()> {
    let width = entries
        .clone()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    for (name, description) in entries {
        writeln!(out, "{name:<width$}  {description}")?;
    }
    Ok(())
}

fn definition_block<W: Write>(out: &mut W, definition: &Definition) -> std::io::Result<()> {
    let database = definition.database();
    if database.description().is_empty() {
        writeln!(out, "From [{}]:", database.name())?;
    } else {
        writeln!(out, "From {} [{}]:", database.description(), database.name())?;
    }
    writeln!(out)?;
    for line in definition.text() {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}
