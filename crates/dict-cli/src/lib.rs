//! Runtime for the `dict` command-line client.
//!
//! The runtime splits configuration flags from command tokens, loads the
//! layered configuration, installs telemetry, opens one DICT session, runs a
//! single lookup and renders the result. The session is closed on every path
//! once it has been opened. Standard streams and the configuration loader are
//! injected so tests can drive the whole flow in-process.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use dict_client::{
    ALL_DATABASES, DEFAULT_STRATEGY, Database, DictSession, FIRST_MATCH, MatchingStrategy,
};
use dict_config::Config;
use tracing::debug;

mod cli;
mod config;
mod errors;
mod render;
mod telemetry;

#[cfg(test)]
mod tests;

use cli::{Cli, CliCommand};
pub use cli::OutputFormat;
use config::{ConfigLoader, OrthoConfigLoader, command_arguments, split_config_arguments};
pub(crate) use errors::AppError;
use render::Rendered;

const CLI_TARGET: &str = "dict_cli";

/// Exit status for lookups that completed but found nothing.
const EMPTY_RESULT_EXIT: u8 = 2;

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);

    let cli = match Cli::try_parse_from(command_arguments(&args, &split)) {
        Ok(cli) => cli,
        Err(error) => return report_usage(error, stdout, stderr),
    };

    let outcome = loader.load(&split.config_arguments).and_then(|config| {
        let config = match &cli.server {
            Some(endpoint) => config.with_server(endpoint),
            None => config,
        };
        telemetry::initialise(&config)?;
        execute(&cli, &config, stdout)
    });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) if error.is_empty_result() => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::from(EMPTY_RESULT_EXIT)
        }
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn report_usage<W: Write, E: Write>(error: clap::Error, stdout: &mut W, stderr: &mut E) -> ExitCode {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(stdout, "{}", error.render());
            ExitCode::SUCCESS
        }
        _ => {
            let _ = write!(stderr, "{}", AppError::CliUsage(error));
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(cli: &Cli, config: &Config, stdout: &mut W) -> Result<(), AppError> {
    let session = DictSession::connect(config)?;
    let outcome = lookup(&session, &cli.command);
    session.close();
    debug!(target: CLI_TARGET, host = session.host(), "session finished");
    outcome?.write(cli.output, stdout)
}

fn lookup(session: &DictSession, command: &CliCommand) -> Result<Rendered, AppError> {
    match command {
        CliCommand::Databases => Ok(Rendered::Databases(session.databases()?)),
        CliCommand::Strategies => Ok(Rendered::Strategies(session.strategies()?)),
        CliCommand::Match {
            word,
            strategy,
            database,
        } => {
            let strategy = resolve_strategy(session, strategy)?;
            let database = resolve_database(session, database)?;
            Ok(Rendered::Headwords(
                session.matches(word, &strategy, &database)?,
            ))
        }
        CliCommand::Define { word, database } => {
            let database = resolve_database(session, database)?;
            Ok(Rendered::Definitions(session.definitions(word, &database)?))
        }
    }
}

/// Maps a database name from the command line onto a server database.
fn resolve_database(session: &DictSession, name: &str) -> Result<Database, AppError> {
    match name {
        ALL_DATABASES => Ok(Database::all()),
        FIRST_MATCH => Ok(Database::first_match()),
        _ => session
            .databases()?
            .into_iter()
            .find(|database| database.name() == name)
            .ok_or_else(|| AppError::UnknownDatabase {
                name: name.to_owned(),
            }),
    }
}

fn resolve_strategy(session: &DictSession, name: &str) -> Result<MatchingStrategy, AppError> {
    if name == DEFAULT_STRATEGY {
        return Ok(MatchingStrategy::server_default());
    }
    session
        .strategies()?
        .into_iter()
        .find(|strategy| strategy.name() == name)
        .ok_or_else(|| AppError::UnknownStrategy {
            name: name.to_owned(),
        })
}
