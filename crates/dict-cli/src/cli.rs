//! Command-line interface definition for the `dict` binary.

use clap::{Parser, Subcommand, ValueEnum};
use dict_client::{ALL_DATABASES, DEFAULT_STRATEGY};
use dict_config::ServerEndpoint;

/// Output format for lookup results.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text for people.
    #[default]
    Human,
    /// JSON documents for scripts.
    Json,
}

/// Query a DICT dictionary server.
#[derive(Parser, Debug)]
#[command(name = "dict", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Server to query, as `dict://host[:port]`; overrides `--host`/`--port`.
    #[arg(long, value_name = "URL")]
    pub(crate) server: Option<ServerEndpoint>,
    /// Controls how results are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Lookups supported by the binary.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Lists the databases offered by the server.
    Databases,
    /// Lists the matching strategies offered by the server.
    Strategies,
    /// Lists headwords matching a word.
    Match {
        /// Word to match.
        word: String,
        /// Strategy name; `.` selects the server default.
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        strategy: String,
        /// Database name; `*` searches all, `!` stops at the first hit.
        #[arg(long, default_value = ALL_DATABASES)]
        database: String,
    },
    /// Prints the definitions of a word.
    Define {
        /// Word to define.
        word: String,
        /// Database name; `*` searches all, `!` stops at the first hit.
        #[arg(long, default_value = ALL_DATABASES)]
        database: String,
    },
}
