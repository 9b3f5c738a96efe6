//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use dict_client::DictError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Session(#[from] DictError),
    #[error("unknown database '{name}'; run `dict databases` to list them")]
    UnknownDatabase { name: String },
    #[error("unknown strategy '{name}'; run `dict strategies` to list them")]
    UnknownStrategy { name: String },
    #[error("failed to serialise output: {0}")]
    Serialise(serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] io::Error),
}

impl AppError {
    /// True when the lookup ran cleanly but the server had nothing to return.
    pub(crate) const fn is_empty_result(&self) -> bool {
        match self {
            Self::Session(error) => error.is_empty_result(),
            _ => false,
        }
    }
}
