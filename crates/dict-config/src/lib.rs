//! Shared configuration for the DICT client library and the `dict` binary.
//!
//! Values are layered by `ortho_config`: built-in defaults first, then an
//! optional configuration file (`--config-path` or `DICT_CONFIG_PATH`), then
//! `DICT_*` environment variables, and finally command-line flags. The
//! resulting [`Config`] exposes typed accessors so consumers never have to
//! interpret the raw numeric fields themselves.

mod defaults;
mod logging;
mod server;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_MAX_BLOCK_LINES,
    DEFAULT_PORT, DEFAULT_READ_TIMEOUT_SECS, default_connect_timeout_secs, default_host_string,
    default_log_filter, default_log_filter_string, default_log_format, default_max_block_lines,
    default_port, default_read_timeout_secs, default_server_endpoint,
};
pub use logging::LogFormat;
pub use server::{ServerEndpoint, ServerParseError};

/// Layered configuration for DICT sessions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "DICT")]
pub struct Config {
    /// Host name or address of the DICT server.
    #[serde(default = "default_host_string")]
    #[ortho_config(default = default_host_string())]
    pub host: String,
    /// TCP port of the DICT server.
    #[serde(default = "default_port")]
    #[ortho_config(default = default_port())]
    pub port: u16,
    /// Seconds allowed for the TCP connection to be established; `0` waits
    /// for the operating system's own connect timeout.
    #[serde(default = "default_connect_timeout_secs")]
    #[ortho_config(default = default_connect_timeout_secs())]
    pub connect_timeout_secs: u64,
    /// Seconds a single read or write may block; `0` waits indefinitely.
    #[serde(default = "default_read_timeout_secs")]
    #[ortho_config(default = default_read_timeout_secs())]
    pub read_timeout_secs: u64,
    /// Upper bound on the number of lines accepted in one multi-line block.
    #[serde(default = "default_max_block_lines")]
    #[ortho_config(default = default_max_block_lines())]
    pub max_block_lines: usize,
    /// `tracing` filter expression applied by the binaries.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format of the log subscriber.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host_string(),
            port: default_port(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            max_block_lines: default_max_block_lines(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Endpoint of the configured DICT server.
    #[must_use]
    pub fn server(&self) -> ServerEndpoint {
        ServerEndpoint::new(self.host.clone(), self.port)
    }

    /// Replaces the configured host and port with `endpoint`.
    #[must_use]
    pub fn with_server(mut self, endpoint: &ServerEndpoint) -> Self {
        self.host = endpoint.host().to_owned();
        self.port = endpoint.port();
        self
    }

    /// Time allowed for establishing the TCP connection, or `None` for a
    /// plain blocking connect.
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        match self.connect_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Per-operation socket timeout, or `None` when reads may block forever.
    #[must_use]
    pub const fn read_timeout(&self) -> Option<Duration> {
        match self.read_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Maximum number of lines accepted in a sentinel-terminated block.
    #[must_use]
    pub const fn max_block_lines(&self) -> usize {
        self.max_block_lines
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
