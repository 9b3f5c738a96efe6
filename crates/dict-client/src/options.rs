//! Per-session transport settings.

use std::time::Duration;

use dict_config::{
    Config, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_BLOCK_LINES, DEFAULT_READ_TIMEOUT_SECS,
};

/// Deadlines and bounds applied to a session's transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Time allowed for the TCP connect; `None` uses a blocking connect.
    pub connect_timeout: Option<Duration>,
    /// Deadline for each socket read or write; `None` blocks indefinitely.
    pub read_timeout: Option<Duration>,
    /// Maximum number of lines accepted in one sentinel-terminated block.
    pub max_block_lines: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            read_timeout: Some(Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS)),
            max_block_lines: DEFAULT_MAX_BLOCK_LINES,
        }
    }
}

impl SessionOptions {
    /// Derives session options from the shared configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            read_timeout: config.read_timeout(),
            max_block_lines: config.max_block_lines(),
        }
    }

    /// Sets the block line cap.
    #[must_use]
    pub const fn with_max_block_lines(mut self, max_block_lines: usize) -> Self {
        self.max_block_lines = max_block_lines;
        self
    }
}
