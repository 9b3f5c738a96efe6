use crate::logging::LogFormat;
use crate::server::ServerEndpoint;

/// Well-known TCP port registered for the DICT protocol.
pub const DEFAULT_PORT: u16 = 2628;

/// Public DICT server used when nothing else is configured.
pub const DEFAULT_HOST: &str = "dict.org";

/// Seconds allowed for the TCP connect before giving up.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Seconds a socket read or write may block.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Line cap for a single sentinel-terminated block.
pub const DEFAULT_MAX_BLOCK_LINES: usize = 100_000;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Owned default host, for serde and `ortho_config` defaults.
pub fn default_host_string() -> String {
    DEFAULT_HOST.to_owned()
}

/// Default DICT port.
pub const fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Default connect timeout in seconds.
pub const fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

/// Default read timeout in seconds.
pub const fn default_read_timeout_secs() -> u64 {
    DEFAULT_READ_TIMEOUT_SECS
}

/// Default block line cap.
pub const fn default_max_block_lines() -> usize {
    DEFAULT_MAX_BLOCK_LINES
}

/// Default log filter expression used by the binaries.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Endpoint built from the default host and port.
pub fn default_server_endpoint() -> ServerEndpoint {
    ServerEndpoint::new(DEFAULT_HOST, DEFAULT_PORT)
}
