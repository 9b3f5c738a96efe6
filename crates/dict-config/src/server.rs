use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::{Host, Url};

use crate::defaults::DEFAULT_PORT;

const SCHEME: &str = "dict";

/// Address of a DICT server.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct ServerEndpoint {
    host: String,
    port: u16,
}

impl ServerEndpoint {
    /// Builds an endpoint from a host and port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Builds an endpoint on the well-known DICT port.
    #[must_use]
    pub fn with_default_port(host: impl Into<String>) -> Self {
        Self::new(host, DEFAULT_PORT)
    }

    /// Host name or address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(formatter, "{SCHEME}://[{}]:{}", self.host, self.port)
        } else {
            write!(formatter, "{SCHEME}://{}:{}", self.host, self.port)
        }
    }
}

/// Parses `dict://host[:port]`; a bare `host[:port]` is accepted too.
impl FromStr for ServerEndpoint {
    type Err = ServerParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let url = if input.contains("://") {
            Url::parse(input)?
        } else {
            Url::parse(&format!("{SCHEME}://{input}"))?
        };
        if url.scheme() != SCHEME {
            return Err(ServerParseError::UnsupportedScheme(url.scheme().to_owned()));
        }
        let host = match url.host() {
            Some(Host::Domain(name)) if !name.is_empty() => name.to_owned(),
            Some(Host::Ipv4(address)) => address.to_string(),
            Some(Host::Ipv6(address)) => address.to_string(),
            _ => return Err(ServerParseError::MissingHost(input.to_owned())),
        };
        Ok(Self::new(host, url.port().unwrap_or(DEFAULT_PORT)))
    }
}

/// Errors encountered while parsing a [`ServerEndpoint`] from text.
#[derive(Debug, Error)]
pub enum ServerParseError {
    /// Scheme was something other than `dict`.
    #[error("unsupported server scheme '{0}'")]
    UnsupportedScheme(String),
    /// No host name was present.
    #[error("missing host in '{0}'")]
    MissingHost(String),
    /// URL failed to parse.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}
