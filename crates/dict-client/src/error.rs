//! Error types for DICT sessions.

use std::io;

use thiserror::Error;

use crate::grammar::MalformedLine;

/// Errors raised by a [`crate::DictSession`].
#[derive(Debug, Error)]
pub enum DictError {
    /// The server host name could not be resolved.
    #[error("failed to resolve DICT server {host}: {source}")]
    Resolve {
        /// Host that failed to resolve.
        host: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The TCP connection could not be established.
    #[error("cannot connect to {host}: {source}")]
    Connect {
        /// Host that refused or timed out.
        host: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The connection failed before a greeting was received.
    #[error("cannot connect to {host}: {source}")]
    Handshake {
        /// Host whose greeting could not be read.
        host: String,
        /// The transport failure.
        #[source]
        source: TransportError,
    },

    /// The greeting was malformed or did not accept the connection.
    #[error("cannot connect to {host}: server replied '{reply}'")]
    Greeting {
        /// Host that sent the greeting.
        host: String,
        /// The greeting line as received.
        reply: String,
    },

    /// The session has been closed by the caller.
    #[error("session closed")]
    Closed,

    /// An earlier failure left the stream in an unknown position.
    #[error("session is unusable after an earlier failure: {reason}")]
    Broken {
        /// Description of the failure that broke the session.
        reason: String,
    },

    /// The server reported that no databases are available.
    #[error("there are no databases")]
    NoDatabases,

    /// The server reported that no matching strategies are available.
    #[error("there are no strategies available")]
    NoStrategies,

    /// The server found no headwords matching the query.
    #[error("there are no matches for '{word}'")]
    NoMatches {
        /// The word that was matched.
        word: String,
    },

    /// The server returned no definitions.
    #[error("there are no definitions for '{word}' ({reply})")]
    NoDefinitions {
        /// The word that was looked up.
        word: String,
        /// Status line sent instead of the definitions.
        reply: String,
    },

    /// The server answered a command with a status the command does not expect.
    #[error("unexpected reply to '{command}': {reply}")]
    UnexpectedStatus {
        /// The command line that was sent.
        command: String,
        /// The raw status line received.
        reply: String,
    },

    /// The server sent a line that breaks the reply structure of a command.
    #[error("protocol violation while handling '{command}': {reply}")]
    ProtocolViolation {
        /// The command line that was sent.
        command: String,
        /// The offending line.
        reply: String,
    },

    /// A data line inside a complete block could not be parsed.
    #[error("malformed line from server: {0}")]
    MalformedLine(#[from] MalformedLine),

    /// Reading from or writing to the server failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl DictError {
    /// Returns true when the server answered with an empty result rather than
    /// a fault; callers may treat these as an empty answer.
    #[must_use]
    pub const fn is_empty_result(&self) -> bool {
        matches!(
            self,
            Self::NoDatabases
                | Self::NoStrategies
                | Self::NoMatches { .. }
                | Self::NoDefinitions { .. }
        )
    }

    /// Returns true when the stream position can no longer be trusted.
    pub(crate) const fn desynchronises(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::ProtocolViolation { .. })
    }
}

/// Line transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The peer closed the stream.
    #[error("server closed the connection")]
    ConnectionClosed,

    /// A line exceeded the accepted length without a terminator.
    #[error("line exceeded {limit} bytes without a terminator")]
    LineTooLong {
        /// Maximum accepted line length in bytes.
        limit: usize,
    },

    /// A sentinel-terminated block exceeded the configured line cap.
    #[error("block exceeded {limit} lines without a terminating '.'")]
    BlockTooLong {
        /// Maximum accepted number of lines.
        limit: usize,
    },
}
