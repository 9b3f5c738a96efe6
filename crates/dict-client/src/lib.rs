//! Client for the DICT dictionary server protocol (RFC 2229).
//!
//! A [`DictSession`] owns one TCP connection to a DICT server. It validates
//! the server greeting, issues `SHOW DB`, `SHOW STRAT`, `MATCH` and `DEFINE`
//! commands, and turns the line-oriented replies into [`Database`],
//! [`MatchingStrategy`] and [`Definition`] values. The database and strategy
//! catalogs are fetched lazily and cached for the lifetime of the session.
//!
//! Sessions are `Send + Sync`. Operations are serialised on an internal lock,
//! so a session may be shared between threads behind an `Arc`. Any transport
//! failure, or a reply that leaves the stream out of step, marks the session
//! broken; later calls fail fast with [`DictError::Broken`].
//!
//! The session is generic over a [`DictStream`], which lets tests drive it
//! with in-memory scripts instead of sockets.

mod catalog;
mod command;
mod connect;
mod error;
mod grammar;
mod model;
mod options;
mod session;
mod status;
mod transport;


pub use error::{DictError, TransportError};
pub use grammar::MalformedLine;
pub use model::{
    ALL_DATABASES, DEFAULT_STRATEGY, Database, Definition, FIRST_MATCH, MatchingStrategy,
};
pub use options::SessionOptions;
pub use session::DictSession;
pub use transport::{DictStream, Interrupt};
