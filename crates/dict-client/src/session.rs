//! The DICT protocol session.

use std::collections::HashSet;
use std::mem;
use std::net::TcpStream;
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use dict_config::{Config, ServerEndpoint};
use tracing::{debug, warn};

use crate::catalog::{Catalog, Named};
use crate::command::Command;
use crate::connect;
use crate::error::{DictError, TransportError};
use crate::grammar::{self, DefinitionHeader};
use crate::model::{Database, Definition, MatchingStrategy};
use crate::options::SessionOptions;
use crate::status::{
    CONNECTION_ACCEPTED, DATABASES_FOLLOW, DEFINITION_FOLLOWS, DEFINITIONS_FOLLOW, MATCHES_FOLLOW,
    NO_DATABASES, NO_MATCH, NO_STRATEGIES, OK, STRATEGIES_FOLLOW, StatusLine,
};
use crate::transport::{DictStream, Interrupt, LineTransport};

/// Log target for session operations.
pub(crate) const SESSION_TARGET: &str = "dict_client::session";

/// A client session with one DICT server.
///
/// The session owns a single connection. Every operation holds the session
/// lock for its full command/response exchange, so concurrent callers are
/// served one at a time and never interleave on the wire. The database and
/// strategy catalogs are fetched on first use and then served from memory
/// until the session ends.
///
/// # Example
///
/// ```ignore
/// use dict_client::{Database, DictSession};
///
/// let session = DictSession::establish("dict.org", 2628)?;
/// for definition in session.definitions("sun", &Database::all())? {
///     println!("{}: {}", definition.database(), definition.text().join("\n"));
/// }
/// session.close();
/// ```
pub struct DictSession<S: DictStream = TcpStream> {
    host: String,
    state: Mutex<SessionState<S>>,
    // Released once the session is closed or broken so the socket clone does
    // not outlive the connection.
    interrupter: Mutex<Option<Box<dyn Interrupt>>>,
}

enum SessionState<S> {
    Open(OpenSession<S>),
    Broken { reason: String },
    Closed,
}

struct OpenSession<S> {
    transport: LineTransport<S>,
    databases: Catalog<Database>,
    strategies: Catalog<MatchingStrategy>,
}

impl DictSession<TcpStream> {
    /// Connects to `host:port` with default options and validates the greeting.
    ///
    /// # Errors
    ///
    /// Fails when the host cannot be resolved or reached, or when the server
    /// does not greet with status 220.
    pub fn establish(host: &str, port: u16) -> Result<Self, DictError> {
        Self::establish_with(&ServerEndpoint::new(host, port), &SessionOptions::default())
    }

    /// Connects to `host` on the well-known DICT port, 2628.
    ///
    /// # Errors
    ///
    /// As for [`DictSession::establish`].
    pub fn establish_default(host: &str) -> Result<Self, DictError> {
        Self::establish_with(
            &ServerEndpoint::with_default_port(host),
            &SessionOptions::default(),
        )
    }

    /// Connects to the server named by the configuration.
    ///
    /// # Errors
    ///
    /// As for [`DictSession::establish`].
    pub fn connect(config: &Config) -> Result<Self, DictError> {
        Self::establish_with(&config.server(), &SessionOptions::from_config(config))
    }

    /// Connects to `endpoint` with explicit options.
    ///
    /// # Errors
    ///
    /// As for [`DictSession::establish`].
    pub fn establish_with(
        endpoint: &ServerEndpoint,
        options: &SessionOptions,
    ) -> Result<Self, DictError> {
        let stream = connect::open(endpoint, options)?;
        Self::from_stream(stream, endpoint.host(), options)
    }
}

impl<S: DictStream> DictSession<S> {
    /// Starts a session over an already connected stream.
    ///
    /// Reads exactly one greeting line and accepts the session only when it
    /// carries status 220.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::Handshake`] when the greeting cannot be read and
    /// [`DictError::Greeting`] when it is malformed or refuses the session.
    pub fn from_stream(
        stream: S,
        host: impl Into<String>,
        options: &SessionOptions,
    ) -> Result<Self, DictError> {
        let host = host.into();
        let interrupter = match stream.interrupter() {
            Ok(interrupter) => Some(interrupter),
            Err(error) => {
                warn!(
                    target: SESSION_TARGET,
                    host = %host,
                    error = %error,
                    "stream cannot be interrupted; close will wait for in-flight requests"
                );
                None
            }
        };

        let mut transport = LineTransport::new(stream, options.max_block_lines);
        let greeting = match transport.read_line() {
            Ok(line) => line,
            Err(source) => return Err(DictError::Handshake { host, source }),
        };
        let status = match StatusLine::parse(&greeting) {
            Ok(status) if status.code() == CONNECTION_ACCEPTED => status,
            _ => {
                return Err(DictError::Greeting {
                    host,
                    reply: greeting,
                });
            }
        };

        debug!(
            target: SESSION_TARGET,
            host = %host,
            banner = status.text(),
            "session established"
        );

        Ok(Self {
            host,
            state: Mutex::new(SessionState::Open(OpenSession {
                transport,
                databases: Catalog::NotLoaded,
                strategies: Catalog::NotLoaded,
            })),
            interrupter: Mutex::new(interrupter),
        })
    }

    /// Host this session is connected to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true until the session is closed or broken.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(*self.lock_state(), SessionState::Open(_))
    }

    /// Sends `QUIT` and closes the connection.
    ///
    /// Never fails: shutdown errors are logged and dropped. Calling it again
    /// is a no-op. When another thread is mid-request the transport is shut
    /// down first so that request fails promptly instead of holding the lock.
    pub fn close(&self) {
        let mut state = match self.state.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poison)) => poison.into_inner(),
            Err(TryLockError::WouldBlock) => {
                debug!(
                    target: SESSION_TARGET,
                    host = %self.host,
                    "interrupting in-flight request"
                );
                self.interrupt();
                self.lock_state()
            }
        };

        match mem::replace(&mut *state, SessionState::Closed) {
            SessionState::Open(mut open) => {
                if let Err(error) = open.transport.send(&Command::Quit) {
                    debug!(
                        target: SESSION_TARGET,
                        host = %self.host,
                        error = %error,
                        "QUIT could not be sent"
                    );
                }
                drop(open);
                self.release_interrupter();
                debug!(target: SESSION_TARGET, host = %self.host, "session closed");
            }
            SessionState::Broken { .. } | SessionState::Closed => self.release_interrupter(),
        }
    }

    /// Lists the databases offered by the server.
    ///
    /// The first successful call fetches the list with `SHOW DB`; later calls
    /// return the cached list without any network traffic.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::NoDatabases`] when the server has none, and a
    /// protocol or transport error when the exchange fails.
    pub fn databases(&self) -> Result<Vec<Database>, DictError> {
        self.with_open(|open| {
            open.ensure_databases()?;
            Ok(open.databases.entries().to_vec())
        })
    }

    /// Lists the matching strategies offered by the server.
    ///
    /// Cached after the first successful `SHOW STRAT`.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::NoStrategies`] when the server has none, and a
    /// protocol or transport error when the exchange fails.
    pub fn strategies(&self) -> Result<Vec<MatchingStrategy>, DictError> {
        self.with_open(|open| {
            open.ensure_strategies()?;
            Ok(open.strategies.entries().to_vec())
        })
    }

    /// Finds headwords matching `word` under `strategy` in `database`.
    ///
    /// Headwords are returned in server order with duplicates removed.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::NoMatches`] when nothing matches, and a protocol
    /// or transport error when the exchange fails.
    pub fn matches(
        &self,
        word: &str,
        strategy: &MatchingStrategy,
        database: &Database,
    ) -> Result<Vec<String>, DictError> {
        self.with_open(|open| open.matches(word, strategy, database))
    }

    /// Retrieves every definition of `word` from `database`.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::NoDefinitions`] when the server does not answer
    /// with definitions, and a protocol or transport error when the exchange
    /// fails.
    pub fn definitions(&self, word: &str, database: &Database) -> Result<Vec<Definition>, DictError> {
        self.with_open(|open| open.definitions(word, database))
    }

    fn with_open<T, F>(&self, operation: F) -> Result<T, DictError>
    where
        F: FnOnce(&mut OpenSession<S>) -> Result<T, DictError>,
    {
        let mut state = self.lock_state();
        let open = match &mut *state {
            SessionState::Open(open) => open,
            SessionState::Broken { reason } => {
                return Err(DictError::Broken {
                    reason: reason.clone(),
                });
            }
            SessionState::Closed => return Err(DictError::Closed),
        };

        let result = operation(open);
        if let Err(error) = &result
            && error.desynchronises()
        {
            warn!(
                target: SESSION_TARGET,
                host = %self.host,
                error = %error,
                "session is no longer usable"
            );
            *state = SessionState::Broken {
                reason: error.to_string(),
            };
            self.release_interrupter();
        }
        result
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn interrupter(&self) -> MutexGuard<'_, Option<Box<dyn Interrupt>>> {
        self.interrupter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn interrupt(&self) {
        if let Some(interrupter) = self.interrupter().as_ref() {
            interrupter.interrupt();
        }
    }

    /// Interrupts the stream one last time and drops the handle.
    fn release_interrupter(&self) {
        if let Some(interrupter) = self.interrupter().take() {
            interrupter.interrupt();
        }
    }
}

impl<S: DictStream> OpenSession<S> {
    fn ensure_databases(&mut self) -> Result<(), DictError> {
        if self.databases.is_loaded() {
            debug!(target: SESSION_TARGET, "database list served from cache");
            return Ok(());
        }
        let entries = self.fetch_catalog(
            &Command::ShowDatabases,
            DATABASES_FOLLOW,
            &[NO_MATCH, NO_DATABASES],
            || DictError::NoDatabases,
            Database::new,
        )?;
        self.databases = entries;
        Ok(())
    }

    fn ensure_strategies(&mut self) -> Result<(), DictError> {
        if self.strategies.is_loaded() {
            debug!(target: SESSION_TARGET, "strategy list served from cache");
            return Ok(());
        }
        let entries = self.fetch_catalog(
            &Command::ShowStrategies,
            STRATEGIES_FOLLOW,
            &[NO_MATCH, NO_STRATEGIES],
            || DictError::NoStrategies,
            MatchingStrategy::new,
        )?;
        self.strategies = entries;
        Ok(())
    }

    fn fetch_catalog<T, E, B>(
        &mut self,
        command: &Command<'_>,
        expected: u16,
        empty: &[u16],
        on_empty: E,
        build: B,
    ) -> Result<Catalog<T>, DictError>
    where
        T: Named,
        E: FnOnce() -> DictError,
        B: Fn(String, String) -> T,
    {
        let status = self.exchange(command)?;
        if empty.contains(&status.code()) {
            return Err(on_empty());
        }
        if status.code() != expected {
            return Err(unexpected_status(command, status));
        }

        let lines = self.read_block_with_ack(command)?;
        let entries = lines
            .iter()
            .map(|line| grammar::parse_catalog_entry(line).map(|(name, text)| build(name, text)))
            .collect::<Result<Vec<T>, _>>()?;
        debug!(
            target: SESSION_TARGET,
            command = %command,
            entries = entries.len(),
            "catalog loaded"
        );
        Ok(Catalog::from_entries(entries))
    }

    fn matches(
        &mut self,
        word: &str,
        strategy: &MatchingStrategy,
        database: &Database,
    ) -> Result<Vec<String>, DictError> {
        self.ensure_databases()?;

        let command = Command::Match {
            database: database.name(),
            strategy: strategy.name(),
            word,
        };
        let status = self.exchange(&command)?;
        match status.code() {
            MATCHES_FOLLOW => {}
            NO_MATCH => {
                return Err(DictError::NoMatches {
                    word: word.to_owned(),
                });
            }
            _ => return Err(unexpected_status(&command, status)),
        }

        let lines = self.read_block_with_ack(&command)?;
        let mut seen = HashSet::new();
        let mut headwords = Vec::new();
        for line in &lines {
            let headword = grammar::parse_match_entry(line)?;
            if seen.insert(headword.clone()) {
                headwords.push(headword);
            }
        }
        Ok(headwords)
    }

    fn definitions(&mut self, word: &str, database: &Database) -> Result<Vec<Definition>, DictError> {
        self.ensure_databases()?;

        let command = Command::Define {
            database: database.name(),
            word,
        };
        let status = self.exchange(&command)?;
        if status.code() != DEFINITIONS_FOLLOW {
            return Err(DictError::NoDefinitions {
                word: word.to_owned(),
                reply: status.into_raw(),
            });
        }

        let mut received = Vec::new();
        loop {
            let status = self.read_status(&command)?;
            match status.code() {
                OK => break,
                DEFINITION_FOLLOWS => {
                    if received.len() >= self.transport.max_block_lines() {
                        return Err(TransportError::BlockTooLong {
                            limit: self.transport.max_block_lines(),
                        }
                        .into());
                    }
                    let body = self.transport.read_block()?;
                    received.push((status, body));
                }
                _ => {
                    return Err(DictError::ProtocolViolation {
                        command: command.to_string(),
                        reply: status.into_raw(),
                    });
                }
            }
        }

        received
            .into_iter()
            .map(|(header, body)| -> Result<Definition, DictError> {
                let fields = grammar::parse_definition_header(header.raw(), header.text())?;
                Ok(Definition::new(word, self.resolve_database(&fields), body))
            })
            .collect()
    }

    /// Looks up the database named in a definition header.
    ///
    /// Names the server never advertised get a placeholder built from the
    /// header itself.
    fn resolve_database(&self, header: &DefinitionHeader) -> Database {
        if let Some(known) = self.databases.find(&header.database) {
            return known.clone();
        }
        warn!(
            target: SESSION_TARGET,
            database = %header.database,
            headword = %header.word,
            "definition names a database missing from the catalog"
        );
        Database::new(
            header.database.clone(),
            header.description.clone().unwrap_or_default(),
        )
    }

    /// Sends `command` and reads its initial status line.
    fn exchange(&mut self, command: &Command<'_>) -> Result<StatusLine, DictError> {
        self.transport.send(command)?;
        let status = self.read_status(command)?;
        debug!(
            target: SESSION_TARGET,
            command = %command,
            code = status.code(),
            "status received"
        );
        Ok(status)
    }

    fn read_status(&mut self, command: &Command<'_>) -> Result<StatusLine, DictError> {
        let line = self.transport.read_line()?;
        match StatusLine::parse(&line) {
            Ok(status) => Ok(status),
            Err(_) => Err(DictError::ProtocolViolation {
                command: command.to_string(),
                reply: line,
            }),
        }
    }

    /// Reads a text block and the completion status that follows it.
    fn read_block_with_ack(&mut self, command: &Command<'_>) -> Result<Vec<String>, DictError> {
        let lines = self.transport.read_block()?;
        let ack = self.read_status(command)?;
        if ack.code() != OK {
            warn!(
                target: SESSION_TARGET,
                command = %command,
                reply = ack.raw(),
                "unexpected completion status after block"
            );
        }
        Ok(lines)
    }
}

fn unexpected_status(command: &Command<'_>, status: StatusLine) -> DictError {
    DictError::UnexpectedStatus {
        command: command.to_string(),
        reply: status.into_raw(),
    }
}
