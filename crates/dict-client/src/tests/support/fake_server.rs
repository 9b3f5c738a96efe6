//! Fake DICT server for socket-level tests.
//!
//! Accepts a single connection, sends a greeting, and answers each command
//! line from a canned response table until the client quits or disconnects.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

/// A scripted DICT server running on a background thread.
pub(in crate::tests) struct FakeDictServer {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    result: Arc<Mutex<Option<Result<()>>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeDictServer {
    /// Spawns a server on an ephemeral port.
    ///
    /// `responses` maps a command line to the lines sent back. A command
    /// mapped to no lines is read and left unanswered. Unknown commands get
    /// `500`.
    pub fn spawn(greeting: &str, responses: HashMap<String, Vec<String>>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake server")?;
        listener
            .set_nonblocking(true)
            .context("fake server nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));
        let requests_clone = Arc::clone(&requests);
        let result_clone = Arc::clone(&result);
        let greeting = greeting.to_owned();
        let handle = thread::spawn(move || {
            let outcome = Self::serve_client(&listener, &greeting, &responses, &requests_clone);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });
        Ok(Self {
            port,
            requests,
            result,
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Commands received so far, terminators removed.
    pub fn requests(&self) -> Result<Vec<String>> {
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    /// Waits for the server thread to finish and returns every recorded command.
    pub fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake server thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake server result: {error}"))?
            .take()
        {
            outcome.context("fake server failed")?;
        }
        self.requests()
    }

    fn serve_client(
        listener: &TcpListener,
        greeting: &str,
        responses: &HashMap<String, Vec<String>>,
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    stream
                        .set_nonblocking(false)
                        .context("blocking client stream")?;
                    stream
                        .set_read_timeout(Some(Duration::from_secs(10)))
                        .context("client read timeout")?;
                    return Self::converse(stream, greeting, responses, requests);
                }
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn converse(
        mut stream: TcpStream,
        greeting: &str,
        responses: &HashMap<String, Vec<String>>,
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        write_lines(&mut stream, &[greeting.to_owned()]).context("write greeting")?;
        let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => return Ok(()),
                Ok(_) => {}
                // The client may shut the socket down mid-conversation.
                Err(error) if error.kind() == io::ErrorKind::ConnectionReset => return Ok(()),
                Err(error) => return Err(error).context("read command"),
            }
            let command = line.trim_end_matches(['\r', '\n']).to_owned();
            requests
                .lock()
                .map_err(|error| anyhow!("lock requests: {error}"))?
                .push(command.clone());

            if command == "QUIT" {
                // The client may already be gone; a failed goodbye is fine.
                let _ = write_lines(&mut stream, &["221 bye".to_owned()]);
                return Ok(());
            }
            let reply = match responses.get(&command) {
                Some(lines) => lines.clone(),
                None => vec!["500 unknown command".to_owned()],
            };
            if write_lines(&mut stream, &reply).is_err() {
                return Ok(());
            }
        }
    }
}

impl Drop for FakeDictServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Writes CRLF-terminated lines and flushes.
fn write_lines(stream: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        stream.write_all(line.as_bytes())?;
        stream.write_all(b"\r\n")?;
    }
    stream.flush()
}
