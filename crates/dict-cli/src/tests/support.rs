//! Fixtures for CLI runtime tests.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use dict_config::Config;

use crate::AppError;
use crate::config::ConfigLoader;

/// Loader returning a fixed configuration.
pub(super) struct StaticLoader(pub(super) Config);

impl ConfigLoader for StaticLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.0.clone())
    }
}

pub(super) fn listing() -> Vec<String> {
    [
        "110 2 databases present",
        "wn \"WordNet (r) 3.0 (2006)\"",
        "gcide \"The Collaborative International Dictionary of English\"",
        ".",
        "250 ok",
    ]
    .map(str::to_owned)
    .to_vec()
}

pub(super) fn definition_reply(word: &str, text: &str) -> Vec<String> {
    vec![
        "150 1 definitions retrieved".to_owned(),
        format!("151 \"{word}\" wn \"WordNet (r) 3.0 (2006)\""),
        text.to_owned(),
        ".".to_owned(),
        "250 ok".to_owned(),
    ]
}

/// DICT server thread answering one connection from a response table.
pub(super) struct FakeServer {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl FakeServer {
    pub(super) fn spawn(responses: Vec<(&str, Vec<String>)>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake server")?;
        let port = listener.local_addr().context("local addr")?.port();
        let responses: Vec<(String, Vec<String>)> = responses
            .into_iter()
            .map(|(command, reply)| (command.to_owned(), reply))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let handle = thread::spawn(move || serve(&listener, &responses, &recorded));
        Ok(Self {
            port,
            requests,
            handle: Some(handle),
        })
    }

    pub(super) fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the conversation to end and returns the commands received.
    pub(super) fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake server thread panicked"))??;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }
}

fn serve(
    listener: &TcpListener,
    responses: &[(String, Vec<String>)],
    requests: &Mutex<Vec<String>>,
) -> Result<()> {
    let (mut stream, _) = listener.accept().context("accept connection")?;
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .context("read timeout")?;
    write!(stream, "220 dict.example ready <auth.mime> <1@dict.example>\r\n")?;
    let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).context("read command")? == 0 {
            return Ok(());
        }
        let command = line.trim_end().to_owned();
        requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?
            .push(command.clone());
        if command == "QUIT" {
            // The client shuts the socket down right after QUIT.
            let _ = write!(stream, "221 bye\r\n");
            return Ok(());
        }
        let reply = responses
            .iter()
            .find(|(expected, _)| *expected == command)
            .map_or_else(|| vec!["500 unknown command".to_owned()], |(_, reply)| reply.clone());
        for reply_line in reply {
            write!(stream, "{reply_line}\r\n")?;
        }
        stream.flush()?;
    }
}
