//! In-memory stream replaying a fixed server script.

use std::io::{self, Cursor, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::transport::{DictStream, Interrupt};

/// Reads server output from a script and records everything the client writes.
pub(in crate::tests) struct ScriptedStream {
    input: Cursor<Vec<u8>>,
    written: Arc<Mutex<Vec<u8>>>,
    interrupts: Arc<AtomicUsize>,
}

/// Observes a [`ScriptedStream`] after it has been moved into a session.
#[derive(Clone)]
pub(in crate::tests) struct ScriptHandle {
    written: Arc<Mutex<Vec<u8>>>,
    interrupts: Arc<AtomicUsize>,
}

impl ScriptedStream {
    /// Builds a stream whose server side sends `lines`, each CRLF terminated.
    pub(in crate::tests) fn new<I, L>(lines: I) -> (Self, ScriptHandle)
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut script = String::new();
        for line in lines {
            script.push_str(line.as_ref());
            script.push_str("\r\n");
        }
        Self::raw(script.into_bytes())
    }

    /// Builds a stream replaying `bytes` verbatim.
    pub(in crate::tests) fn raw(bytes: Vec<u8>) -> (Self, ScriptHandle) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let interrupts = Arc::new(AtomicUsize::new(0));
        let handle = ScriptHandle {
            written: Arc::clone(&written),
            interrupts: Arc::clone(&interrupts),
        };
        let stream = Self {
            input: Cursor::new(bytes),
            written,
            interrupts,
        };
        (stream, handle)
    }
}

impl ScriptHandle {
    /// Command lines written by the client, terminators removed.
    pub(in crate::tests) fn commands(&self) -> Vec<String> {
        let written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&written)
            .split_terminator("\r\n")
            .map(str::to_owned)
            .collect()
    }

    /// Number of times the session interrupted the stream.
    pub(in crate::tests) fn interrupts(&self) -> usize {
        self.interrupts.load(Ordering::SeqCst)
    }

    /// True once the session has dropped both the stream and its interrupter.
    pub(in crate::tests) fn released(&self) -> bool {
        Arc::strong_count(&self.interrupts) == 1
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct CountingInterrupt(Arc<AtomicUsize>);

impl Interrupt for CountingInterrupt {
    fn interrupt(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl DictStream for ScriptedStream {
    fn interrupter(&self) -> io::Result<Box<dyn Interrupt>> {
        Ok(Box::new(CountingInterrupt(Arc::clone(&self.interrupts))))
    }
}
