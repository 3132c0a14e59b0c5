// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::device::Device;
use crate::error::report_write_failure;
use std::io::Write;
use wasm_safe_mutex::Mutex;

/// Where a [`StreamDevice`] writes.
#[derive(Default)]
pub enum Stream {
    #[default]
    Stderr,
    Stdout,
    /// Any other writer, e.g. a socket or a pipe to a child process.
    Writer(Box<dyn Write + Send>),
}

impl Stream {
    /// Wraps an arbitrary writer.
    pub fn writer(w: impl Write + Send + 'static) -> Self {
        Stream::Writer(Box::new(w))
    }

    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        match self {
            Stream::Stderr => std::io::stderr().lock().write_all(bytes),
            Stream::Stdout => std::io::stdout().lock().write_all(bytes),
            Stream::Writer(w) => w.write_all(bytes),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Stream::Stderr => std::io::stderr().flush(),
            Stream::Stdout => std::io::stdout().flush(),
            Stream::Writer(w) => w.flush(),
        }
    }
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stream::Stderr => f.write_str("Stderr"),
            Stream::Stdout => f.write_str("Stdout"),
            Stream::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/**
A device that writes to a console stream or any [`Write`] implementation.

Writes are unbuffered: each record is handed to the stream in one `write_all` and, for custom
writers, flushed right away.
 */
pub struct StreamDevice {
    stream: Mutex<Option<Stream>>,
}

impl StreamDevice {
    pub fn new(stream: Stream) -> Self {
        Self {
            stream: Mutex::new(Some(stream)),
        }
    }

    pub fn stderr() -> Self {
        Self::new(Stream::Stderr)
    }
}

impl Default for StreamDevice {
    fn default() -> Self {
        Self::stderr()
    }
}

impl std::fmt::Debug for StreamDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDevice").finish_non_exhaustive()
    }
}

impl Device for StreamDevice {
    fn write_text(&self, text: &str) {
        let mut slot = self.stream.lock_sync();
        let Some(stream) = (*slot).as_mut() else {
            return;
        };
        let mut result = stream.write_all(text.as_bytes());
        if result.is_ok() && matches!(stream, Stream::Writer(_)) {
            result = stream.flush();
        }
        if let Err(e) = result {
            report_write_failure(&e);
        }
    }

    fn flush(&self) {
        let mut slot = self.stream.lock_sync();
        if let Some(stream) = (*slot).as_mut() {
            if let Err(e) = stream.flush() {
                report_write_failure(&e);
            }
        }
    }

    fn close(&self) {
        //the console streams belong to the process; we only stop writing to them
        let closed = (*self.stream.lock_sync()).take();
        if let Some(mut stream) = closed {
            if let Err(e) = stream.flush() {
                report_write_failure(&e);
            }
        }
    }
}
