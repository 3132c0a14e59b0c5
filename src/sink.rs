// SPDX-License-Identifier: MIT OR Apache-2.0

//! The leveled log primitive.
//!
//! A [`Sink`] pairs a [`Device`] with the settings that decide what reaches it: a severity
//! threshold, a program name and a [`Formatter`].  Records below the threshold are dropped
//! before their payload is even built; everything else is formatted and handed to the device
//! in one write.
//!
//! # Locking
//!
//! The settings sit behind the sink's own lock, which is only held to read or replace them.
//! In particular the formatter runs with no sink lock held, so a formatter may take locks of
//! its own (the [`Facility`](crate::Facility) formatter takes the facility lock) without
//! creating a lock-order cycle with code that holds such a lock while changing sink settings.
//!
//! # Example
//!
//! ```rust
//! use guardlog::{InMemoryDevice, Severity, Sink, custom_formatter};
//! use std::sync::Arc;
//!
//! let device = Arc::new(InMemoryDevice::new());
//! let sink = Sink::open(device.clone());
//! sink.set_formatter(custom_formatter(|severity, _time, _program, payload| {
//!     format!("<{severity}> {payload}\n")
//! }));
//! sink.set_level(Severity::Warn);
//!
//! assert!(!sink.info("not shown"));
//! assert!(sink.warn("shown"));
//! assert!(!sink.debug_with(|| -> String { unreachable!("below threshold, never built") }));
//! assert_eq!(device.drain_logs(), "<WARN> shown\n");
//! ```

use crate::device::Device;
use crate::error::SinkError;
use crate::format::{DisplayFlags, Formatter, fixed_formatter};
use crate::payload::Payload;
use crate::rotating_file_device::{FileOptions, RotatingFileDevice};
use crate::severity::Severity;
use crate::stream_device::{Stream, StreamDevice};
use std::path::Path;
use std::sync::Arc;
use wasm_safe_mutex::Mutex;

#[derive(Clone)]
struct SinkSettings {
    program_name: Option<String>,
    level: Severity,
    formatter: Formatter,
    closed: bool,
}

/// A severity-filtered, formatted writer to a [`Device`].
pub struct Sink {
    settings: Mutex<SinkSettings>,
    device: Arc<dyn Device>,
}

macro_rules! severity_methods {
    ($($severity:ident: $plain:ident, $lazy:ident;)*) => {
        $(
            #[doc = concat!("Emits at [`Severity::", stringify!($severity), "`]. See [`Sink::add`].")]
            pub fn $plain(&self, payload: impl Into<Payload>) -> bool {
                self.add(Severity::$severity, payload)
            }

            #[doc = concat!("Emits at [`Severity::", stringify!($severity), "`]. See [`Sink::add_with`].")]
            pub fn $lazy<F, P>(&self, payload: F) -> bool
            where
                F: FnOnce() -> P,
                P: Into<Payload>,
            {
                self.add_with(Severity::$severity, payload)
            }
        )*
    };
}

impl Sink {
    /**
    Creates a sink writing to `device`.

    The sink starts with no program name, the [`Severity::Debug`] threshold and a formatter
    that shows every contextual part ([`DisplayFlags::full`]).
    */
    pub fn open(device: Arc<dyn Device>) -> Self {
        Self {
            settings: Mutex::new(SinkSettings {
                program_name: None,
                level: Severity::default(),
                formatter: fixed_formatter(DisplayFlags::full()),
                closed: false,
            }),
            device,
        }
    }

    /// Creates a sink writing to a console stream or custom writer.
    pub fn stream(stream: Stream) -> Self {
        Self::open(Arc::new(StreamDevice::new(stream)))
    }

    /// Creates a sink appending to `path`, rotated according to `options`.
    pub fn rotating_file(path: impl AsRef<Path>, options: FileOptions) -> Result<Self, SinkError> {
        Ok(Self::open(Arc::new(RotatingFileDevice::open(path, options)?)))
    }

    fn settings(&self) -> SinkSettings {
        self.settings.lock_sync().clone()
    }

    pub fn program_name(&self) -> Option<String> {
        self.settings.lock_sync().program_name.clone()
    }

    pub fn set_program_name(&self, program_name: Option<String>) {
        self.settings.lock_sync().program_name = program_name;
    }

    /// The minimum severity that is written.
    pub fn level(&self) -> Severity {
        self.settings.lock_sync().level
    }

    pub fn set_level(&self, level: Severity) {
        self.settings.lock_sync().level = level;
    }

    pub fn formatter(&self) -> Formatter {
        self.settings.lock_sync().formatter.clone()
    }

    pub fn set_formatter(&self, formatter: Formatter) {
        self.settings.lock_sync().formatter = formatter;
    }

    /// Whether a record at `severity` would currently be written.
    pub fn enabled(&self, severity: Severity) -> bool {
        let settings = self.settings.lock_sync();
        !settings.closed && severity >= settings.level
    }

    /**
    Formats and writes `payload` if `severity` passes the threshold.

    Returns whether the record was written.
    */
    pub fn add(&self, severity: Severity, payload: impl Into<Payload>) -> bool {
        self.add_with(severity, || payload)
    }

    /**
    Like [`Sink::add`], but only builds the payload if `severity` passes the threshold.
    */
    pub fn add_with<F, P>(&self, severity: Severity, payload: F) -> bool
    where
        F: FnOnce() -> P,
        P: Into<Payload>,
    {
        let settings = self.settings();
        if settings.closed || severity < settings.level {
            return false;
        }
        let time = chrono::Utc::now();
        let payload = payload().into();
        let text = (settings.formatter)(
            severity,
            time,
            settings.program_name.as_deref(),
            &payload,
        );
        self.device.write_text(&text);
        true
    }

    severity_methods! {
        Debug: debug, debug_with;
        Info: info, info_with;
        Warn: warn, warn_with;
        Error: error, error_with;
        Fatal: fatal, fatal_with;
    }

    pub fn flush(&self) {
        self.device.flush();
    }

    /**
    Closes the device.  Later records are dropped.

    Closing twice is harmless.
    */
    pub fn close(&self) {
        let was_closed = std::mem::replace(&mut self.settings.lock_sync().closed, true);
        if !was_closed {
            self.device.close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.settings.lock_sync().closed
    }
}

impl Drop for Sink {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let settings = self.settings();
        f.debug_struct("Sink")
            .field("program_name", &settings.program_name)
            .field("level", &settings.level)
            .field("closed", &settings.closed)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

/*
Boilerplate notes.

# Sink

Clone: two sinks sharing a device would each close it on drop.  Share through Arc instead.
PartialEq/Eq/Hash: no meaningful equality for a destination.
Default: would have to pick a device; Sink::stream(Stream::Stderr) says so explicitly.
Send/Sync: required, records arrive from any thread.
*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory_device::InMemoryDevice;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn memory_sink() -> (Arc<InMemoryDevice>, Sink) {
        let device = Arc::new(InMemoryDevice::new());
        let sink = Sink::open(device.clone());
        sink.set_formatter(fixed_formatter(DisplayFlags {
            show_level: true,
            ..DisplayFlags::minimal()
        }));
        (device, sink)
    }

    #[test]
    fn threshold_filters() {
        let (device, sink) = memory_sink();
        sink.set_level(Severity::Error);
        assert!(!sink.debug("d"));
        assert!(!sink.info("i"));
        assert!(!sink.warn("w"));
        assert!(sink.error("e"));
        assert!(sink.fatal("f"));
        assert!(sink.add(Severity::Fatal, "explicit"));
        assert_eq!(device.drain_logs(), "ERROR: e\nFATAL: f\nFATAL: explicit\n");
    }

    #[test]
    fn lazy_payload_only_built_when_enabled() {
        let (device, sink) = memory_sink();
        sink.set_level(Severity::Info);
        let built = AtomicUsize::new(0);
        let make = || {
            built.fetch_add(1, Ordering::SeqCst);
            "lazy"
        };
        assert!(!sink.debug_with(make));
        assert_eq!(built.load(Ordering::SeqCst), 0);
        assert!(sink.info_with(make));
        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert_eq!(device.drain_logs(), "INFO: lazy\n");
    }

    #[test]
    fn formatter_receives_program_name() {
        let (device, sink) = memory_sink();
        sink.set_program_name(Some("svc".to_string()));
        sink.warn("a\nb");
        assert_eq!(device.drain_records(), vec!["svc: WARN: a\nsvc: WARN: b\n"]);
        assert_eq!(sink.program_name().as_deref(), Some("svc"));
    }

    #[test]
    fn closed_sink_drops_records() {
        let (device, sink) = memory_sink();
        assert!(sink.enabled(Severity::Debug));
        sink.close();
        sink.close();
        assert!(sink.is_closed());
        assert!(!sink.enabled(Severity::Fatal));
        assert!(!sink.fatal("gone"));
        assert_eq!(device.drain_logs(), "");
    }

    #[test]
    fn default_formatter_shows_everything() {
        let device = Arc::new(InMemoryDevice::new());
        let sink = Sink::open(device.clone());
        sink.set_program_name(Some("svc".to_string()));
        sink.info("hello");
        let line = device.drain_logs();
        assert!(line.starts_with(&format!("svc({}:", std::process::id())), "{line}");
        assert!(line.ends_with(": INFO: hello\n"), "{line}");
    }

    #[test]
    fn rotating_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sink.log");
        let sink = Sink::rotating_file(&path, FileOptions::default()).unwrap();
        sink.set_formatter(fixed_formatter(DisplayFlags::minimal()));
        sink.info("to disk");
        drop(sink);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "to disk\n");
    }
}
