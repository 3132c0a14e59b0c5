// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reconfigurable log facility.
//!
//! A [`Facility`] owns one active [`Sink`] and the [`DisplayFlags`] its output is rendered with.
//! Both live in a single [`Guard`], so swapping the sink and applying a flag preset is one
//! locked step.
//!
//! The facility installs its own formatter on every sink it activates.  That formatter takes
//! the facility lock once per record to copy the flags, then renders with the copy, so the parts
//! of one record always agree with each other even while flags are being changed.  While its
//! sink is active it copies the current flags.  Once the sink has been replaced it renders with
//! the flags that were current at the moment of the swap, so a record finishing on the old sink
//! is never paired with the new preset.
//!
//! # Replacing the sink
//!
//! [`Facility::configure_stream`], [`Facility::configure_file`] and
//! [`Facility::configure_sink`] open the new destination first and only then take the lock to
//! swap it in.  If opening fails the error is returned and nothing changes.
//!
//! The replaced sink is closed when its last user lets go of it.  An emission that fetched the
//! old sink just before the swap therefore still completes against it; the swap neither waits
//! for such emissions nor loses them.
//!
//! # Example
//!
//! ```rust
//! use guardlog::{Facility, Severity};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let facility = Facility::new();
//! facility.configure_file(Some("svc"), dir.path().join("svc.log"), Default::default()).unwrap();
//! assert!(facility.show_timestamp());
//!
//! facility.set_threshold(Severity::Warn);
//! assert!(!facility.info("dropped"));
//! assert!(facility.warn("kept"));
//! ```

use crate::error::SinkError;
use crate::format::{DisplayFlags, Formatter, custom_formatter, format_record};
use crate::guard::Guard;
use crate::payload::Payload;
use crate::rotating_file_device::FileOptions;
use crate::severity::Severity;
use crate::sink::Sink;
use crate::stream_device::Stream;
use crate::{deep_guarded_field, guarded_field};
use std::path::Path;
use std::sync::{Arc, OnceLock, Weak};

/// Environment variable read by [`Facility::from_env`] for the initial threshold.
pub const LEVEL_ENV: &str = "GUARDLOG_LEVEL";

/// One activation of a sink.  `retired` is set, under the facility lock, when it is replaced.
#[derive(Debug, Default)]
struct Activation {
    retired: OnceLock<DisplayFlags>,
}

impl Activation {
    fn retired_flags(&self) -> DisplayFlags {
        self.retired.get().copied().unwrap_or_default()
    }
}

#[derive(Debug)]
struct FacilityState {
    sink: Arc<Sink>,
    display: DisplayFlags,
    activation: Arc<Activation>,
}

/// A log sink that can be swapped and tuned while other threads log through it.
///
/// Cloning gives another handle to the same facility.
#[derive(Debug, Clone)]
pub struct Facility {
    state: Arc<Guard<FacilityState>>,
}

macro_rules! forward_severity_methods {
    ($($severity:ident: $plain:ident, $lazy:ident;)*) => {
        $(
            #[doc = concat!("Emits at [`Severity::", stringify!($severity), "`]. See [`Facility::add`].")]
            pub fn $plain(&self, payload: impl Into<Payload>) -> bool {
                self.current_sink().add(Severity::$severity, payload)
            }

            #[doc = concat!("Emits at [`Severity::", stringify!($severity), "`]. See [`Facility::add_with`].")]
            pub fn $lazy<F, P>(&self, payload: F) -> bool
            where
                F: FnOnce() -> P,
                P: Into<Payload>,
            {
                self.current_sink().add_with(Severity::$severity, payload)
            }
        )*
    };
}

/// The formatter installed on every activated sink.
///
/// It holds the facility weakly; a sink that outlives its facility while still active renders
/// with every flag off.
fn facility_formatter(state: Weak<Guard<FacilityState>>, activation: Arc<Activation>) -> Formatter {
    custom_formatter(move |severity, time, program_name, payload| {
        let flags = match state.upgrade() {
            Some(state) => state.synchronize(|raw| {
                if Arc::ptr_eq(&raw.activation, &activation) {
                    raw.display
                } else {
                    activation.retired_flags()
                }
            }),
            None => activation.retired_flags(),
        };
        format_record(flags, severity, time, program_name, payload)
    })
}

fn owned_name(program_name: Option<&str>) -> Option<String> {
    program_name.filter(|name| !name.is_empty()).map(str::to_string)
}

impl Facility {
    /**
    Creates a facility writing to stderr with the minimal preset, no program name and the
    [`Severity::Debug`] threshold.
    */
    pub fn new() -> Self {
        let state = Arc::new_cyclic(|weak| {
            let activation = Arc::new(Activation::default());
            let sink = Sink::stream(Stream::Stderr);
            sink.set_formatter(facility_formatter(weak.clone(), activation.clone()));
            Guard::new(FacilityState {
                sink: Arc::new(sink),
                display: DisplayFlags::minimal(),
                activation,
            })
        });
        Facility { state }
    }

    /**
    Like [`Facility::new`], with the threshold taken from the `GUARDLOG_LEVEL` environment
    variable when it holds a severity name.

    An unparsable value is reported on stderr and otherwise ignored.
    */
    pub fn from_env() -> Self {
        Self::with_level_setting(std::env::var(LEVEL_ENV).ok().as_deref())
    }

    pub(crate) fn with_level_setting(setting: Option<&str>) -> Self {
        let facility = Self::new();
        if let Some(setting) = setting {
            match setting.trim().parse::<Severity>() {
                Ok(threshold) => facility.set_threshold(threshold),
                Err(e) => eprintln!("guardlog: ignoring {LEVEL_ENV}: {e}"),
            }
        }
        facility
    }

    guarded_field!(
        /// Whether the process id follows the program name.
        pub show_pid: bool => state.display
    );
    guarded_field!(
        /// Whether the thread tag follows the process id.
        pub show_tid: bool => state.display
    );
    guarded_field!(
        /// Whether lines of a multi-line record carry `[i/n]`.
        pub show_line_numbers: bool => state.display
    );
    guarded_field!(pub show_timestamp: bool => state.display);
    guarded_field!(pub show_milliseconds: bool => state.display);
    guarded_field!(pub show_level: bool => state.display);

    deep_guarded_field!(
        /// The label prefixed to output, held by the active sink.
        pub program_name: Option<String> => state.sink
    );
    deep_guarded_field!(
        /// The minimum severity that reaches output, held by the active sink.
        pub threshold: Severity => state.sink, level
    );

    /// All six display flags, read under one acquisition.
    pub fn display_flags(&self) -> DisplayFlags {
        self.state.synchronize(|raw| raw.display)
    }

    /// Replaces all six display flags at once.
    pub fn set_display_flags(&self, flags: DisplayFlags) {
        self.state.synchronize(|raw| raw.display = flags);
    }

    /**
    Switches output to a console stream (or any writer) with the minimal preset.

    Nothing but `program_name` and the message appears until flags are turned on again.
    */
    pub fn configure_stream(&self, program_name: Option<&str>, stream: Stream) {
        self.configure_sink(Sink::stream(stream), program_name, DisplayFlags::minimal());
    }

    /**
    Switches output to a rotating file at `path` with the full preset.

    # Errors

    Returns [`SinkError::Open`] if `path` cannot be opened for appending.  The current sink and
    flags are left exactly as they were.
    */
    pub fn configure_file(
        &self,
        program_name: Option<&str>,
        path: impl AsRef<Path>,
        options: FileOptions,
    ) -> Result<(), SinkError> {
        let sink = Sink::rotating_file(path, options)?;
        self.configure_sink(sink, program_name, DisplayFlags::full());
        Ok(())
    }

    /**
    Activates an arbitrary sink with the given flag preset.

    The sink's formatter is replaced by the facility's, its program name is set from
    `program_name`, and it inherits the current threshold.  The replaced sink keeps rendering
    with the flags it had when it was replaced.
    */
    pub fn configure_sink(&self, sink: Sink, program_name: Option<&str>, preset: DisplayFlags) {
        let activation = Arc::new(Activation::default());
        sink.set_formatter(facility_formatter(
            Arc::downgrade(&self.state),
            activation.clone(),
        ));
        sink.set_program_name(owned_name(program_name));
        let sink = Arc::new(sink);
        let replaced = self.state.synchronize(|raw| {
            sink.set_level(raw.sink.level());
            //only ever set here, and every activation is replaced exactly once
            let _ = raw.activation.retired.set(raw.display);
            raw.activation = activation;
            raw.display = preset;
            std::mem::replace(&mut raw.sink, sink)
        });
        //closes now, or once the last in-flight emission finishes with it
        drop(replaced);
    }

    /// The active sink.
    ///
    /// Holding on to it keeps it open after the facility moves on to another one.
    pub fn current_sink(&self) -> Arc<Sink> {
        self.state.synchronize(|raw| raw.sink.clone())
    }

    /**
    Emits `payload` at `severity` through the active sink.

    Returns whether the record passed the threshold and was written.
    */
    pub fn add(&self, severity: Severity, payload: impl Into<Payload>) -> bool {
        self.current_sink().add(severity, payload)
    }

    /// Like [`Facility::add`], but `payload` only runs when the record passes the threshold.
    pub fn add_with<F, P>(&self, severity: Severity, payload: F) -> bool
    where
        F: FnOnce() -> P,
        P: Into<Payload>,
    {
        self.current_sink().add_with(severity, payload)
    }

    forward_severity_methods! {
        Fatal: fatal, fatal_with;
        Error: error, error_with;
        Warn: warn, warn_with;
        Info: info, info_with;
        Debug: debug, debug_with;
    }

    pub fn flush(&self) {
        self.current_sink().flush();
    }
}

impl Default for Facility {
    fn default() -> Self {
        Self::new()
    }
}

/*
Boilerplate notes.

# Facility

Clone: a handle, like Arc.  Clones share one lock and one sink.
PartialEq/Eq/Hash: identity would be the natural meaning, but nobody has asked for it.
Default: same as new(), stderr with the minimal preset.
Send/Sync: yes, that is the point.
*/
