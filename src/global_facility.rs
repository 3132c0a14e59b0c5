// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide default facility.
//!
//! Code that does not want to pass a [`Facility`] around can log through the one returned by
//! [`facility()`], or through the free functions here, each of which forwards to the method of
//! the same name on that instance.
//!
//! The default facility is created on first use.  It starts like [`Facility::new`] (stderr,
//! minimal preset, no program name) with the threshold read from the `GUARDLOG_LEVEL`
//! environment variable, and lives until the process exits.
//!
//! # Examples
//!
//! ```
//! use guardlog::{Severity, Stream};
//!
//! guardlog::configure_stream(Some("tool"), Stream::Stderr);
//! guardlog::set_show_level(true);
//! guardlog::info("starting");
//! guardlog::add(Severity::Warn, "low disk");
//! assert_eq!(guardlog::program_name().as_deref(), Some("tool"));
//! ```
//!
//! Passing the default instance by reference works too:
//!
//! ```
//! fn work(log: &guardlog::Facility) {
//!     log.debug("working");
//! }
//! work(guardlog::facility());
//! ```

use crate::error::SinkError;
use crate::facility::Facility;
use crate::format::DisplayFlags;
use crate::payload::Payload;
use crate::rotating_file_device::FileOptions;
use crate::severity::Severity;
use crate::sink::Sink;
use crate::stream_device::Stream;
use std::path::Path;
use std::sync::{Arc, OnceLock};

static FACILITY: OnceLock<Facility> = OnceLock::new();

/// The process-wide default facility, created on first call.
pub fn facility() -> &'static Facility {
    FACILITY.get_or_init(Facility::from_env)
}

macro_rules! forward_accessors {
    ($($name:ident, $setter:ident: $ty:ty;)*) => {
        $(
            #[doc = concat!("[`Facility::", stringify!($name), "`] on the default facility.")]
            pub fn $name() -> $ty {
                facility().$name()
            }

            #[doc = concat!("[`Facility::", stringify!($setter), "`] on the default facility.")]
            pub fn $setter(value: $ty) {
                facility().$setter(value)
            }
        )*
    };
}

forward_accessors! {
    show_pid, set_show_pid: bool;
    show_tid, set_show_tid: bool;
    show_line_numbers, set_show_line_numbers: bool;
    show_timestamp, set_show_timestamp: bool;
    show_milliseconds, set_show_milliseconds: bool;
    show_level, set_show_level: bool;
    program_name, set_program_name: Option<String>;
    threshold, set_threshold: Severity;
    display_flags, set_display_flags: DisplayFlags;
}

macro_rules! forward_severities {
    ($($plain:ident, $lazy:ident;)*) => {
        $(
            #[doc = concat!("[`Facility::", stringify!($plain), "`] on the default facility.")]
            pub fn $plain(payload: impl Into<Payload>) -> bool {
                facility().$plain(payload)
            }

            #[doc = concat!("[`Facility::", stringify!($lazy), "`] on the default facility.")]
            pub fn $lazy<F, P>(payload: F) -> bool
            where
                F: FnOnce() -> P,
                P: Into<Payload>,
            {
                facility().$lazy(payload)
            }
        )*
    };
}

forward_severities! {
    fatal, fatal_with;
    error, error_with;
    warn, warn_with;
    info, info_with;
    debug, debug_with;
}

/// [`Facility::configure_stream`] on the default facility.
pub fn configure_stream(program_name: Option<&str>, stream: Stream) {
    facility().configure_stream(program_name, stream)
}

/// [`Facility::configure_file`] on the default facility.
pub fn configure_file(
    program_name: Option<&str>,
    path: impl AsRef<Path>,
    options: FileOptions,
) -> Result<(), SinkError> {
    facility().configure_file(program_name, path, options)
}

/// [`Facility::configure_sink`] on the default facility.
pub fn configure_sink(sink: Sink, program_name: Option<&str>, preset: DisplayFlags) {
    facility().configure_sink(sink, program_name, preset)
}

/// [`Facility::current_sink`] on the default facility.
pub fn current_sink() -> Arc<Sink> {
    facility().current_sink()
}

/// [`Facility::add`] on the default facility.
pub fn add(severity: Severity, payload: impl Into<Payload>) -> bool {
    facility().add(severity, payload)
}

/// [`Facility::add_with`] on the default facility.
pub fn add_with<F, P>(severity: Severity, payload: F) -> bool
where
    F: FnOnce() -> P,
    P: Into<Payload>,
{
    facility().add_with(severity, payload)
}

/// [`Facility::flush`] on the default facility.
pub fn flush() {
    facility().flush()
}
