// SPDX-License-Identifier: MIT OR Apache-2.0

//! `format!`-style logging macros for the default facility.
//!
//! Each macro formats its arguments only when the record passes the threshold, and evaluates
//! to whether it was written.
//!
//! ```
//! let disk = 91;
//! guardlog::warn!("disk at {disk}%");
//! guardlog::log!(guardlog::Severity::Info, "{} files rotated", 2);
//! ```

/// Logs at an explicit [`Severity`](crate::Severity) through the default facility.
#[macro_export]
macro_rules! log {
    ($severity:expr, $($arg:tt)+) => {
        $crate::facility().add_with($severity, || ::std::format!($($arg)+))
    };
}

/// Logs at [`Severity::Fatal`](crate::Severity::Fatal) through the default facility.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Fatal, $($arg)+)
    };
}

/// Logs at [`Severity::Error`](crate::Severity::Error) through the default facility.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Error, $($arg)+)
    };
}

/// Logs at [`Severity::Warn`](crate::Severity::Warn) through the default facility.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Warn, $($arg)+)
    };
}

/// Logs at [`Severity::Info`](crate::Severity::Info) through the default facility.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Info, $($arg)+)
    };
}

/// Logs at [`Severity::Debug`](crate::Severity::Debug) through the default facility.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Debug, $($arg)+)
    };
}
