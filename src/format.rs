// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of log calls into text.
//!
//! Every log call is rendered into one output line per payload line (see [`Payload::lines`]).
//! Each output line is the `": "`-separated join of the parts that are switched on and
//! non-empty:
//!
//! 1. the prefix: program name, then `(pid)` or `(pid:tid)`, then `[i/n]` for multi-line
//!    payloads
//! 2. the UTC timestamp, `YYYYMMDDTHHMMSS` with an optional `.mmm` suffix
//! 3. the uppercase severity name
//! 4. the line itself
//!
//! Which parts appear is controlled by [`DisplayFlags`].  With every flag off and no program
//! name, the output is the message alone.
//!
//! # Example
//!
//! ```rust
//! use guardlog::{DisplayFlags, Payload, Severity, format_record};
//!
//! let flags = DisplayFlags { show_level: true, show_line_numbers: true, ..DisplayFlags::minimal() };
//! let text = format_record(
//!     flags,
//!     Severity::Warn,
//!     chrono::Utc::now(),
//!     Some("svc"),
//!     &Payload::from("disk at 91%\nrotating"),
//! );
//! assert_eq!(text, "svc[1/2]: WARN: disk at 91%\nsvc[2/2]: WARN: rotating\n");
//! ```

use crate::payload::Payload;
use crate::severity::Severity;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A formatter callback, as installed on a [`Sink`](crate::Sink).
///
/// Arguments are the record's severity, the time of the call, the sink's program name and the
/// payload.  The returned text is written verbatim, so it carries its own line breaks.
pub type Formatter =
    Arc<dyn Fn(Severity, DateTime<Utc>, Option<&str>, &Payload) -> String + Send + Sync>;

/// Which contextual parts appear in formatted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DisplayFlags {
    /// Show `(pid)` after the program name.
    pub show_pid: bool,
    /// Show `:tid` inside the pid parentheses.  Has no effect without `show_pid`.
    pub show_tid: bool,
    /// Show `[i/n]` on payloads with more than one line.
    pub show_line_numbers: bool,
    pub show_timestamp: bool,
    /// Append `.mmm` to the timestamp.  Has no effect without `show_timestamp`.
    pub show_milliseconds: bool,
    pub show_level: bool,
}

impl DisplayFlags {
    /// Every flag off, for console output where only the message matters.
    pub const fn minimal() -> Self {
        DisplayFlags {
            show_pid: false,
            show_tid: false,
            show_line_numbers: false,
            show_timestamp: false,
            show_milliseconds: false,
            show_level: false,
        }
    }

    /// Every flag on, for durable file logs.
    pub const fn full() -> Self {
        DisplayFlags {
            show_pid: true,
            show_tid: true,
            show_line_numbers: true,
            show_timestamp: true,
            show_milliseconds: true,
            show_level: true,
        }
    }
}

/// Renders one log call with the current process and thread identifiers.
pub fn format_record(
    flags: DisplayFlags,
    severity: Severity,
    time: DateTime<Utc>,
    program_name: Option<&str>,
    payload: &Payload,
) -> String {
    render(
        flags,
        severity,
        time,
        program_name,
        payload,
        crate::sys::process_id(),
        crate::sys::thread_tag(),
    )
}

/// Wraps a closure as a [`Formatter`].
///
/// Going through this function lets the compiler infer the closure's argument types.
pub fn custom_formatter<F>(f: F) -> Formatter
where
    F: Fn(Severity, DateTime<Utc>, Option<&str>, &Payload) -> String + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A formatter that renders with fixed flags.
///
/// This is what a [`Sink`](crate::Sink) uses until another formatter is installed.
pub fn fixed_formatter(flags: DisplayFlags) -> Formatter {
    custom_formatter(move |severity, time, program_name, payload| {
        format_record(flags, severity, time, program_name, payload)
    })
}

fn program_part(flags: DisplayFlags, program_name: Option<&str>, pid: u32, tid: u64) -> String {
    let Some(name) = program_name.filter(|n| !n.is_empty()) else {
        return String::new();
    };
    let mut part = name.to_string();
    if flags.show_pid {
        part.push_str(&format!("({pid}"));
        if flags.show_tid {
            part.push_str(&format!(":{tid}"));
        }
        part.push(')');
    }
    part
}

fn timestamp_part(flags: DisplayFlags, time: DateTime<Utc>) -> String {
    if !flags.show_timestamp {
        return String::new();
    }
    if flags.show_milliseconds {
        time.format("%Y%m%dT%H%M%S%.3f").to_string()
    } else {
        time.format("%Y%m%dT%H%M%S").to_string()
    }
}

pub(crate) fn render(
    flags: DisplayFlags,
    severity: Severity,
    time: DateTime<Utc>,
    program_name: Option<&str>,
    payload: &Payload,
    pid: u32,
    tid: u64,
) -> String {
    let lines = payload.lines();
    let n = lines.len();
    let program = program_part(flags, program_name, pid, tid);
    let timestamp = timestamp_part(flags, time);
    let level = if flags.show_level { severity.name() } else { "" };

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let mut prefix = program.clone();
        if flags.show_line_numbers && n > 1 {
            prefix.push_str(&format!("[{}/{}]", i + 1, n));
        }
        let segments: Vec<&str> = [prefix.as_str(), timestamp.as_str(), level, line.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        out.push_str(&segments.join(": "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ErrorReport;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap() + chrono::Duration::milliseconds(26)
    }

    fn fmt(flags: DisplayFlags, program: Option<&str>, payload: &str) -> String {
        render(flags, Severity::Info, at(), program, &Payload::from(payload), 4242, 7)
    }

    #[test]
    fn minimal_is_message_only() {
        assert_eq!(fmt(DisplayFlags::minimal(), None, "hello"), "hello\n");
        //program name alone still shows with minimal flags
        assert_eq!(fmt(DisplayFlags::minimal(), Some("svc"), "hello"), "svc: hello\n");
    }

    #[test]
    fn single_line_never_numbered() {
        let flags = DisplayFlags {
            show_level: true,
            show_line_numbers: true,
            ..DisplayFlags::minimal()
        };
        assert_eq!(fmt(flags, Some("svc"), "hello"), "svc: INFO: hello\n");
    }

    #[test]
    fn multi_line_numbered() {
        let flags = DisplayFlags {
            show_line_numbers: true,
            ..DisplayFlags::minimal()
        };
        assert_eq!(
            fmt(flags, Some("svc"), "a\nb\nc"),
            "svc[1/3]: a\nsvc[2/3]: b\nsvc[3/3]: c\n"
        );
        //without a program name the counter is the whole prefix
        assert_eq!(fmt(flags, None, "a\nb"), "[1/2]: a\n[2/2]: b\n");
    }

    #[test]
    fn full_preset() {
        assert_eq!(
            fmt(DisplayFlags::full(), Some("svc"), "hello"),
            "svc(4242:7): 20240309T070502.026: INFO: hello\n"
        );
        let no_ms = DisplayFlags {
            show_milliseconds: false,
            show_tid: false,
            ..DisplayFlags::full()
        };
        assert_eq!(
            fmt(no_ms, Some("svc"), "x\ny"),
            "svc(4242)[1/2]: 20240309T070502: INFO: x\nsvc(4242)[2/2]: 20240309T070502: INFO: y\n"
        );
    }

    #[test]
    fn dependent_flags_need_their_parent() {
        let flags = DisplayFlags {
            show_tid: true,
            show_milliseconds: true,
            ..DisplayFlags::minimal()
        };
        assert_eq!(fmt(flags, Some("svc"), "hello"), "svc: hello\n");
        //pid needs a program name to attach to
        let pid_only = DisplayFlags {
            show_pid: true,
            ..DisplayFlags::minimal()
        };
        assert_eq!(fmt(pid_only, None, "hello"), "hello\n");
        assert_eq!(fmt(pid_only, Some(""), "hello"), "hello\n");
    }

    #[test]
    fn error_payload_numbers_every_frame() {
        let report = ErrorReport::new("Boom", "boom").with_frames(["at a", "at b"]);
        let flags = DisplayFlags {
            show_line_numbers: true,
            show_level: true,
            ..DisplayFlags::minimal()
        };
        let text = render(flags, Severity::Error, at(), Some("svc"), &report.into(), 1, 1);
        assert_eq!(
            text,
            "svc[1/3]: ERROR: boom (Boom)\nsvc[2/3]: ERROR: at a\nsvc[3/3]: ERROR: at b\n"
        );
    }

    #[test]
    fn blank_lines_keep_their_prefix() {
        let flags = DisplayFlags {
            show_line_numbers: true,
            ..DisplayFlags::minimal()
        };
        assert_eq!(fmt(flags, Some("svc"), "a\n\nb"), "svc[1/3]: a\nsvc[2/3]\nsvc[3/3]: b\n");
        assert_eq!(fmt(DisplayFlags::minimal(), None, ""), "\n");
    }
}
