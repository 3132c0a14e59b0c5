// SPDX-License-Identifier: MIT OR Apache-2.0

//! The message carried by a single log call.
//!
//! A [`Payload`] is either free text or an [`ErrorReport`] describing a failure together with
//! its trace.  The formatter only ever sees a payload through [`Payload::lines`], which breaks it
//! into the lines that each receive their own contextual prefix.
//!
//! # Example
//!
//! ```rust
//! use guardlog::{ErrorReport, Payload};
//!
//! let text = Payload::from("  first\nsecond  ");
//! assert_eq!(text.lines(), vec!["first", "second"]);
//!
//! let report = ErrorReport::new("Timeout", "gave up after 3 tries")
//!     .with_frames(["at fetch (net.rs:10)", "at main (main.rs:2)"]);
//! assert_eq!(
//!     Payload::from(report).lines(),
//!     vec!["gave up after 3 tries (Timeout)", "at fetch (net.rs:10)", "at main (main.rs:2)"]
//! );
//! ```

use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt::Display;

/// A failure description with an optional trace, one entry per frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorReport {
    kind: String,
    description: String,
    frames: Vec<String>,
}

impl ErrorReport {
    pub fn new(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
            frames: Vec::new(),
        }
    }

    /// Appends trace frames.
    pub fn with_frames<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frames.extend(frames.into_iter().map(Into::into));
        self
    }

    /// Appends one frame per non-empty line of a captured backtrace.
    ///
    /// A backtrace that was not captured (see [`Backtrace::capture`]) renders as a single
    /// explanatory line, which is kept.
    pub fn with_backtrace(self, backtrace: &Backtrace) -> Self {
        let rendered = backtrace.to_string();
        let frames: Vec<String> = rendered
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        self.with_frames(frames)
    }

    /**
    Describes an error value.

    The kind is the unqualified type name of `E`, the description is its `Display` output and
    each error in its `source()` chain becomes a `caused by: ...` frame.
    */
    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        let full = std::any::type_name::<E>();
        //strip the module path, but keep generic arguments intact
        let base = full.split('<').next().unwrap_or(full);
        let kind = match base.rfind("::") {
            Some(idx) => &full[idx + 2..],
            None => full,
        };
        let mut frames = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            frames.push(format!("caused by: {cause}"));
            source = cause.source();
        }
        Self {
            kind: kind.to_string(),
            description: error.to_string(),
            frames,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description, self.kind)
    }
}

/// The message of one log call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload {
    Text(String),
    Error(ErrorReport),
}

impl Payload {
    /**
    Decomposes the payload into output lines.

    Text is split on line breaks and every line is trimmed.  An error yields
    `"<description> (<kind>)"` followed by one line per frame.  The result is never empty:
    empty text is one empty line.
    */
    pub fn lines(&self) -> Vec<String> {
        let lines: Vec<String> = match self {
            Payload::Text(text) => text.lines().map(|l| l.trim().to_string()).collect(),
            Payload::Error(report) => std::iter::once(report.to_string())
                .chain(report.frames.iter().map(|f| f.trim().to_string()))
                .collect(),
        };
        if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<std::fmt::Arguments<'_>> for Payload {
    fn from(args: std::fmt::Arguments<'_>) -> Self {
        Payload::Text(args.to_string())
    }
}

impl From<ErrorReport> for Payload {
    fn from(report: ErrorReport) -> Self {
        Payload::Error(report)
    }
}

impl Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Text(text) => f.write_str(text),
            Payload::Error(report) => write!(f, "{report}"),
        }
    }
}
