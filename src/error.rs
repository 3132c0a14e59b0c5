// SPDX-License-Identifier: MIT OR Apache-2.0
use std::path::PathBuf;

/// Failure to set up or maintain a log destination.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SinkError {
    #[error("failed to open log file {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to rotate log file {}", .path.display())]
    Rotate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reports a failed write.
///
/// Writes happen on behalf of whoever emitted the record, so there is nobody to return the
/// error to; it goes to stderr instead.
pub(crate) fn report_write_failure(error: &dyn std::error::Error) {
    let mut message = format!("log writing failed. {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    eprintln!("{message}");
}
