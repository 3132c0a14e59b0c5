// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Device
//!
//! This module provides an in-memory [`Device`] for testing and embedding.  The
//! `InMemoryDevice` captures formatted text in memory rather than writing it to a stream or a
//! file, making it ideal for:
//!
//! - Unit testing code that logs through a [`Facility`](crate::Facility)
//! - Examining formatted output programmatically
//! - Collecting logs in environments where stderr is redirected or unavailable
//!
//! ## Integration with the Facility
//!
//! Wrap the device in a [`Sink`](crate::Sink) and install it with
//! [`Facility::configure_sink`](crate::Facility::configure_sink).

use crate::device::Device;
use wasm_safe_mutex::Mutex;

/// A device that stores formatted records in memory.
///
/// # Example
///
/// ```rust
/// use guardlog::{DisplayFlags, Facility, InMemoryDevice, Sink};
/// use std::sync::Arc;
///
/// let device = Arc::new(InMemoryDevice::new());
/// let facility = Facility::new();
/// facility.configure_sink(Sink::open(device.clone()), Some("demo"), DisplayFlags::minimal());
///
/// facility.info("Test message 42");
///
/// assert_eq!(device.drain_logs(), "demo: Test message 42\n");
/// // Buffer is now empty
/// assert_eq!(device.drain_logs(), "");
/// ```
pub struct InMemoryDevice {
    logs: Mutex<Vec<String>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: required by Device
// - Default: empty buffer
// - Clone: NOT implemented - share it through Arc so the test and the sink see one buffer
// - PartialEq/Eq/Hash: NOT implemented - comparing would take the lock
// - Send/Sync: Automatically implemented due to Mutex usage (required for Device)

impl Default for InMemoryDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDevice").finish_non_exhaustive()
    }
}

impl InMemoryDevice {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
        }
    }

    /// Drains all captured text into a single string, clearing the internal buffer.
    ///
    /// Records already end in line breaks, so they are concatenated as they were written.
    pub fn drain_logs(&self) -> String {
        let mut logs = self.logs.lock_sync();
        let result = logs.concat();
        logs.clear();
        result
    }

    /// Drains the captured records, one entry per write.
    pub fn drain_records(&self) -> Vec<String> {
        std::mem::take(&mut *self.logs.lock_sync())
    }
}

impl Device for InMemoryDevice {
    fn write_text(&self, text: &str) {
        self.logs.lock_sync().push(text.to_string());
    }

    fn flush(&self) {
        // No-op since we're storing in memory, no flushing needed
    }

    fn close(&self) {
        //captured text stays available for draining
    }
}
