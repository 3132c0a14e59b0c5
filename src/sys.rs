// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process and thread identification for formatted output.

use std::sync::atomic::{AtomicU64, Ordering};

static THREAD_TAG: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT_TAG: u64 = THREAD_TAG.fetch_add(1, Ordering::Relaxed);
}

/// The operating-system process identifier.
pub fn process_id() -> u32 {
    std::process::id()
}

/**
An identifier unique to the calling thread for the life of the process.

Tags are small integers handed out in the order threads first ask for one.
*/
pub fn thread_tag() -> u64 {
    CURRENT_TAG.with(|tag| *tag)
}
