// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide facility and the logging macros.

use guardlog::{DisplayFlags, InMemoryDevice, Severity, Sink};
use std::sync::{Arc, Mutex};

static TEST_FACILITY_GUARD: Mutex<()> = Mutex::new(());

fn capture() -> Arc<InMemoryDevice> {
    let device = Arc::new(InMemoryDevice::new());
    guardlog::configure_sink(Sink::open(device.clone()), Some("mac"), DisplayFlags::minimal());
    guardlog::set_threshold(Severity::Debug);
    guardlog::set_show_level(true);
    device
}

#[test]
fn macros_format_arguments() {
    let _guard = TEST_FACILITY_GUARD.lock().unwrap();
    let device = capture();
    let disk = 91;
    assert!(guardlog::warn!("disk at {disk}%"));
    assert!(guardlog::error!("{} of {}", 1, 2));
    assert!(guardlog::fatal!("bye"));
    assert!(guardlog::info!("hi"));
    assert!(guardlog::debug!("dbg {:?}", Some(1)));
    assert!(guardlog::log!(Severity::Info, "explicit {}", "level"));
    assert_eq!(
        device.drain_logs(),
        "mac: WARN: disk at 91%\nmac: ERROR: 1 of 2\nmac: FATAL: bye\nmac: INFO: hi\nmac: DEBUG: dbg Some(1)\nmac: INFO: explicit level\n"
    );
}

#[test]
fn macros_skip_formatting_below_threshold() {
    let _guard = TEST_FACILITY_GUARD.lock().unwrap();
    let device = capture();
    guardlog::set_threshold(Severity::Error);

    struct Loud;
    impl std::fmt::Display for Loud {
        fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            panic!("formatted below threshold");
        }
    }
    assert!(!guardlog::info!("{}", Loud));
    assert!(guardlog::error!("kept"));
    assert_eq!(device.drain_logs(), "mac: ERROR: kept\n");
    guardlog::set_threshold(Severity::Debug);
}

#[test]
fn error_reports_carry_their_cause() {
    let _guard = TEST_FACILITY_GUARD.lock().unwrap();
    let device = capture();
    guardlog::set_show_line_numbers(true);
    let err = std::fs::read_to_string("/definitely/not/here").unwrap_err();
    guardlog::error(guardlog::ErrorReport::from_error(&err));
    let text = device.drain_logs();
    assert!(text.starts_with("mac: ERROR: "), "{text}");
    assert!(text.trim_end().ends_with("(Error)"), "{text}");
    guardlog::set_show_line_numbers(false);
}
