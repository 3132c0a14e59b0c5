// SPDX-License-Identifier: MIT OR Apache-2.0

//! Size-based rotation as seen through a facility.

use guardlog::{DisplayFlags, Facility, FileOptions};

#[test]
fn rotates_and_keeps_bounded_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let facility = Facility::new();
    facility
        .configure_file(Some("app"), &path, FileOptions::by_size(64, 2))
        .unwrap();
    facility.set_display_flags(DisplayFlags::minimal());

    for i in 0..40 {
        facility.info(format!("record number {i:02}"));
    }
    facility.flush();

    let active = std::fs::read_to_string(&path).unwrap();
    let newest = std::fs::read_to_string(dir.path().join("app.log.0")).unwrap();
    let oldest = std::fs::read_to_string(dir.path().join("app.log.1")).unwrap();
    assert!(!dir.path().join("app.log.2").exists());

    //each record is "app: record number NN\n", 22 bytes, so two fit in a file
    assert_eq!(active, "app: record number 38\napp: record number 39\n");
    assert_eq!(newest, "app: record number 36\napp: record number 37\n");
    assert_eq!(oldest, "app: record number 34\napp: record number 35\n");
}

#[test]
fn keep_zero_never_rotates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grow.log");
    let facility = Facility::new();
    facility
        .configure_file(None, &path, FileOptions::by_size(16, 0))
        .unwrap();
    facility.set_display_flags(DisplayFlags::minimal());
    for i in 0..10 {
        facility.info(format!("line {i}"));
    }
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 10);
    assert!(!dir.path().join("grow.log.0").exists());
}
