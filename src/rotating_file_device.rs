// SPDX-License-Identifier: MIT OR Apache-2.0

//! A file device with size-based rotation.
//!
//! The active file is always the configured path.  When a write would push it past the size
//! limit, old files are shifted up by one (`app.log.0` becomes `app.log.1`, and so on, with the
//! oldest beyond the retention count deleted), the active file is renamed to `app.log.0`, and a
//! fresh `app.log` is started.
//!
//! Several devices may be open on one path, for example while a replaced sink is still
//! finishing a record.  A device only shifts files if the path still names the file it has open;
//! if another device already rotated it away, this one just reopens the path.  Until then its
//! writes land in the rotated file.
//!
//! ```rust
//! use guardlog::{Device, FileOptions, RotatingFileDevice};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("app.log");
//! let device = RotatingFileDevice::open(&path, FileOptions::by_size(16, 2)).unwrap();
//! device.write_text("0123456789\n");
//! device.write_text("abcdefghij\n"); // 22 bytes would exceed 16: rotates first
//! device.close();
//!
//! assert_eq!(std::fs::read_to_string(&path).unwrap(), "abcdefghij\n");
//! assert_eq!(std::fs::read_to_string(dir.path().join("app.log.0")).unwrap(), "0123456789\n");
//! ```

use crate::device::Device;
use crate::error::{SinkError, report_write_failure};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use wasm_safe_mutex::Mutex;

/// Rotation policy for file output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileOptions {
    /// How many rotated files to keep.  Zero disables rotation and the file grows unbounded.
    pub keep_files: usize,
    /// Size in bytes past which the active file is rotated.
    pub max_size_bytes: u64,
}

impl FileOptions {
    pub const DEFAULT_MAX_SIZE_BYTES: u64 = 100 * (1 << 20);

    /// Rotate once the active file would exceed `max_size_bytes`, keeping `keep_files` old files.
    pub const fn by_size(max_size_bytes: u64, keep_files: usize) -> Self {
        Self {
            keep_files,
            max_size_bytes,
        }
    }
}

impl Default for FileOptions {
    fn default() -> Self {
        Self::by_size(Self::DEFAULT_MAX_SIZE_BYTES, 0)
    }
}

#[derive(Debug)]
struct ActiveFile {
    file: File,
    size: u64,
}

impl ActiveFile {
    fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }

    /// Whether `path` still names this open file.
    #[cfg(unix)]
    fn is_at(&self, path: &Path) -> bool {
        use std::os::unix::fs::MetadataExt;
        match (self.file.metadata(), std::fs::metadata(path)) {
            (Ok(open), Ok(named)) => open.dev() == named.dev() && open.ino() == named.ino(),
            _ => false,
        }
    }

    #[cfg(not(unix))]
    fn is_at(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Appends formatted records to a file, rotating by size.
pub struct RotatingFileDevice {
    path: PathBuf,
    options: FileOptions,
    active: Mutex<Option<ActiveFile>>,
}

impl std::fmt::Debug for RotatingFileDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileDevice")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl RotatingFileDevice {
    /**
    Opens `path` for appending, creating it if needed.

    An existing file is continued, and its current size counts toward the rotation limit.
    */
    pub fn open(path: impl AsRef<Path>, options: FileOptions) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let active = ActiveFile::open(&path).map_err(|source| SinkError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            options,
            active: Mutex::new(Some(active)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> FileOptions {
        self.options
    }

    /// The path of the `index`th rotated file, `0` being the most recent.
    pub fn rotated_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn should_rotate(&self, size: u64, incoming: usize) -> bool {
        self.options.keep_files > 0
            && size > 0
            && size.saturating_add(incoming as u64) > self.options.max_size_bytes
    }

    /// Shifts the rotated files up by one and moves the active file to `.0`.
    fn shift_files(&self) -> std::io::Result<()> {
        let keep = self.options.keep_files;
        let oldest = self.rotated_path(keep - 1);
        match std::fs::remove_file(&oldest) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
            _ => {}
        }
        for index in (0..keep - 1).rev() {
            let from = self.rotated_path(index);
            if from.exists() {
                std::fs::rename(&from, self.rotated_path(index + 1))?;
            }
        }
        std::fs::rename(&self.path, self.rotated_path(0))
    }
}

impl Device for RotatingFileDevice {
    fn write_text(&self, text: &str) {
        let mut slot = self.active.lock_sync();
        let size = match &*slot {
            Some(active) => active.size,
            None => return,
        };
        if self.should_rotate(size, text.len()) {
            let still_ours = match &*slot {
                Some(active) => active.is_at(&self.path),
                None => false,
            };
            //close the handle before renaming the file underneath it
            *slot = None;
            if still_ours {
                if let Err(source) = self.shift_files() {
                    report_write_failure(&SinkError::Rotate {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
            match ActiveFile::open(&self.path) {
                Ok(active) => *slot = Some(active),
                Err(source) => {
                    report_write_failure(&SinkError::Open {
                        path: self.path.clone(),
                        source,
                    });
                    return;
                }
            }
        }
        let Some(active) = (*slot).as_mut() else {
            return;
        };
        match active.file.write_all(text.as_bytes()) {
            Ok(()) => active.size += text.len() as u64,
            Err(e) => report_write_failure(&e),
        }
    }

    fn flush(&self) {
        if let Some(active) = (*self.active.lock_sync()).as_mut() {
            if let Err(e) = active.file.flush() {
                report_write_failure(&e);
            }
        }
    }

    fn close(&self) {
        let closed = (*self.active.lock_sync()).take();
        if let Some(mut active) = closed {
            if let Err(e) = active.file.flush() {
                report_write_failure(&e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn no_rotation_when_keep_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.log");
        let device = RotatingFileDevice::open(&path, FileOptions::by_size(4, 0)).unwrap();
        device.write_text("0123456789\n");
        device.write_text("0123456789\n");
        device.close();
        assert_eq!(read(&path), "0123456789\n0123456789\n");
        assert!(!device.rotated_path(0).exists());
    }

    #[test]
    fn keeps_at_most_keep_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let device = RotatingFileDevice::open(&path, FileOptions::by_size(4, 2)).unwrap();
        for record in ["a---\n", "b---\n", "c---\n", "d---\n"] {
            device.write_text(record);
        }
        device.close();
        assert_eq!(read(&path), "d---\n");
        assert_eq!(read(&device.rotated_path(0)), "c---\n");
        assert_eq!(read(&device.rotated_path(1)), "b---\n");
        assert!(!device.rotated_path(2).exists());
    }

    #[test]
    fn existing_size_counts_toward_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.log");
        std::fs::write(&path, "earlier\n").unwrap();
        let device = RotatingFileDevice::open(&path, FileOptions::by_size(10, 1)).unwrap();
        device.write_text("later\n");
        device.close();
        assert_eq!(read(&path), "later\n");
        assert_eq!(read(&device.rotated_path(0)), "earlier\n");
    }

    #[cfg(unix)]
    #[test]
    fn second_device_does_not_rotate_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.log");
        let first = RotatingFileDevice::open(&path, FileOptions::by_size(10, 2)).unwrap();
        let second = RotatingFileDevice::open(&path, FileOptions::by_size(10, 2)).unwrap();
        first.write_text("0123456\n");
        second.write_text("abcdefg\n");
        //first rotates the shared file away
        first.write_text("xxxxxxx\n");
        //second is now holding shared.log.0; it must reopen, not rotate again
        second.write_text("yyyyyyy\n");
        first.close();
        second.close();

        assert_eq!(read(&path), "xxxxxxx\nyyyyyyy\n");
        assert_eq!(read(&first.rotated_path(0)), "0123456\nabcdefg\n");
        assert!(!first.rotated_path(1).exists());
    }

    #[test]
    fn open_failure_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");
        let err = RotatingFileDevice::open(&path, FileOptions::default()).unwrap_err();
        assert!(matches!(err, SinkError::Open { .. }));
        assert!(err.to_string().contains("app.log"));
    }

    #[test]
    fn writes_after_close_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("closed.log");
        let device = RotatingFileDevice::open(&path, FileOptions::default()).unwrap();
        device.write_text("kept\n");
        device.close();
        device.write_text("dropped\n");
        assert_eq!(read(&path), "kept\n");
    }

    #[test]
    fn default_options() {
        let options = FileOptions::default();
        assert_eq!(options.keep_files, 0);
        assert_eq!(options.max_size_bytes, 104_857_600);
    }
}
