//! Bounded recall history: a FIFO of accepted lines with duplicate
//! suppression, focus-preserving navigation, and atomic file persistence.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A bounded ring of previously accepted lines.
///
/// Pushing a line equal to the most recent entry is a no-op. Once `capacity`
/// entries are held, pushing a new one drops the oldest (head-dropping, not
/// the teacher's circular overwrite-in-place).
#[derive(Debug)]
pub struct History {
    entries: std::collections::VecDeque<String>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: std::collections::VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Random access; panics if `i >= size()`, matching the spec's
    /// precondition `0 <= i < size`.
    pub fn index(&self, i: usize) -> &str {
        &self.entries[i]
    }

    /// Appends `line` unless it equals the most recent entry; evicts the
    /// oldest entry once capacity is exceeded.
    pub fn push(&mut self, line: &str) {
        if self.entries.back().map(|s| s.as_str()) == Some(line) {
            return;
        }
        self.entries.push_back(line.to_string());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        log::debug!("history: pushed entry, size now {}", self.entries.len());
    }

    /// Loads newline-delimited entries from `path`, oldest first. A missing
    /// file is not an error. Entries beyond capacity cause the oldest ones
    /// to be dropped as they're pushed.
    pub fn read(&mut self, path: &Path) -> Result<()> {
        // Read raw bytes, not `read_to_string`: a history entry is an
        // immutable byte string (§3), and a file with non-UTF-8 bytes must
        // still load with its malformed lines accepted as-is (§4.3), not
        // fail the whole load.
        let contents = match fs::read(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("history: no existing file at {path:?}");
                return Ok(());
            }
            Err(source) => {
                return Err(Error::HistoryFile {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        // A trailing newline terminates the last entry rather than
        // introducing a phantom blank one after it; strip exactly one
        // before splitting so genuine blank lines in the middle survive.
        let trimmed = contents.strip_suffix(b"\n").unwrap_or(&contents);
        let lines: Vec<&[u8]> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split(|&b| b == b'\n').collect()
        };
        for line in lines {
            self.entries
                .push_back(String::from_utf8_lossy(line).into_owned());
            while self.entries.len() > self.capacity {
                self.entries.pop_front();
            }
        }
        log::info!("history: loaded {} entries from {path:?}", self.entries.len());
        Ok(())
    }

    /// Serializes entries in order, one per line, crash-safely: writes to a
    /// temporary sibling and renames it over `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        let tmp_path = sibling_tmp_path(path);
        let mut tmp = fs::File::create(&tmp_path).map_err(|source| Error::HistoryFile {
            path: tmp_path.clone(),
            source,
        })?;
        for entry in &self.entries {
            tmp.write_all(entry.as_bytes())
                .and_then(|_| tmp.write_all(b"\n"))
                .map_err(|source| Error::HistoryFile {
                    path: tmp_path.clone(),
                    source,
                })?;
        }
        tmp.flush().map_err(|source| Error::HistoryFile {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, path).map_err(|source| Error::HistoryFile {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("history: wrote {} entries to {path:?}", self.entries.len());
        Ok(())
    }
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn push_dedups_immediate_repeats() {
        let mut h = History::new(10);
        h.push("a");
        h.push("a");
        h.push("b");
        assert_eq!(h.size(), 2);
        assert_eq!(h.index(0), "a");
        assert_eq!(h.index(1), "b");
    }

    #[test]
    fn push_evicts_oldest_over_capacity() {
        let mut h = History::new(2);
        h.push("a");
        h.push("b");
        h.push("c");
        assert_eq!(h.size(), 2);
        assert_eq!(h.index(0), "b");
        assert_eq!(h.index(1), "c");
    }

    #[test]
    fn read_missing_file_is_not_an_error() {
        let mut h = History::new(10);
        let path = env::temp_dir().join("keyline-test-missing-does-not-exist.hist");
        let _ = fs::remove_file(&path);
        assert!(h.read(&path).is_ok());
        assert_eq!(h.size(), 0);
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut h = History::new(10);
        h.push("one");
        h.push("two");
        h.push("three");

        let path = env::temp_dir().join(format!("keyline-test-{}.hist", std::process::id()));
        h.write(&path).unwrap();

        let mut reloaded = History::new(10);
        reloaded.read(&path).unwrap();
        assert_eq!(reloaded.size(), 3);
        assert_eq!(reloaded.index(0), "one");
        assert_eq!(reloaded.index(2), "three");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn read_respects_capacity_keeping_newest() {
        let path = env::temp_dir().join(format!("keyline-test-cap-{}.hist", std::process::id()));
        fs::write(&path, "a\nb\nc\nd\n").unwrap();

        let mut h = History::new(2);
        h.read(&path).unwrap();
        assert_eq!(h.size(), 2);
        assert_eq!(h.index(0), "c");
        assert_eq!(h.index(1), "d");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn read_tolerates_non_utf8_bytes_in_file() {
        let path = env::temp_dir().join(format!("keyline-test-badutf8-{}.hist", std::process::id()));
        fs::write(&path, [b'a', b'\n', 0xFF, 0xFE, b'\n', b'c']).unwrap();

        let mut h = History::new(10);
        assert!(h.read(&path).is_ok());
        assert_eq!(h.size(), 3);
        assert_eq!(h.index(0), "a");
        assert_eq!(h.index(2), "c");

        fs::remove_file(&path).unwrap();
    }
}
