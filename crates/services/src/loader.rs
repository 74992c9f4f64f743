//! Off-thread directory scans with supersede-and-cancel semantics.
//!
//! Each screen keeps one loader. A new `load` flips the previous scan's
//! cancellation flag; the flag is checked between entries, so in-progress
//! I/O is never interrupted, and a cancelled scan publishes nothing.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use shared::error::Result;

use crate::listing::{scan_directory, FileEntry};

/// Outcome of one scan, tagged with the directory it was started for so the
/// receiver can drop stale deliveries.
#[derive(Debug)]
pub struct ScanResult {
    pub dir: PathBuf,
    pub outcome: Result<Vec<FileEntry>>,
}

#[derive(Default)]
pub struct DirectoryLoader {
    cancel: Option<Arc<AtomicBool>>,
}

impl DirectoryLoader {
    pub fn new() -> Self {
        Self { cancel: None }
    }

    /// Start scanning `dir` on a background thread, superseding any
    /// in-flight scan. The result arrives on `tx` unless this scan is
    /// itself superseded first.
    pub fn load(&mut self, dir: PathBuf, tx: Sender<ScanResult>) {
        self.cancel_in_flight();
        let cancelled = Arc::new(AtomicBool::new(false));
        self.cancel = Some(cancelled.clone());

        std::thread::spawn(move || match scan_directory(&dir, &cancelled) {
            Some(outcome) => {
                // Receiver gone means the screen went away; nothing to do.
                let _ = tx.send(ScanResult { dir, outcome });
            }
            None => tracing::debug!(dir = %dir.display(), "directory scan superseded"),
        });
    }

    /// Cooperatively cancel the in-flight scan, if any.
    pub fn cancel_in_flight(&mut self) {
        if let Some(flag) = self.cancel.take() {
            flag.store(true, Ordering::Relaxed);
        }
    }
}

impl Drop for DirectoryLoader {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::Error;
    use std::fs::File;
    use std::sync::mpsc::channel;
    use std::time::Duration;

    #[test]
    fn load_delivers_a_sorted_listing() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        std::fs::create_dir(dir.path().join("A")).unwrap();

        let (tx, rx) = channel();
        let mut loader = DirectoryLoader::new();
        loader.load(dir.path().to_path_buf(), tx);

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result.dir, dir.path());
        let names: Vec<String> = result
            .outcome
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["A", "b.txt"]);
    }

    #[test]
    fn load_reports_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("nope");

        let (tx, rx) = channel();
        let mut loader = DirectoryLoader::new();
        loader.load(gone, tx);

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(result.outcome, Err(Error::NotFound(_))));
    }

    #[test]
    fn a_new_load_supersedes_the_previous_scan() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        File::create(second.path().join("kept.txt")).unwrap();

        let (tx, rx) = channel();
        let mut loader = DirectoryLoader::new();
        loader.load(first.path().to_path_buf(), tx.clone());
        loader.load(second.path().to_path_buf(), tx);

        // The superseding scan always lands; the first one may or may not
        // have finished before its flag flipped. Deliveries are tagged, so
        // wait for the one that matters.
        loop {
            let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            if result.dir == second.path() {
                let names: Vec<String> = result
                    .outcome
                    .unwrap()
                    .into_iter()
                    .map(|e| e.name)
                    .collect();
                assert_eq!(names, ["kept.txt"]);
                break;
            }
        }
    }
}
