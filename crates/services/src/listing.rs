//! Directory enumeration, ordering, and list diffing for the file browser.
//!
//! Listings are always re-derived from the filesystem; nothing is cached
//! beyond the screen that requested them. Rows match across snapshots by
//! absolute path, and the diff produces an index-addressed edit script the
//! UI replays instead of redrawing the whole list.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::error::{Error, Result};

/// One row in a directory listing. Identity is the absolute path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl FileEntry {
    /// Same row content as far as the UI is concerned: size, modified time,
    /// and display name.
    pub fn same_content(&self, other: &FileEntry) -> bool {
        self.size == other.size && self.modified == other.modified && self.name == other.name
    }
}

/// Directories sort before files; within each group names compare
/// case-insensitively. The path breaks remaining ties so the order is total.
pub fn listing_order(a: &FileEntry, b: &FileEntry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.path.cmp(&b.path))
}

fn entry_for(path: PathBuf) -> FileEntry {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    // Metadata is best effort: an entry deleted mid-scan still gets a row,
    // with zeroed details, rather than failing the whole listing.
    let meta = fs::metadata(&path).ok();
    let is_dir = meta.as_ref().map(|m| m.is_dir()).unwrap_or(false);
    let size = meta.as_ref().map(|m| m.len()).unwrap_or(0);
    let modified = meta
        .and_then(|m| m.modified().ok())
        .map(DateTime::<Utc>::from);

    FileEntry {
        path,
        name,
        is_dir,
        size,
        modified,
    }
}

/// Enumerate `dir`, returning entries in display order.
///
/// A missing or non-directory target maps to `NotFound`; an OS refusal to
/// `PermissionDenied`; anything else to `Io`.
pub fn read_directory(dir: &Path) -> Result<Vec<FileEntry>> {
    match scan_directory(dir, &AtomicBool::new(false)) {
        Some(listing) => listing,
        // The flag above is never set.
        None => Ok(Vec::new()),
    }
}

/// As [`read_directory`], but checks `cancelled` between entries and gives
/// up cooperatively. Returns `None` when the scan was cancelled.
pub fn scan_directory(dir: &Path, cancelled: &AtomicBool) -> Option<Result<Vec<FileEntry>>> {
    let meta = match fs::metadata(dir) {
        Ok(meta) => meta,
        Err(e) => return Some(Err(Error::from_io(dir, e))),
    };
    if !meta.is_dir() {
        return Some(Err(Error::NotFound(dir.display().to_string())));
    }

    let reader = match fs::read_dir(dir) {
        Ok(reader) => reader,
        Err(e) => return Some(Err(Error::from_io(dir, e))),
    };

    let mut entries = Vec::new();
    for entry in reader {
        if cancelled.load(AtomicOrdering::Relaxed) {
            return None;
        }
        match entry {
            Ok(entry) => entries.push(entry_for(entry.path())),
            Err(e) => return Some(Err(Error::from_io(dir, e))),
        }
    }

    if cancelled.load(AtomicOrdering::Relaxed) {
        return None;
    }
    entries.sort_by(listing_order);
    Some(Ok(entries))
}

/// A single step in a minimal listing update. Indices address the list as
/// patched so far, so scripts replay in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEdit {
    Insert { at: usize, entry: FileEntry },
    Remove { at: usize },
    Update { at: usize, entry: FileEntry },
}

/// Minimal edit script turning `old` into `new`. Both lists must already be
/// in display order. Rows pair up by path; a paired row whose size, modified
/// time, or name changed becomes an update. A row that switched between the
/// directory and file groups re-sorts, so it is removed and re-inserted.
pub fn diff(old: &[FileEntry], new: &[FileEntry]) -> Vec<ListEdit> {
    let mut edits = Vec::new();
    let (mut oi, mut ni, mut at) = (0usize, 0usize, 0usize);

    while oi < old.len() && ni < new.len() {
        let o = &old[oi];
        let n = &new[ni];
        if o.path == n.path && o.is_dir == n.is_dir {
            if !o.same_content(n) {
                edits.push(ListEdit::Update {
                    at,
                    entry: n.clone(),
                });
            }
            oi += 1;
            ni += 1;
            at += 1;
        } else if listing_order(o, n) == Ordering::Less {
            edits.push(ListEdit::Remove { at });
            oi += 1;
        } else {
            edits.push(ListEdit::Insert {
                at,
                entry: n.clone(),
            });
            ni += 1;
            at += 1;
        }
    }
    while oi < old.len() {
        edits.push(ListEdit::Remove { at });
        oi += 1;
    }
    while ni < new.len() {
        edits.push(ListEdit::Insert {
            at,
            entry: new[ni].clone(),
        });
        ni += 1;
        at += 1;
    }
    edits
}

/// Replay an edit script against `old`.
pub fn apply(old: &[FileEntry], edits: &[ListEdit]) -> Vec<FileEntry> {
    let mut rows = old.to_vec();
    for edit in edits {
        match edit {
            ListEdit::Insert { at, entry } => rows.insert(*at, entry.clone()),
            ListEdit::Remove { at } => {
                rows.remove(*at);
            }
            ListEdit::Update { at, entry } => rows[*at] = entry.clone(),
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn entry(name: &str, is_dir: bool) -> FileEntry {
        FileEntry {
            path: PathBuf::from(format!("/base/{}", name)),
            name: name.to_string(),
            is_dir,
            size: 0,
            modified: None,
        }
    }

    fn sorted(mut entries: Vec<FileEntry>) -> Vec<FileEntry> {
        entries.sort_by(listing_order);
        entries
    }

    #[test]
    fn directories_sort_before_files_case_insensitively() {
        let listing = sorted(vec![
            entry("b.txt", false),
            entry("A", true),
            entry("a.txt", false),
        ]);
        let names: Vec<&str> = listing.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "a.txt", "b.txt"]);
    }

    #[test]
    fn read_directory_lists_and_orders_entries() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        fs::create_dir(dir.path().join("A")).unwrap();
        File::create(dir.path().join("a.txt")).unwrap();

        let listing = read_directory(dir.path()).unwrap();
        let names: Vec<&str> = listing.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "a.txt", "b.txt"]);
        assert!(listing[0].is_dir);
    }

    #[test]
    fn missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("nope");
        assert!(matches!(
            read_directory(&gone).unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[test]
    fn a_file_target_is_not_found_too() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        File::create(&file).unwrap().write_all(b"x").unwrap();
        assert!(matches!(
            read_directory(&file).unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[test]
    fn cancelled_scan_reports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        let cancelled = AtomicBool::new(true);
        assert!(scan_directory(dir.path(), &cancelled).is_none());
    }

    #[test]
    fn diff_then_apply_reproduces_the_new_listing() {
        let old = sorted(vec![
            entry("docs", true),
            entry("a.txt", false),
            entry("b.txt", false),
        ]);
        let mut changed = entry("b.txt", false);
        changed.size = 42;
        let new = sorted(vec![
            entry("docs", true),
            entry("music", true),
            changed,
            entry("c.txt", false),
        ]);

        let edits = diff(&old, &new);
        assert_eq!(apply(&old, &edits), new);
    }

    #[test]
    fn unchanged_listings_produce_no_edits() {
        let listing = sorted(vec![entry("docs", true), entry("a.txt", false)]);
        assert!(diff(&listing, &listing).is_empty());
    }

    #[test]
    fn content_changes_become_updates_not_churn() {
        let old = sorted(vec![entry("a.txt", false)]);
        let mut touched = entry("a.txt", false);
        touched.size = 7;
        let new = sorted(vec![touched.clone()]);

        let edits = diff(&old, &new);
        assert_eq!(
            edits,
            vec![ListEdit::Update {
                at: 0,
                entry: touched
            }]
        );
    }

    #[test]
    fn a_group_flip_is_remove_plus_insert() {
        // "b" was a file and became a directory: it re-sorts to the front.
        let old = sorted(vec![entry("a", true), entry("b", false)]);
        let new = sorted(vec![entry("a", false), entry("b", true)]);

        let edits = diff(&old, &new);
        assert_eq!(apply(&old, &edits), new);
    }

    #[test]
    fn from_and_to_empty_round_trip() {
        let listing = sorted(vec![entry("a.txt", false)]);
        let empty: Vec<FileEntry> = Vec::new();

        let edits = diff(&empty, &listing);
        assert_eq!(apply(&empty, &edits), listing);

        let edits = diff(&listing, &empty);
        assert_eq!(apply(&listing, &edits), empty);
    }
}
