//! Helper functions for the Genesis app.

use std::fs;
use std::path::PathBuf;

use services::listing::FileEntry;
use services::permissions::{Permission, PermissionProbe};
use shared::error::Error;

use crate::types::{Author, ChatEntry};

/// Desktop stand-in for OS permission grants: a grant counts as held when
/// the target directory is actually accessible for the matching operation.
pub struct FsProbe {
    target: PathBuf,
}

impl FsProbe {
    pub fn new(target: PathBuf) -> Self {
        Self { target }
    }
}

impl PermissionProbe for FsProbe {
    fn is_granted(&self, permission: Permission) -> bool {
        match permission {
            Permission::ReadImages
            | Permission::ReadVideo
            | Permission::ReadAudio
            | Permission::ReadStorage => fs::read_dir(&self.target).is_ok(),
            Permission::WriteStorage | Permission::ManageStorage => fs::metadata(&self.target)
                .map(|m| !m.permissions().readonly())
                .unwrap_or(false),
        }
    }
}

/// B/KB/MB/GB by integer division, as shown on listing rows.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    if size < KB {
        format!("{} B", size)
    } else if size < MB {
        format!("{} KB", size / KB)
    } else if size < GB {
        format!("{} MB", size / MB)
    } else {
        format!("{} GB", size / GB)
    }
}

/// The exported chat transcript.
pub fn export_content(entries: &[ChatEntry]) -> String {
    let mut out = String::from("=== Genesis Chat Export ===\n\n");
    for entry in entries {
        let label = match entry.author {
            Author::User => "You",
            Author::Genesis => "Genesis",
        };
        out.push_str(&format!("{}: {}\n", label, entry.text));
    }
    out
}

/// Kind marker shown in front of a listing row.
pub fn entry_icon(entry: &FileEntry) -> &'static str {
    if entry.is_dir {
        return "📁";
    }
    let ext = entry
        .path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "webp" => "🖼",
        "pdf" | "doc" | "docx" | "xls" | "xlsx" => "📑",
        "zip" | "rar" | "7z" | "tar" | "gz" => "📦",
        "mp3" | "wav" | "aac" | "mp4" | "mov" | "avi" => "🎞",
        "txt" | "log" | "json" | "xml" | "html" | "csv" | "md" | "rs" | "py" => "📝",
        _ => "📄",
    }
}

/// User-facing notice for a failure.
pub fn notice_for_error(err: &Error) -> String {
    match err {
        Error::NotFound(what) => format!("Directory not found: {}", what),
        Error::PermissionDenied(what) => format!("Permission denied: {}", what),
        Error::Io(e) => format!("Error accessing storage: {}", e),
        Error::Network(detail) => format!("Could not reach the server: {}", detail),
        Error::EmptyResponse => "Error: Empty response from server".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sizes_use_integer_division() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
        // Truncation, not rounding.
        assert_eq!(format_file_size(1024 * 1024 - 1), "1023 KB");
    }

    #[test]
    fn chat_export_carries_the_header_and_labels() {
        let entries = vec![
            ChatEntry::user("hello"),
            ChatEntry::genesis("Need help with anything?"),
        ];
        let content = export_content(&entries);
        assert!(content.starts_with("=== Genesis Chat Export ===\n\n"));
        assert!(content.contains("You: hello\n"));
        assert!(content.contains("Genesis: Need help with anything?\n"));
    }

    #[test]
    fn notices_name_the_failure() {
        let notice = notice_for_error(&Error::EmptyResponse);
        assert_eq!(notice, "Error: Empty response from server");
        let notice = notice_for_error(&Error::NotFound("/sdcard".to_string()));
        assert!(notice.contains("/sdcard"));
    }
}
