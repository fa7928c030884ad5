//! Data models for textstore
//!
//! Defines the `FileRecord` metadata entry and the input normalization
//! shared by the create and update paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Logical content tag carried by every record created locally.
pub const TEXT_PLAIN: &str = "text/plain";

/// Placeholder used when a filename is omitted or blank.
pub const DEFAULT_FILENAME: &str = "untitled.txt";

/// One entry in the metadata index.
///
/// Field names serialize as camelCase; this is the on-disk format of the
/// index value and must stay stable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Unique identifier, assigned at creation and never reused
    pub id: Uuid,
    /// Public name, unique across the store (case-sensitive)
    pub filename: String,
    /// Display label, falls back to the filename
    pub title: String,
    /// Logical content tag
    pub content_type: String,
    /// Byte length of the body in its UTF-8 encoding
    pub size: u64,
    /// When this record was created
    pub created_at: DateTime<Utc>,
    /// When this record was last modified
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Create a record for a new file, stamping both timestamps with now.
    ///
    /// The caller is expected to pass already-normalized names; see
    /// [`normalize_filename`] and [`normalize_title`].
    pub fn new(filename: impl Into<String>, title: impl Into<String>, content: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            title: title.into(),
            content_type: TEXT_PLAIN.to_string(),
            size: content.len() as u64,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Normalize a requested filename.
///
/// Trims surrounding whitespace; an absent or blank value falls back to
/// `fallback` (the placeholder name on create, the record's current
/// filename on update). Create and update share this single step so the
/// two paths cannot drift apart.
pub fn normalize_filename(filename: Option<&str>, fallback: &str) -> String {
    match filename.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => fallback.to_string(),
    }
}

/// Normalize a requested title.
///
/// Trims surrounding whitespace; an absent or blank value falls back to
/// the filename, so a title is never empty.
pub fn normalize_title(title: Option<&str>, filename: &str) -> String {
    match title.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => filename.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_new() {
        let record = FileRecord::new("notes.txt", "Notes", "hello");
        assert_eq!(record.filename, "notes.txt");
        assert_eq!(record.title, "Notes");
        assert_eq!(record.content_type, TEXT_PLAIN);
        assert_eq!(record.size, 5);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_size_is_byte_length_not_char_count() {
        let record = FileRecord::new("a.txt", "a", "héllo\n");
        // "é" is two bytes in UTF-8
        assert_eq!(record.size, 7);
    }

    #[test]
    fn test_normalize_filename_trims() {
        assert_eq!(normalize_filename(Some("  a.txt  "), DEFAULT_FILENAME), "a.txt");
    }

    #[test]
    fn test_normalize_filename_falls_back_when_blank() {
        assert_eq!(normalize_filename(None, DEFAULT_FILENAME), DEFAULT_FILENAME);
        assert_eq!(normalize_filename(Some(""), DEFAULT_FILENAME), DEFAULT_FILENAME);
        assert_eq!(normalize_filename(Some("   "), DEFAULT_FILENAME), DEFAULT_FILENAME);
    }

    #[test]
    fn test_normalize_filename_update_keeps_current() {
        assert_eq!(normalize_filename(None, "current.txt"), "current.txt");
        assert_eq!(normalize_filename(Some("  "), "current.txt"), "current.txt");
    }

    #[test]
    fn test_normalize_title_falls_back_to_filename() {
        assert_eq!(normalize_title(None, "a.txt"), "a.txt");
        assert_eq!(normalize_title(Some("  "), "a.txt"), "a.txt");
        assert_eq!(normalize_title(Some(" My File "), "a.txt"), "My File");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = FileRecord::new("a.txt", "A", "x");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("contentType").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("content_type").is_none());
    }

    #[test]
    fn test_record_serialization_round_trip() {
        let record = FileRecord::new("a.txt", "A", "body");
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: FileRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
