//! Record types - the single persisted entity of the vault
//!
//! A `FileRecord` is one stored file: its metadata plus the full byte
//! content. Records are created only by `FileVault::add` and destroyed only
//! by `delete_by_id` / `clear_all`; there is no update path.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Metadata supplied by the import source alongside the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Original filename (not unique, not validated)
    pub name: String,
    /// MIME type as reported by the source; may be empty
    pub mime_type: String,
    /// Size as reported by the source
    pub size: u64,
}

impl FileMetadata {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    /// Build metadata for a file read from disk, guessing the MIME type
    /// from its extension.
    pub fn for_path(path: &Path, size: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mime_type = guess_mime_type(&name);
        Self::new(name, mime_type, size)
    }
}

/// A record ready for insertion: every field except the store-assigned `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFileRecord {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub data: Vec<u8>,
    pub text_content: Option<String>,
    pub created: DateTime<Utc>,
}

/// A stored file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    /// Store-assigned primary key
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Byte length of `data` at insert time
    pub size: u64,
    /// Full binary content
    #[serde(skip)]
    pub data: Vec<u8>,
    /// Full UTF-8 decode of `data`, present only when classified as text
    pub text_content: Option<String>,
    /// Insert timestamp
    pub created: DateTime<Utc>,
}

impl FileRecord {
    pub fn is_text(&self) -> bool {
        self.text_content.is_some()
    }

    /// Display name, falling back to the id for records without one
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("file-{}", self.id)
        } else {
            self.name.clone()
        }
    }
}

/// Guess a MIME type from a filename extension.
///
/// Unknown extensions yield an empty string, the same thing a browser
/// reports for a file it cannot type.
pub fn guess_mime_type(filename: &str) -> String {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return String::new(),
    };
    match ext.as_str() {
        "txt" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "zip" => "application/zip",
        "tar" => "application/x-tar",
        "gz" => "application/gzip",
        _ => "",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("notes.txt"), "text/plain");
        assert_eq!(guess_mime_type("IMG.PNG"), "image/png");
        assert_eq!(guess_mime_type("clip.webm"), "video/webm");
        assert_eq!(guess_mime_type("archive.tar.gz"), "application/gzip");
        assert_eq!(guess_mime_type("Makefile"), "");
        assert_eq!(guess_mime_type("data.xyz"), "");
    }

    #[test]
    fn test_metadata_for_path() {
        let meta = FileMetadata::for_path(Path::new("/tmp/some/dir/photo.jpg"), 42);
        assert_eq!(meta.name, "photo.jpg");
        assert_eq!(meta.mime_type, "image/jpeg");
        assert_eq!(meta.size, 42);
    }

    #[test]
    fn test_record_json_omits_data() {
        let record = FileRecord {
            id: 7,
            name: "a.bin".to_string(),
            mime_type: String::new(),
            size: 3,
            data: vec![1, 2, 3],
            text_content: None,
            created: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["type"], "");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn test_display_name_fallback() {
        let mut record = FileRecord {
            id: 3,
            name: String::new(),
            mime_type: String::new(),
            size: 0,
            data: Vec::new(),
            text_content: None,
            created: Utc::now(),
        };
        assert_eq!(record.display_name(), "file-3");
        record.name = "x.txt".to_string();
        assert_eq!(record.display_name(), "x.txt");
    }
}
