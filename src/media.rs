//! Media helpers for previewing records
//!
//! Decides how a stored record would be shown (image, video, audio, text)
//! and extracts YouTube video ids for embedding.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use crate::record::FileRecord;

static YOUTUBE_ID: OnceLock<Regex> = OnceLock::new();

/// How a record can be previewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Text,
    Other,
}

impl MediaKind {
    /// Classify from the MIME type first, then from the text flag
    pub fn of(record: &FileRecord) -> Self {
        let mime = record.mime_type.to_ascii_lowercase();
        if mime.starts_with("image/") {
            MediaKind::Image
        } else if mime.starts_with("video/") {
            MediaKind::Video
        } else if mime.starts_with("audio/") {
            MediaKind::Audio
        } else if record.is_text() {
            MediaKind::Text
        } else {
            MediaKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Text => "text",
            MediaKind::Other => "other",
        }
    }

    /// Whether the record can be rendered inline as media
    pub fn is_visual(&self) -> bool {
        matches!(self, MediaKind::Image | MediaKind::Video)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extract the video id from a YouTube watch, short or embed URL
pub fn youtube_video_id(url: &str) -> Option<String> {
    let re = YOUTUBE_ID.get_or_init(|| {
        Regex::new(r"(?:v=|youtu\.be/|youtube\.com/embed/)([^?&]+)")
            .expect("static regex is valid")
    });
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Embed URL for a YouTube video id
pub fn youtube_embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{}", video_id)
}
