use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::filters::FilterOptions;

/// Kind of media backing an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "video" => MediaKind::Video,
            _ => MediaKind::Image,
        }
    }
}

/// A single media item returned by the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: i64,
    /// Opaque locator; asset resolution is entirely external
    pub path: String,
    pub kind: MediaKind,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
    /// Unknown until first rendered; filled in once via `set_dimensions`
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration_sec: Option<f64>,
    pub starred: bool,
}

impl MediaItem {
    /// Aspect ratio (height / width) when both dimensions are known
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 => Some(h as f64 / w as f64),
            _ => None,
        }
    }

    /// File name portion of the path, for display
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.path)
    }
}

/// Data required to register a new media item
#[derive(Debug, Clone)]
pub struct NewMediaItem {
    pub path: String,
    pub kind: MediaKind,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration_sec: Option<f64>,
}

/// A watched folder; inactive folders are excluded from the home scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    pub path: String,
    pub is_active: bool,
}

/// A named, persisted view: a folder set plus a filter snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    /// None until first saved
    pub id: Option<i64>,
    pub name: String,
    pub folder_paths: Vec<String>,
    pub filters: FilterOptions,
}

impl Feed {
    pub fn new(name: impl Into<String>, folder_paths: Vec<String>, filters: FilterOptions) -> Self {
        Self {
            id: None,
            name: name.into(),
            folder_paths,
            filters,
        }
    }
}

/// Normalize a folder path before it is stored or matched against.
///
/// Forward slashes, trimmed whitespace, UNC prefix stripped, and a
/// capitalized Windows drive letter so prefix matching stays consistent.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = path.replace('\\', "/").trim().to_string();

    if let Some(stripped) = normalized.strip_prefix("//?/") {
        normalized = stripped.to_string();
    }

    if normalized.len() > 2 && normalized.as_bytes()[1] == b':' {
        let drive = normalized
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('C');
        normalized = format!("{}:{}", drive, &normalized[2..]);
    }

    normalized
}
