use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;

use super::error::MediaError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// The kind of media a file belongs to. Each kind maps to its own bucket
/// and carries its own MIME allow-list and size ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    /// Classify an incoming upload by its declared MIME type.
    ///
    /// Returns `None` for anything outside the allow-lists.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "video/mp4" | "video/webm" | "video/ogg" => Some(Self::Video),
            "image/jpeg" | "image/png" | "image/webp" => Some(Self::Image),
            _ => None,
        }
    }

    /// Parse a bucket name back into a kind (used by asset routes).
    pub fn from_bucket(bucket: &str) -> Option<Self> {
        match bucket {
            "course-videos" => Some(Self::Video),
            "course-thumbnails" => Some(Self::Image),
            _ => None,
        }
    }

    /// Bucket directory this kind is stored under.
    pub fn bucket(&self) -> &'static str {
        match self {
            Self::Video => "course-videos",
            Self::Image => "course-thumbnails",
        }
    }

    /// Size ceiling in bytes: 100 MB for videos, 5 MB for images.
    pub fn max_size(&self) -> u64 {
        match self {
            Self::Video => 100 * 1024 * 1024,
            Self::Image => 5 * 1024 * 1024,
        }
    }

    /// Extension used when the upload's filename has none.
    pub fn default_ext(&self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Image => "png",
        }
    }
}

/// A stored media file, addressed by kind + file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredMedia {
    pub kind: MediaKind,
    pub file_name: String,
    pub size: u64,
}

/// Generate a collision-resistant stored file name in the
/// `{tag}-{timestamp}` style, e.g. `thumbnail-1714672800123-9f3c.png`.
pub fn media_file_name(tag: &str, ext: &str) -> String {
    let tag: String = tag
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(32)
        .collect();
    let tag = if tag.is_empty() { "generic".into() } else { tag };
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = &uuid::Uuid::new_v4().simple().to_string()[..4];
    format!("{tag}-{millis}-{suffix}.{ext}")
}

/// Bucketed media file storage.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store data from an async reader under the given file name,
    /// enforcing the kind's size ceiling.
    async fn put_stream(
        &self,
        kind: MediaKind,
        file_name: &str,
        reader: BoxReader,
    ) -> Result<StoredMedia, MediaError>;

    /// Retrieve a media file as a streaming async reader.
    async fn get_stream(&self, kind: MediaKind, file_name: &str) -> Result<BoxReader, MediaError>;

    /// Check whether a media file exists.
    async fn exists(&self, kind: MediaKind, file_name: &str) -> Result<bool, MediaError>;

    /// Delete a media file.
    ///
    /// Returns `true` if the file was deleted, `false` if it did not exist.
    async fn delete(&self, kind: MediaKind, file_name: &str) -> Result<bool, MediaError>;

    /// Get the size of a media file in bytes.
    async fn size(&self, kind: MediaKind, file_name: &str) -> Result<u64, MediaError>;
}
