use crate::constants::{DEFAULT_STORE_URL, THUMBNAIL_BUCKET_PATH};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Streaming platform a VOD was originally broadcast on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitch,
    Kick,
    Unknown,
}

impl Platform {
    /// Parses store text into a platform, case-insensitively. Anything the
    /// store invents later degrades to `Unknown` rather than failing a row.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "twitch" => Platform::Twitch,
            "kick" => Platform::Kick,
            _ => Platform::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitch => "twitch",
            Platform::Kick => "kick",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved VOD's metadata. Assembled fresh from each store response and
/// never mutated; a new fetch fully replaces the prior value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Original video URL, byte-exact as archived.
    pub source_url: String,
    /// 64-char lowercase hex SHA-256 digest of `source_url`.
    pub lookup_key: String,
    pub title: String,
    pub platform: Platform,
    pub summary: String,
    /// Store insertion order. May redundantly contain the platform name.
    pub tags: Vec<String>,
    /// Upload timestamp, falling back to the row-creation timestamp.
    /// `None` means the display layer shows its "unavailable" state.
    pub published_at: Option<DateTime<Utc>>,
}

impl VideoRecord {
    /// Thumbnail location derived from the lookup key. Not stored; the
    /// bucket is content-addressed by the same digest as the metadata row.
    pub fn thumbnail_ref(&self) -> String {
        format!(
            "{}/{}/{}.jpg",
            DEFAULT_STORE_URL, THUMBNAIL_BUCKET_PATH, self.lookup_key
        )
    }

    /// Tags with any entry matching the platform name removed, for
    /// consumers that already render a platform badge next to the tag list.
    pub fn display_tags(&self) -> Vec<&str> {
        let platform = self.platform.as_str();
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|tag| !tag.eq_ignore_ascii_case(platform))
            .collect()
    }
}
