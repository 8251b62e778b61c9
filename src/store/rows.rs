//! Boundary shapes for store rows and their normalization into
//! [`VideoRecord`] values.
//!
//! The store's rows are loose: nullable columns everywhere and a tags field
//! that arrives as either a JSON array or a comma-separated string. That
//! looseness stops here; nothing past this module sees a raw row.

use crate::constants::{NO_SUMMARY_PLACEHOLDER, UNTITLED_PLACEHOLDER};
use crate::error::{Result, VodError};
use crate::keys::{compute_lookup_key, is_lookup_key};
use crate::types::{Platform, VideoRecord};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Ordering;

/// One raw row from the metadata table.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoRow {
    pub url: Option<String>,
    pub url_hash: Option<String>,
    pub pleb_title: Option<String>,
    pub platform: Option<String>,
    pub summary: Option<String>,
    pub tags: Option<TagsField>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Tags column as the store actually serves it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    List(Vec<String>),
    Csv(String),
}

/// Normalizes one raw row into the strict record shape.
pub fn map_row(row: VideoRow) -> Result<VideoRecord> {
    let source_url = row.url.unwrap_or_default();

    // Rows from listing and search carry their own key; trust it when it is
    // well-formed, recompute from the URL otherwise.
    let lookup_key = match row.url_hash.filter(|key| is_lookup_key(key)) {
        Some(key) => key,
        None if !source_url.is_empty() => compute_lookup_key(&source_url)?,
        None => {
            return Err(VodError::ResponseFormat(
                "row carries neither url_hash nor url".to_string(),
            ))
        }
    };

    Ok(VideoRecord {
        source_url,
        lookup_key,
        title: row
            .pleb_title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| UNTITLED_PLACEHOLDER.to_string()),
        platform: row
            .platform
            .as_deref()
            .map(Platform::parse)
            .unwrap_or(Platform::Unknown),
        summary: row
            .summary
            .filter(|summary| !summary.trim().is_empty())
            .unwrap_or_else(|| NO_SUMMARY_PLACEHOLDER.to_string()),
        tags: normalize_tags(row.tags),
        published_at: row.uploaded_at.or(row.created_at),
    })
}

fn normalize_tags(tags: Option<TagsField>) -> Vec<String> {
    match tags {
        None => Vec::new(),
        Some(TagsField::List(items)) => items,
        Some(TagsField::Csv(value)) => value
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect(),
    }
}

/// Published-date-descending order with undated records last. The store is
/// asked for the same order; re-asserting it here keeps the contract even
/// when rows arrive from somewhere less disciplined.
pub fn sort_by_published_desc(records: &mut [VideoRecord]) {
    records.sort_by(|a, b| match (a.published_at, b.published_at) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Authoritative search predicate: the lowercased term must be a substring
/// of the lowercased title, source URL, or any tag. `needle` is expected to
/// be lowercased and trimmed already.
pub fn matches_search_term(record: &VideoRecord, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle)
        || record.source_url.to_lowercase().contains(needle)
        || record
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}
