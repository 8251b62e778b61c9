//! PostgREST query construction for the three store access shapes.
//!
//! These are pure functions so the exact filter grammar the store sees can
//! be unit-tested without a network.

use crate::constants::DEFAULT_LIST_LIMIT;
use crate::types::Platform;
use chrono::NaiveDate;

/// Columns fetched for every shape; rows carry their own lookup key so
/// listing and search never need to recompute digests.
pub const ROW_COLUMNS: &str = "url,url_hash,pleb_title,platform,summary,tags,uploaded_at,created_at";

/// Ordering contract for listing and search: newest first, rows without an
/// upload timestamp at the end.
pub const RECENT_ORDER: &str = "uploaded_at.desc.nullslast";

/// Filter criteria for the diary listing (shape B).
#[derive(Debug, Clone)]
pub struct ListFilter {
    pub limit: u32,
    /// `None` means all platforms.
    pub platform: Option<Platform>,
    /// Inclusive lower bound on the published date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the published date.
    pub to: Option<NaiveDate>,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            platform: None,
            from: None,
            to: None,
        }
    }
}

/// Shape A: equality on the key column, at most one row.
pub fn by_key_params(key: &str) -> Vec<(String, String)> {
    vec![
        ("select".to_string(), ROW_COLUMNS.to_string()),
        ("url_hash".to_string(), format!("eq.{}", key)),
        ("limit".to_string(), "1".to_string()),
    ]
}

/// Shape B: optional platform and date-range filters, newest first.
pub fn recent_params(filter: &ListFilter) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), ROW_COLUMNS.to_string())];

    if let Some(platform) = filter.platform {
        params.push(("platform".to_string(), format!("eq.{}", platform)));
    }
    if let Some(from) = filter.from {
        params.push(("uploaded_at".to_string(), format!("gte.{}", from)));
    }
    if let Some(to) = filter.to {
        // The column is a timestamp, so an inclusive date bound means
        // "anything before the following midnight".
        match to.succ_opt() {
            Some(next_day) => params.push(("uploaded_at".to_string(), format!("lt.{}", next_day))),
            None => params.push(("uploaded_at".to_string(), format!("lte.{}", to))),
        }
    }

    params.push(("order".to_string(), RECENT_ORDER.to_string()));
    params.push(("limit".to_string(), filter.limit.to_string()));
    params
}

/// Shape C: case-insensitive substring match on title and URL. This only
/// bounds the payload; the resolver re-checks every row client-side because
/// the store's pattern filter cannot see the array-typed tags column.
pub fn search_params(term: &str, limit: u32) -> Vec<(String, String)> {
    let pattern = quoted_pattern(term);
    vec![
        ("select".to_string(), ROW_COLUMNS.to_string()),
        (
            "or".to_string(),
            format!("(pleb_title.ilike.{},url.ilike.{})", pattern, pattern),
        ),
        ("order".to_string(), RECENT_ORDER.to_string()),
        ("limit".to_string(), limit.to_string()),
    ]
}

/// Wraps a user-supplied term in a double-quoted PostgREST pattern literal
/// so reserved characters (commas, parens) cannot break the `or=` grammar.
fn quoted_pattern(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"*{}*\"", escaped)
}
