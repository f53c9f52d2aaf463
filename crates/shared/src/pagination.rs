//! Identity-based cursor pagination.
//!
//! Collections are always ordered by identity, newest first. A page is
//! bounded by `limit` and by the optional `after`/`before` boundaries:
//! `after` keeps identities strictly lower than the boundary (older rows),
//! `before` keeps identities strictly higher (newer rows).

use serde::{Deserialize, Serialize};

/// Page size used when the request does not specify one.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Upper bound for the requested page size.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Pagination boundary parameters accepted from the query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub after: Option<i64>,
    pub before: Option<i64>,
}

impl PageParams {
    /// Returns the page size: the default when absent, otherwise the request
    /// clamped to `0..=MAX_PAGE_LIMIT`. A zero limit yields an empty page.
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .map_or(DEFAULT_PAGE_LIMIT, |limit| limit.clamp(0, MAX_PAGE_LIMIT))
    }
}

/// Reads a page size from query-string text.
///
/// Takes the leading optional sign and digits; text without any reads as 0.
pub fn parse_limit(raw: &str) -> i64 {
    let raw = raw.trim_start();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let value = digits
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .fold(0i64, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add(i64::from(c as u8 - b'0'))
        });
    if negative {
        -value
    } else {
        value
    }
}

/// Cursor markers reported alongside a page.
///
/// `count` is the size of the returned page, not the number of matching rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub count: usize,
    pub next: Option<i64>,
    pub prev: Option<i64>,
}

impl Pagination {
    /// Builds the markers from the identities of a returned page, in page order.
    pub fn from_ids(ids: &[i64]) -> Self {
        Self {
            count: ids.len(),
            next: ids.last().copied(),
            prev: ids.first().copied(),
        }
    }

    /// Builds the markers for any page of items.
    pub fn for_page<T, F>(page: &[T], id_of: F) -> Self
    where
        F: Fn(&T) -> i64,
    {
        let ids: Vec<i64> = page.iter().map(id_of).collect();
        Self::from_ids(&ids)
    }
}
