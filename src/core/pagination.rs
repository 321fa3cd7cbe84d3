//! Pagination for listings and search results
//!
//! Relational listings use opaque cursors: URL-safe base64 JSON naming
//! the listing, the sort key of the boundary item and a direction.
//! Cursors carry no server state and stay valid for as long as the
//! corpus does. Search results use plain page numbers.

use std::ops::Range;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::core::error::{FurqanError, Result};

pub const CURSOR_PARAM: &str = "cursor";
pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "page_size";

/// Cursor-paginated listings and the arity of their sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Listing {
    Parts,
    Chapters,
    Verses,
}

impl Listing {
    fn key_len(&self) -> usize {
        match self {
            Listing::Parts | Listing::Chapters => 1,
            Listing::Verses => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Items sorting after the key
    After,
    /// Items sorting before the key
    Before,
}

/// Position in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub listing: Listing,
    pub key: Vec<u32>,
    pub direction: Direction,
}

impl Cursor {
    /// Encode cursor as URL-safe base64
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode a cursor issued for `listing`
    pub fn decode(listing: Listing, encoded: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| FurqanError::InvalidCursor(format!("bad encoding: {e}")))?;
        let cursor: Cursor = serde_json::from_slice(&bytes)
            .map_err(|e| FurqanError::InvalidCursor(format!("bad format: {e}")))?;

        if cursor.listing != listing {
            return Err(FurqanError::InvalidCursor(format!(
                "cursor belongs to another listing ({:?})",
                cursor.listing
            )));
        }
        if cursor.key.len() != listing.key_len() {
            return Err(FurqanError::InvalidCursor(format!(
                "expected a key of {} values, got {}",
                listing.key_len(),
                cursor.key.len()
            )));
        }
        Ok(cursor)
    }
}

/// Pagination parameters of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PageRequest {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let find = |name: &str| {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };
        Self {
            cursor: find(CURSOR_PARAM).filter(|c| !c.is_empty()),
            page: find(PAGE_PARAM),
            page_size: find(PAGE_SIZE_PARAM),
        }
    }
}

/// Decode a query string into ordered pairs
pub fn query_pairs(query: Option<&str>) -> Vec<(String, String)> {
    query
        .map(|q| {
            form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

/// Relative link keeping the caller's parameters except `replaced`
fn link(path: &str, params: &[(String, String)], replaced: &str, value: Option<String>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, val) in params.iter().filter(|(k, _)| k != replaced) {
        serializer.append_pair(key, val);
    }
    if let Some(value) = value {
        serializer.append_pair(replaced, &value);
    }
    let query = serializer.finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

fn clamp_page_size(raw: Option<&str>, default: usize, max: usize) -> usize {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) if n > 0 => (n as usize).min(max),
        _ => default,
    }
}

/// One page of a cursor-paginated listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CursorPage<T> {
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> CursorPage<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CursorPage<U> {
        CursorPage {
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Cursor paging over listings sorted by a unique key
#[derive(Debug, Clone, Copy)]
pub struct CursorPager {
    default_size: usize,
    max_size: usize,
}

impl CursorPager {
    pub fn new(default_size: usize, max_size: usize) -> Self {
        Self {
            default_size,
            max_size,
        }
    }

    /// Requested page size; non-positive or unparsable falls back to the default
    pub fn page_size(&self, raw: Option<&str>) -> usize {
        clamp_page_size(raw, self.default_size, self.max_size)
    }

    /// Slice one page out of `items`, which must be sorted by `key`
    pub fn paginate<T, F>(
        &self,
        listing: Listing,
        items: &[T],
        key: F,
        path: &str,
        params: &[(String, String)],
    ) -> Result<CursorPage<T>>
    where
        T: Clone,
        F: Fn(&T) -> Vec<u32>,
    {
        let request = PageRequest::from_pairs(params);
        let size = self.page_size(request.page_size.as_deref());
        let len = items.len();

        let (start, end) = match request.cursor.as_deref() {
            None => (0, size.min(len)),
            Some(token) => {
                let cursor = Cursor::decode(listing, token)?;
                match cursor.direction {
                    Direction::After => {
                        let start = items.partition_point(|i| key(i) <= cursor.key);
                        (start, (start + size).min(len))
                    }
                    Direction::Before => {
                        let end = items.partition_point(|i| key(i) < cursor.key);
                        (end.saturating_sub(size), end)
                    }
                }
            }
        };

        let after = |index: usize| -> Result<Option<String>> {
            // Start of listing needs no cursor
            if index == 0 {
                return Ok(None);
            }
            Cursor {
                listing,
                key: key(&items[index - 1]),
                direction: Direction::After,
            }
            .encode()
            .map(Some)
        };

        let next = if end < len {
            Some(link(path, params, CURSOR_PARAM, after(end)?))
        } else {
            None
        };

        let previous = if start == 0 {
            None
        } else if start < len {
            let token = Cursor {
                listing,
                key: key(&items[start]),
                direction: Direction::Before,
            }
            .encode()?;
            Some(link(path, params, CURSOR_PARAM, Some(token)))
        } else {
            // Past the end: link to the last full page
            Some(link(
                path,
                params,
                CURSOR_PARAM,
                after(len.saturating_sub(size))?,
            ))
        };

        Ok(CursorPage {
            next,
            previous,
            results: items[start..end].to_vec(),
        })
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffsetPage<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Resolved page of an offset-paginated result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub size: usize,
    pub count: usize,
    pub range: Range<usize>,
}

impl PageWindow {
    pub fn has_next(&self) -> bool {
        self.range.end < self.count
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Wrap the fetched results with navigation links
    pub fn into_page<T>(
        self,
        results: Vec<T>,
        path: &str,
        params: &[(String, String)],
    ) -> OffsetPage<T> {
        let next = self
            .has_next()
            .then(|| link(path, params, PAGE_PARAM, Some((self.page + 1).to_string())));
        let previous = self.has_previous().then(|| {
            // Page 1 is the default and is left out of the link
            let target = (self.page > 2).then(|| (self.page - 1).to_string());
            link(path, params, PAGE_PARAM, target)
        });
        OffsetPage {
            count: self.count,
            next,
            previous,
            results,
        }
    }
}

/// Page-number paging for search results
#[derive(Debug, Clone, Copy)]
pub struct OffsetPager {
    default_size: usize,
    max_size: usize,
}

impl OffsetPager {
    pub fn new(default_size: usize, max_size: usize) -> Self {
        Self {
            default_size,
            max_size,
        }
    }

    /// Resolve the requested page against `count` results
    ///
    /// # Errors
    ///
    /// `NotFound("Invalid page.")` for a page that is not a positive
    /// number or lies beyond the last page. Page 1 always exists.
    pub fn window(&self, request: &PageRequest, count: usize) -> Result<PageWindow> {
        let size = clamp_page_size(
            request.page_size.as_deref(),
            self.default_size,
            self.max_size,
        );
        let page = match request.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some("last") => count.div_ceil(size).max(1),
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| FurqanError::NotFound("Invalid page.".to_string()))?,
        };

        let pages = count.div_ceil(size).max(1);
        if page > pages {
            return Err(FurqanError::NotFound("Invalid page.".to_string()));
        }

        let start = (page - 1) * size;
        Ok(PageWindow {
            page,
            size,
            count,
            range: start..(start + size).min(count),
        })
    }
}
