//! Paged reads over the catalog.
//!
//! The page token is the ID of the first item on the page. Since the
//! catalog never changes after construction, the same (size, token) pair
//! always returns the same page, and following tokens until one comes back
//! empty visits every item once, in sorted order.

use super::rule::HasId;
use crate::error::RequestError;
use std::collections::HashMap;

/// Page size used when the caller asks for zero or fewer items.
pub const DEFAULT_PAGE_SIZE: usize = 250;

/// One page of catalog items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// ID of the next item, empty at the end of the catalog
    pub next_page_token: String,
}

pub(crate) fn paginate<'a, T: HasId>(
    items: &'a [T],
    index: &HashMap<String, usize>,
    page_size: i32,
    page_token: &str,
) -> Result<Page<'a, T>, RequestError> {
    let start = if page_token.is_empty() {
        0
    } else {
        *index
            .get(page_token)
            .ok_or_else(|| RequestError::UnknownPageToken(page_token.to_string()))?
    };
    let page_size = usize::try_from(page_size)
        .ok()
        .filter(|&size| size > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let end = start.saturating_add(page_size).min(items.len());
    let next_page_token = items
        .get(end)
        .map(|item| item.id().to_string())
        .unwrap_or_default();
    Ok(Page {
        items: &items[start..end],
        next_page_token,
    })
}
