use serde::{Deserialize, Serialize};

use super::order::OrderSpec;

/// Paging and ordering request
///
/// Offset and limit are applied after ordering. `limit: None` means
/// unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pageable {
    pub offset: u64,
    pub limit: Option<u64>,
    pub order: Vec<OrderSpec>,
}

impl Pageable {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit: Some(limit),
            order: Vec::new(),
        }
    }

    /// Page number starting at 0
    ///
    /// The offset saturates at `u64::MAX`; such a page is simply empty.
    pub fn page(page: u64, size: u64) -> Self {
        Self::new(page.saturating_mul(size), size)
    }

    /// No offset, no limit, no ordering
    pub fn unpaged() -> Self {
        Self::default()
    }

    pub fn order_by(mut self, spec: OrderSpec) -> Self {
        self.order.push(spec);
        self
    }

    /// Total row count derivable from the fetched page alone
    ///
    /// Returns `None` when a separate count query is required. A page that
    /// came back shorter than its limit is the last page, so the total is
    /// `offset + fetched`, unless it is empty past the first page (the
    /// offset may overshoot the data).
    pub fn total_from_page(&self, fetched: usize) -> Option<u64> {
        let fetched = fetched as u64;
        let short_page = self.limit.map_or(true, |limit| fetched < limit);

        if short_page && (self.offset == 0 || fetched > 0) {
            Some(self.offset.saturating_add(fetched))
        } else {
            None
        }
    }
}

/// One page of results plus the total number of matching rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total: u64, pageable: &Pageable) -> Self {
        Self {
            content,
            total,
            offset: pageable.offset,
            limit: pageable.limit,
        }
    }

    /// True when rows exist beyond this page
    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(self.content.len() as u64) < self.total
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total: self.total,
            offset: self.offset,
            limit: self.limit,
        }
    }
}
