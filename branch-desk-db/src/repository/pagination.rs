use serde::{Deserialize, Serialize};

/// Offset window over an ordered result set.
///
/// # Example
/// ```
/// use branch_desk_db::repository::pagination::PageRequest;
///
/// let first = PageRequest::default(); // ten items from the start
/// let third = PageRequest::new(10, 20);
/// assert_eq!(first.offset, 0);
/// assert_eq!(third.limit, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Cuts this page out of an already ordered, unpaginated result set
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let page_items = items.into_iter().skip(self.offset).take(self.limit).collect();
        Page::new(page_items, total, self.limit, self.offset)
    }
}

/// First ten items; no upper bound is enforced on `limit`
impl Default for PageRequest {
    fn default() -> Self {
        Self { limit: 10, offset: 0 }
    }
}

/// One window of results plus the size of the whole matching set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matching items before pagination
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    /// Converts the items, keeping the window
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }

    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total
    }

    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            self.total.div_ceil(self.limit)
        }
    }
}
