//! Page arithmetic over a filtered order list
//!
//! Pages are 1-based. Out-of-range requests produce an empty slice, never an
//! error.

/// Number of pages needed for `len` items, never less than one
///
/// An empty list still has one (empty) page, so "page 1 of 1" is always a
/// valid position. A page size of zero is treated as a single page.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Items `[(n-1)*p, n*p)` clamped to the slice bounds
///
/// Page 0, page size 0 and pages past the end all yield an empty slice.
pub fn page<T>(items: &[T], page_size: usize, page_number: usize) -> &[T] {
    if page_size == 0 || page_number == 0 {
        return &[];
    }
    let start = match (page_number - 1).checked_mul(page_size) {
        Some(start) if start < items.len() => start,
        _ => return &[],
    };
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Current position within a paginated list
///
/// Keeps `1 <= current <= total_pages` for whatever length it was last
/// given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    current: usize,
    page_size: usize,
    len: usize,
}

impl PageWindow {
    /// Page 1 of a list of `len` items
    pub fn new(page_size: usize, len: usize) -> Self {
        Self {
            current: 1,
            page_size,
            len,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.len, self.page_size)
    }

    /// Move to `page_number`; ignored when outside `[1, total_pages]`
    ///
    /// Returns whether the position changed.
    pub fn go_to(&mut self, page_number: usize) -> bool {
        if page_number < 1 || page_number > self.total_pages() || page_number == self.current {
            return false;
        }
        self.current = page_number;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    pub fn previous(&mut self) -> bool {
        self.current > 1 && self.go_to(self.current - 1)
    }

    /// Change the page size and return to page 1
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.current = 1;
    }

    /// The underlying list changed; return to page 1
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.current = 1;
    }

    /// Visible slice of `items` for the current position
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        page(items, self.page_size, self.current)
    }
}
