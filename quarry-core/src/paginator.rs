//! Fixed-size pages over a result slice.

use quarry_types::SearchError;

use std::slice::Chunks;

/// Borrowed view splitting a slice into pages of `page_size` items; the last
/// page may be shorter.
#[derive(Debug, Clone, Copy)]
pub struct Paginator<'a, T> {
    items: &'a [T],
    page_size: usize,
}

/// Splits `items` into pages of `page_size`.
///
/// # Errors
///
/// Returns `SearchError::ZeroPageSize` if `page_size` is zero.
pub fn paginate<T>(items: &[T], page_size: usize) -> Result<Paginator<'_, T>, SearchError> {
    if page_size == 0 {
        return Err(SearchError::ZeroPageSize);
    }
    Ok(Paginator { items, page_size })
}

impl<'a, T> Paginator<'a, T> {
    /// Number of pages; zero for an empty slice.
    #[inline]
    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    /// Items per page.
    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns page `index`, or `None` past the last page.
    pub fn page(&self, index: usize) -> Option<&'a [T]> {
        let start = index.checked_mul(self.page_size)?;
        if start >= self.items.len() {
            return None;
        }
        let end = start.saturating_add(self.page_size).min(self.items.len());
        self.items.get(start..end)
    }

    /// Iterates pages in order.
    #[inline]
    pub fn iter(&self) -> Chunks<'a, T> {
        self.items.chunks(self.page_size)
    }
}

impl<'a, T> IntoIterator for Paginator<'a, T> {
    type Item = &'a [T];
    type IntoIter = Chunks<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &Paginator<'a, T> {
    type Item = &'a [T];
    type IntoIter = Chunks<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
