//! Offset pagination primitives for list endpoints.
//!
//! Clients page through collections with a `from` element offset and a page
//! `size`. The offset is rounded down to the start of the page that contains
//! it, so `from=15,size=10` reads the second page (elements 10..20). Stores
//! use [`PageRequest::offset`] and [`PageRequest::limit`] to build queries;
//! in-memory collections can use [`PageRequest::slice`].

use serde::{Deserialize, Serialize};

/// Default page offset used when a client omits `from`.
pub const DEFAULT_FROM: i64 = 0;
/// Default page size used when a client omits `size`.
pub const DEFAULT_SIZE: i64 = 10;

/// Errors raised while validating pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The `from` offset was negative.
    #[error("from must not be negative, got {from}")]
    NegativeFrom {
        /// Rejected offset.
        from: i64,
    },
    /// The page `size` was zero or negative.
    #[error("size must be positive, got {size}")]
    NonPositiveSize {
        /// Rejected page size.
        size: i64,
    },
}

/// Validated offset pagination request.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let page = PageRequest::new(15, 10)?;
/// assert_eq!(page.page_index(), 1);
/// assert_eq!(page.offset(), 10);
/// assert_eq!(page.limit(), 10);
/// # Ok::<(), pagination::PageRequestError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest", into = "RawPageRequest")]
pub struct PageRequest {
    from: u64,
    size: u64,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `from` is negative or `size` is not
    /// positive.
    pub fn new(from: i64, size: i64) -> Result<Self, PageRequestError> {
        let from = u64::try_from(from).map_err(|_| PageRequestError::NegativeFrom { from })?;
        let size = u64::try_from(size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or(PageRequestError::NonPositiveSize { size })?;
        Ok(Self { from, size })
    }

    /// Request the first page with the given size.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::NonPositiveSize`] for a non-positive size.
    pub fn first(size: i64) -> Result<Self, PageRequestError> {
        Self::new(0, size)
    }

    /// Raw element offset supplied by the client.
    #[must_use]
    pub const fn from(&self) -> u64 {
        self.from
    }

    /// Number of elements per page.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Zero-based index of the page containing `from`.
    #[must_use]
    pub fn page_index(&self) -> u64 {
        self.from.checked_div(self.size).unwrap_or(0)
    }

    /// Offset of the first element on the selected page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page_index().saturating_mul(self.size)
    }

    /// Maximum number of elements on the page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size
    }

    /// Select the page from an already ordered slice.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let items = [1, 2, 3, 4, 5];
    /// let page = PageRequest::new(2, 2)?;
    /// assert_eq!(page.slice(&items), &[3, 4]);
    /// # Ok::<(), pagination::PageRequestError>(())
    /// ```
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let len = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        let end = start.saturating_add(len).min(items.len());
        items.get(start..end).unwrap_or_default()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            from: DEFAULT_FROM.unsigned_abs(),
            size: DEFAULT_SIZE.unsigned_abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawPageRequest {
    #[serde(default = "default_from")]
    from: i64,
    #[serde(default = "default_size")]
    size: i64,
}

const fn default_from() -> i64 {
    DEFAULT_FROM
}

const fn default_size() -> i64 {
    DEFAULT_SIZE
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(value.from, value.size)
    }
}

impl From<PageRequest> for RawPageRequest {
    fn from(value: PageRequest) -> Self {
        Self {
            from: i64::try_from(value.from).unwrap_or(i64::MAX),
            size: i64::try_from(value.size).unwrap_or(i64::MAX),
        }
    }
}
