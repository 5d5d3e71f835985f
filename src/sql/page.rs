//! Page-number pagination.

use std::num::NonZeroU32;

/// Default page number when none is requested.
pub const DEFAULT_PAGE: NonZeroU32 = NonZeroU32::MIN;

/// Default page size when none is requested.
pub const DEFAULT_LIMIT: NonZeroU32 = match NonZeroU32::new(10) {
    Some(limit) => limit,
    None => NonZeroU32::MIN,
};

/// A one-based page number and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: NonZeroU32,
    limit: NonZeroU32,
}

impl PageRequest {
    /// Creates a page request. Both values are at least one by construction.
    #[must_use]
    pub const fn new(page: NonZeroU32, limit: NonZeroU32) -> Self {
        Self { page, limit }
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page.get()
    }

    /// Returns the maximum number of rows on the page.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit.get()
    }

    /// Returns the number of rows skipped before this page.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page.get() as u64 - 1) * self.limit.get() as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}
