//! Browse state and the transitions that move it

use roster_service::directory::{ListingError, ListingQuery, SortField};

/// A user action that changes what the browser should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Clicking the active sort clears it, any other field becomes the sort
    SortClicked(SortField),
    /// Back to storage order
    SortReset,
    /// New page size; back to page 1
    PageSizeChanged(u32),
    /// Jump to a page, keeping size and sort
    PageChanged(u32),
}

/// The only mutable state the client keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BrowseState {
    query: ListingQuery,
}

impl BrowseState {
    /// Start from explicit values, rejecting the same inputs the server would
    pub fn new(page: u32, size: u32, sort: Option<SortField>) -> Result<Self, ListingError> {
        Ok(Self {
            query: ListingQuery::new(page, size, sort)?,
        })
    }

    pub fn page(&self) -> u32 {
        self.query.page()
    }

    pub fn size(&self) -> u32 {
        self.query.size()
    }

    pub fn sort(&self) -> Option<SortField> {
        self.query.sort()
    }

    /// Next state after `transition`
    ///
    /// An invalid page or size is rejected and `self` is left as it was.
    pub fn apply(&self, transition: Transition) -> Result<Self, ListingError> {
        match transition {
            Transition::SortClicked(field) => {
                let sort = if self.sort() == Some(field) {
                    None
                } else {
                    Some(field)
                };
                Self::new(1, self.size(), sort)
            }
            Transition::SortReset => Self::new(1, self.size(), None),
            Transition::PageSizeChanged(size) => Self::new(1, size, self.sort()),
            Transition::PageChanged(page) => Self::new(page, self.size(), self.sort()),
        }
    }

    /// 1-based position of the first and last record on this page
    ///
    /// `None` when the page holds nothing.
    pub fn showing_range(&self, total_results: u64) -> Option<(u64, u64)> {
        let size = u64::from(self.size());
        let start = u64::from(self.page() - 1) * size + 1;
        let end = (u64::from(self.page()) * size).min(total_results);
        (start <= end).then_some((start, end))
    }
}
