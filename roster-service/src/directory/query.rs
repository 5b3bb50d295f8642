//! Typed listing parameters

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::{error::ListingError, record::Record};

/// Page used when the caller does not ask for one
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller does not ask for one
pub const DEFAULT_SIZE: u32 = 10;

/// Smallest accepted page size
pub const MIN_SIZE: u32 = 1;

/// Largest accepted page size
pub const MAX_SIZE: u32 = 100;

/// Field a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Codepoint order of `name`
    Name,
    /// Numeric order of `id`
    Id,
}

impl SortField {
    /// Every sortable field, in the order they are advertised
    pub const ALL: [SortField; 2] = [SortField::Name, SortField::Id];

    /// Query-string spelling
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Id => "id",
        }
    }

    /// Compare two records on this field
    pub fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortField::Name => a.name.as_str().cmp(b.name.as_str()),
            SortField::Id => a.id.cmp(&b.id),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ListingError;

    // Case-sensitive: "Name" is not a field
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "id" => Ok(SortField::Id),
            _ => Err(ListingError::InvalidSort),
        }
    }
}

/// A validated listing request
///
/// Only [`validate`](super::validate) and [`ListingQuery::new`] produce one, so
/// `page >= 1` and `size` within `[MIN_SIZE, MAX_SIZE]` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListingQuery {
    page: u32,
    size: u32,
    sort: Option<SortField>,
}

impl ListingQuery {
    /// Build a query, rejecting out-of-range values
    pub fn new(page: u32, size: u32, sort: Option<SortField>) -> Result<Self, ListingError> {
        if page < DEFAULT_PAGE {
            return Err(ListingError::InvalidPage);
        }
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(ListingError::InvalidSize);
        }
        Ok(Self { page, size, sort })
    }

    /// One-based page number
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Records per page
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Requested ordering, if any
    pub fn sort(&self) -> Option<SortField> {
        self.sort
    }

    /// Index of the first record on this page
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.size as usize)
    }
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
            sort: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_parse_is_case_sensitive() {
        assert_eq!("name".parse::<SortField>().unwrap(), SortField::Name);
        assert_eq!("id".parse::<SortField>().unwrap(), SortField::Id);
        assert_eq!(
            "Name".parse::<SortField>().unwrap_err(),
            ListingError::InvalidSort
        );
        assert!("".parse::<SortField>().is_err());
    }

    #[test]
    fn test_sort_field_serde_matches_query_spelling() {
        for field in SortField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field));
        }
    }

    #[test]
    fn test_name_order_is_codepoint_order() {
        let upper = Record::new(1, "Zed");
        let lower = Record::new(2, "adam");
        assert_eq!(SortField::Name.compare(&upper, &lower), Ordering::Less);
    }

    #[test]
    fn test_query_bounds() {
        assert!(ListingQuery::new(1, 1, None).is_ok());
        assert!(ListingQuery::new(1, 100, Some(SortField::Id)).is_ok());
        assert_eq!(
            ListingQuery::new(0, 10, None).unwrap_err(),
            ListingError::InvalidPage
        );
        assert_eq!(
            ListingQuery::new(1, 0, None).unwrap_err(),
            ListingError::InvalidSize
        );
        assert_eq!(
            ListingQuery::new(1, 101, None).unwrap_err(),
            ListingError::InvalidSize
        );
    }

    #[test]
    fn test_offset() {
        assert_eq!(ListingQuery::default().offset(), 0);
        assert_eq!(ListingQuery::new(3, 25, None).unwrap().offset(), 50);
        // no overflow at the extreme
        let last = ListingQuery::new(u32::MAX, MAX_SIZE, None).unwrap();
        assert_eq!(last.offset(), (u32::MAX as usize - 1) * 100);
    }
}
