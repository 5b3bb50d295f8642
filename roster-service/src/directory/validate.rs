//! Raw query parameter validation
//!
//! Query values arrive as untrusted strings. Each one is trimmed and
//! HTML-escaped before it is matched, so a rejected value can be logged
//! verbatim without carrying markup into log viewers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{
    error::ListingError,
    query::{ListingQuery, SortField, DEFAULT_PAGE, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE},
};

static UNSIGNED_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("static pattern compiles"));

/// Listing parameters exactly as they appeared in the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct RawListingParams {
    /// Page number, starting at 1 (default 1)
    #[cfg_attr(feature = "openapi", param(example = "1"))]
    pub page: Option<String>,

    /// Records per page, 1 to 100 (default 10)
    #[cfg_attr(feature = "openapi", param(example = "10"))]
    pub size: Option<String>,

    /// Sort field: `name` or `id` (default: storage order)
    #[cfg_attr(feature = "openapi", param(example = "name"))]
    pub sort: Option<String>,
}

impl RawListingParams {
    /// Collect from decoded query pairs
    ///
    /// The first occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        Self {
            page: first("page"),
            size: first("size"),
            sort: first("sort"),
        }
    }

    /// Decode an `application/x-www-form-urlencoded` query string
    pub fn from_query_string(query: &str) -> Self {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self::from_pairs(&pairs)
    }

    /// Validate into a [`ListingQuery`]
    ///
    /// Parameters are checked in the order page, size, sort and the first
    /// failure is the only one reported.
    pub fn validate(&self) -> Result<ListingQuery, ListingError> {
        let page = match self.page.as_deref() {
            None => DEFAULT_PAGE,
            Some(raw) => parse_page(raw)?,
        };

        let size = match self.size.as_deref() {
            None => DEFAULT_SIZE,
            Some(raw) => parse_size(raw)?,
        };

        let sort = match self.sort.as_deref() {
            None => None,
            Some(raw) => Some(parse_sort(raw)?),
        };

        tracing::debug!(page, size, sort = ?sort, "Listing parameters validated");
        ListingQuery::new(page, size, sort)
    }
}

/// Trim, then escape the characters that matter in HTML contexts
pub fn sanitize(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            other => out.push(other),
        }
    }
    out
}

fn parse_unsigned(value: &str) -> Option<u32> {
    if !UNSIGNED_INTEGER.is_match(value) {
        return None;
    }
    // digits-only values too large for u32 are rejected like any other bad input
    value.parse::<u32>().ok()
}

fn parse_page(raw: &str) -> Result<u32, ListingError> {
    let value = sanitize(raw);
    match parse_unsigned(&value) {
        Some(page) if page >= DEFAULT_PAGE => Ok(page),
        _ => {
            tracing::warn!(page = %value, "Invalid page parameter rejected");
            Err(ListingError::InvalidPage)
        }
    }
}

fn parse_size(raw: &str) -> Result<u32, ListingError> {
    let value = sanitize(raw);
    match parse_unsigned(&value) {
        Some(size) if (MIN_SIZE..=MAX_SIZE).contains(&size) => Ok(size),
        _ => {
            tracing::warn!(size = %value, max_size = MAX_SIZE, "Invalid size parameter rejected");
            Err(ListingError::InvalidSize)
        }
    }
}

fn parse_sort(raw: &str) -> Result<SortField, ListingError> {
    let value = sanitize(raw);
    value.parse::<SortField>().map_err(|err| {
        tracing::warn!(sort = %value, valid_fields = "name, id", "Invalid sort field rejected");
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, size: Option<&str>, sort: Option<&str>) -> RawListingParams {
        RawListingParams {
            page: page.map(str::to_owned),
            size: size.map(str::to_owned),
            sort: sort.map(str::to_owned),
        }
    }

    #[test]
    fn test_defaults_when_absent() {
        let query = RawListingParams::default().validate().unwrap();
        assert_eq!(query.page(), 1);
        assert_eq!(query.size(), 10);
        assert_eq!(query.sort(), None);
    }

    #[test]
    fn test_accepts_valid_values() {
        let query = params(Some("2"), Some("25"), Some("id")).validate().unwrap();
        assert_eq!(query.page(), 2);
        assert_eq!(query.size(), 25);
        assert_eq!(query.sort(), Some(SortField::Id));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let query = params(Some(" 3 "), Some("\t5"), Some(" name "))
            .validate()
            .unwrap();
        assert_eq!(query.page(), 3);
        assert_eq!(query.size(), 5);
        assert_eq!(query.sort(), Some(SortField::Name));
    }

    #[test]
    fn test_rejects_bad_page() {
        for raw in ["0", "-1", "1.5", "abc", "", "+2", "1e3", "99999999999"] {
            assert_eq!(
                params(Some(raw), None, None).validate().unwrap_err(),
                ListingError::InvalidPage,
                "page {raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_bad_size() {
        for raw in ["0", "101", "-5", "ten", "", "10.0"] {
            assert_eq!(
                params(None, Some(raw), None).validate().unwrap_err(),
                ListingError::InvalidSize,
                "size {raw:?} should be rejected"
            );
        }
        assert!(params(None, Some("100"), None).validate().is_ok());
        assert!(params(None, Some("1"), None).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_sort() {
        for raw in ["invalid", "", "NAME", "Id", "name;drop", "<script>"] {
            assert_eq!(
                params(None, None, Some(raw)).validate().unwrap_err(),
                ListingError::InvalidSort,
                "sort {raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_first_failure_wins() {
        let err = params(Some("0"), Some("101"), Some("bogus"))
            .validate()
            .unwrap_err();
        assert_eq!(err, ListingError::InvalidPage);

        let err = params(Some("1"), Some("101"), Some("bogus"))
            .validate()
            .unwrap_err();
        assert_eq!(err, ListingError::InvalidSize);

        let err = params(Some("1"), Some("10"), Some("bogus"))
            .validate()
            .unwrap_err();
        assert_eq!(err, ListingError::InvalidSort);
    }

    #[test]
    fn test_from_pairs_keeps_first_occurrence() {
        let pairs = vec![
            ("sort".to_string(), "id".to_string()),
            ("page".to_string(), "2".to_string()),
            ("page".to_string(), "9".to_string()),
            ("filter".to_string(), "x".to_string()),
        ];
        let raw = RawListingParams::from_pairs(&pairs);
        assert_eq!(raw, params(Some("2"), None, Some("id")));
    }

    #[test]
    fn test_from_query_string_decodes() {
        let raw = RawListingParams::from_query_string("page=%202&sort=name&size=5&page=7");
        assert_eq!(raw, params(Some(" 2"), Some("5"), Some("name")));
        assert_eq!(RawListingParams::from_query_string(""), RawListingParams::default());
    }

    #[test]
    fn test_sanitize_escapes_markup() {
        assert_eq!(
            sanitize("  <a href='x'>&</a>  "),
            "&lt;a href=&#x27;x&#x27;&gt;&amp;&lt;&#x2F;a&gt;"
        );
        assert_eq!(sanitize("`\""), "&#96;&quot;");
        assert_eq!(sanitize("42"), "42");
    }
}
