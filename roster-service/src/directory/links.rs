//! Previous/next link derivation

use serde::{Deserialize, Serialize};
use url::Url;

use super::{error::ListingError, query::ListingQuery};

/// Paging metadata returned next to a page of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PagingLinks {
    /// Number of records across all pages
    #[cfg_attr(feature = "openapi", schema(example = 50))]
    pub total_results: usize,

    /// Link to the previous page; absent on page 1
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(
        feature = "openapi",
        schema(example = "http://localhost:3001/api/users?page=1&size=10")
    )]
    pub previous: Option<String>,

    /// Link to the next page; absent on the last page
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(
        feature = "openapi",
        schema(example = "http://localhost:3001/api/users?page=3&size=10")
    )]
    pub next: Option<String>,
}

/// Derive paging links for `query` over `total_results` records
///
/// `base_url` must be absolute (scheme, host and path). Any query string it
/// carries is replaced.
pub fn build(
    query: &ListingQuery,
    total_results: usize,
    base_url: &str,
) -> Result<PagingLinks, ListingError> {
    let base = Url::parse(base_url).map_err(|err| {
        ListingError::Internal(format!("base url {base_url:?} is not absolute: {err}"))
    })?;
    if base.cannot_be_a_base() {
        return Err(ListingError::Internal(format!(
            "base url {base_url:?} cannot carry a path"
        )));
    }

    let size = query.size() as usize;
    let total_pages = total_results.div_ceil(size);
    let page = query.page() as usize;

    tracing::debug!(
        page,
        size,
        total_pages,
        total_results,
        "Building paging URLs"
    );

    let previous = (page > 1).then(|| link_to(&base, query.page() - 1, query));
    let next = (page < total_pages).then(|| link_to(&base, query.page() + 1, query));

    Ok(PagingLinks {
        total_results,
        previous,
        next,
    })
}

fn link_to(base: &Url, page: u32, query: &ListingQuery) -> String {
    let mut url = base.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("page", &page.to_string());
        pairs.append_pair("size", &query.size().to_string());
        if let Some(sort) = query.sort() {
            pairs.append_pair("sort", sort.as_str());
        }
    }
    url.into()
}
