//! Ordering and slicing

use serde::Serialize;

use super::{query::ListingQuery, record::Record};

/// One page of records plus the size of the whole collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResult {
    /// Records on the requested page, in listing order
    pub items: Vec<Record>,

    /// Number of records across all pages
    pub total_results: usize,
}

/// Order `records` per the query and cut out the requested page
///
/// The input slice is never reordered; sorting works on a copy with a stable
/// comparison so ties keep their storage order. A page that starts past the
/// end yields no items.
pub fn list(records: &[Record], query: &ListingQuery) -> ListingResult {
    let total_results = records.len();
    let start = query.offset().min(total_results);
    let end = query
        .offset()
        .saturating_add(query.size() as usize)
        .min(total_results);

    let items = match query.sort() {
        Some(field) => {
            tracing::debug!(field = %field, total = total_results, "Sorting records");
            let mut sorted = records.to_vec();
            sorted.sort_by(|a, b| field.compare(a, b));
            sorted.drain(start..end).collect()
        }
        None => records[start..end].to_vec(),
    };

    tracing::debug!(
        start_index = query.offset(),
        end_index = query.offset().saturating_add(query.size() as usize),
        returned = items.len(),
        total = total_results,
        "Pagination applied"
    );

    if query.offset() >= total_results && total_results > 0 {
        tracing::warn!(
            page = query.page(),
            size = query.size(),
            total = total_results,
            "Requested page beyond available data"
        );
    }

    ListingResult {
        items,
        total_results,
    }
}
