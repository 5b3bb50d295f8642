//! Which page numbers to offer as direct jumps

/// Page buttons shown at once
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// Number of pages needed for `total_results` at `page_size` per page
pub fn total_pages(total_results: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_results.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page numbers to show around `current_page`
///
/// Shows every page when they all fit. Otherwise the window is pinned to the
/// start for the first three pages, pinned to the end for the last three, and
/// starts two pages before `current_page` in between.
pub fn window(current_page: u32, total_results: u64, page_size: u32, max_visible: u32) -> Vec<u32> {
    let total = total_pages(total_results, page_size);

    if total <= max_visible {
        return (1..=total).collect();
    }
    if max_visible == 0 {
        return Vec::new();
    }

    let first = if current_page <= 3 {
        1
    } else if current_page >= total - 2 {
        total - max_visible + 1
    } else {
        current_page - 2
    };
    // wide windows would otherwise run past the last page
    let first = first.min(total - max_visible + 1);

    (first..first + max_visible).collect()
}
