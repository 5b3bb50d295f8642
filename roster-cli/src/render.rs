//! Terminal rendering of a listing page

use colored::Colorize;
use roster_service::{
    directory::{PagingLinks, Record},
    handlers::ListResponse,
};

use crate::pager::{window, BrowseState, MAX_VISIBLE_PAGES};

const ID_WIDTH: usize = 6;

/// Records as an `ID | Name` table
pub fn table(records: &[Record]) -> String {
    let rule = "─".repeat(40);
    let mut out = String::new();

    out.push_str(&format!(
        "{:<width$}  {}\n",
        "ID".bold(),
        "Name".bold(),
        width = ID_WIDTH
    ));
    out.push_str(&format!("{}\n", rule.dimmed()));

    if records.is_empty() {
        out.push_str(&format!("{}\n", "No users found".dimmed()));
        return out;
    }

    for record in records {
        out.push_str(&format!(
            "{:<width$}  {}\n",
            record.id,
            record.name,
            width = ID_WIDTH
        ));
    }
    out
}

/// "Showing X to Y of Z users", or nothing when the page is empty
pub fn summary(state: &BrowseState, total_results: u64) -> Option<String> {
    let (start, end) = state.showing_range(total_results)?;
    Some(format!(
        "Showing {} to {} of {} users",
        start.to_string().bold(),
        end.to_string().bold(),
        total_results.to_string().bold()
    ))
}

/// Previous/next availability around the page window, current page highlighted
pub fn page_bar(state: &BrowseState, paging: &PagingLinks) -> String {
    let pages = window(
        state.page(),
        paging.total_results as u64,
        state.size(),
        MAX_VISIBLE_PAGES,
    );

    let previous = if paging.previous.is_some() {
        "‹ Prev".normal()
    } else {
        "‹ Prev".dimmed()
    };
    let next = if paging.next.is_some() {
        "Next ›".normal()
    } else {
        "Next ›".dimmed()
    };

    let numbers: Vec<String> = pages
        .into_iter()
        .map(|n| {
            if n == state.page() {
                format!("[{n}]").cyan().bold().to_string()
            } else {
                format!(" {n} ")
            }
        })
        .collect();

    format!("{previous}  {}  {next}", numbers.join(""))
}

/// Table, summary and page bar for one fetched page
pub fn page(state: &BrowseState, response: &ListResponse) -> String {
    let mut out = table(&response.data);
    let total = response.paging.total_results as u64;

    if let Some(summary) = summary(state, total) {
        out.push('\n');
        out.push_str(&summary);
        out.push('\n');
    }
    if total > 0 {
        out.push_str(&page_bar(state, &response.paging));
        out.push('\n');
    }
    out
}
