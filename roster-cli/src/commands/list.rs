//! `roster list`: print a single page

use anyhow::{Context, Result};
use roster_service::directory::SortField;

use super::{spinner, ClientOptions};
use crate::api::ListingSource;
use crate::pager::BrowseState;
use crate::render;

/// Fetch one page and print it
pub async fn execute(
    options: &ClientOptions,
    page: u32,
    size: u32,
    sort: Option<SortField>,
) -> Result<()> {
    let state = BrowseState::new(page, size, sort)?;
    let source = options.source()?;

    let pb = spinner("Fetching users...");
    let response = source.fetch(&state).await;
    pb.finish_and_clear();

    let response = response.context("Failed to fetch users")?;

    print!("{}", render::page(&state, &response));
    Ok(())
}
