//! Drives fetches for the interactive browser
//!
//! At most one fetch is in flight. Starting a new one aborts the previous
//! task, so a response for parameters the user has already moved away from
//! is never handed back.

use std::sync::Arc;

use roster_service::{directory::ListingError, handlers::ListResponse};
use tokio::task::JoinHandle;

use crate::api::{ApiError, ListingSource};
use crate::pager::{BrowseState, Transition};

/// A finished fetch and the state it was made for
#[derive(Debug)]
pub struct Fetched {
    pub state: BrowseState,
    pub result: Result<ListResponse, ApiError>,
}

pub struct Browser<S> {
    source: Arc<S>,
    state: BrowseState,
    in_flight: Option<(BrowseState, JoinHandle<Result<ListResponse, ApiError>>)>,
}

impl<S: ListingSource> Browser<S> {
    pub fn new(source: Arc<S>, state: BrowseState) -> Self {
        Self {
            source,
            state,
            in_flight: None,
        }
    }

    pub fn state(&self) -> BrowseState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Apply `transition` and start fetching the new page
    ///
    /// A rejected transition leaves the state and any in-flight fetch alone.
    pub fn dispatch(&mut self, transition: Transition) -> Result<(), ListingError> {
        self.state = self.state.apply(transition)?;
        self.refresh();
        Ok(())
    }

    /// Refetch the current state, superseding whatever is in flight
    pub fn refresh(&mut self) {
        if let Some((_, handle)) = self.in_flight.take() {
            handle.abort();
        }

        let source = Arc::clone(&self.source);
        let state = self.state;
        let handle = tokio::spawn(async move { source.fetch(&state).await });
        self.in_flight = Some((state, handle));
    }

    /// Wait for the in-flight fetch, if any
    pub async fn settle(&mut self) -> Option<Fetched> {
        let (state, handle) = self.in_flight.take()?;
        let result = match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => return None,
            Err(e) => Err(ApiError::Task(e.to_string())),
        };
        Some(Fetched { state, result })
    }
}

impl<S> Drop for Browser<S> {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.in_flight.take() {
            handle.abort();
        }
    }
}
