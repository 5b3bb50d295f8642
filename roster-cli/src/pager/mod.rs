//! Client-side paging: the browse state machine and the page window

mod state;
mod window;

pub use state::{BrowseState, Transition};
pub use window::{window, MAX_VISIBLE_PAGES};
