//! The record directory and its listing engine
//!
//! Raw query values flow through this module in one direction:
//!
//! ```text
//! RawListingParams --validate--> ListingQuery --list--> ListingResult
//!                                     |                      |
//!                                     +------ links::build --+--> PagingLinks
//! ```
//!
//! Nothing here touches HTTP; handlers own the transport.

pub mod error;
pub mod links;
pub mod paginator;
pub mod query;
pub mod record;
pub mod store;
pub mod validate;

pub use error::ListingError;
pub use links::PagingLinks;
pub use paginator::{list, ListingResult};
pub use query::{ListingQuery, SortField, DEFAULT_PAGE, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE};
pub use record::Record;
pub use store::Directory;
pub use validate::RawListingParams;
