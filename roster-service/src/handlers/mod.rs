//! HTTP handlers

pub mod index;
pub mod users;

pub use index::{index, not_found, IndexResponse};
pub use users::{list_users, ListResponse};
