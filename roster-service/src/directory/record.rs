//! Directory record

use serde::{Deserialize, Serialize};

/// One entry in the directory
///
/// Identity is `id`. Ids are not required to be contiguous or to follow
/// storage order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Record {
    /// Record identifier
    #[cfg_attr(feature = "openapi", schema(example = 0))]
    pub id: u64,

    /// Display name
    #[cfg_attr(feature = "openapi", schema(example = "Jorn"))]
    pub name: String,
}

impl Record {
    /// Create a record
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
