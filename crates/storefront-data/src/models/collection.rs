use serde::{Deserialize, Serialize};

/// A named product group on the merchandise platform.
///
/// Collections exist only to discover which product groups to fetch
/// during one aggregation pass; they are never persisted past it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    /// Upstream collection identifier
    pub id: String,

    /// URL slug used to fetch the collection's products
    pub slug: String,

    /// Display name
    pub name: String,
}
