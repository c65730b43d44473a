//! Small shared helpers: slug derivation and price formatting.

pub mod money;
pub mod slug;
