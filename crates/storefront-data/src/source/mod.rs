//! Source adapters for the upstream commerce and membership platforms.
//!
//! Each submodule isolates all knowledge of one upstream API:
//! authentication, endpoint shapes and pagination, and the schema
//! validation of its payloads. Adapters expose a uniform contract via
//! the [`ProductSource`] trait and never leak raw upstream records.

pub mod fourthwall;
pub mod gumroad;
pub mod lemon_squeezy;
pub mod patreon;
mod traits;

pub use traits::ProductSource;

pub(crate) use traits::find_by_key;
