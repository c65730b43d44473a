//! Storefront Data Crate
//!
//! This crate aggregates product and tier listings from the commerce
//! and membership platforms behind the artist storefront into one
//! unified collection for display.
//!
//! # Overview
//!
//! The storefront data crate supports:
//! - Four upstream sources: Fourthwall (merchandise), Gumroad,
//!   Lemon Squeezy (digital goods), Patreon (membership tiers)
//! - Per-source schema validation of upstream payloads
//! - Partial-failure tolerant aggregation with a TTL cache
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Upstream JSON   | --> | Schema validation|  (per-source raw structs)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  ProductRecord   |  (validated, per source)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   Aggregator     |  (fan-out, dedup, TTL cache)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  UnifiedProduct  |  (cross-source display shape)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`ProductRecord`] - Validated per-source product record
//! - [`UnifiedProduct`] - Cross-source normalized product
//! - [`SourceKind`] - Closed tag naming the originating adapter
//! - [`ProductSource`] - Trait implemented by each source adapter
//! - [`Aggregator`] - Concurrent fan-out across all configured sources

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod models;
pub mod source;
pub mod util;

// Re-export all public types from models
pub use models::{
    Collection, ProductImage, ProductRecord, ProductVariant, SourceKind, UnifiedProduct,
};

// Re-export source types
pub use source::fourthwall::FourthwallSource;
pub use source::gumroad::GumroadSource;
pub use source::lemon_squeezy::LemonSqueezySource;
pub use source::patreon::PatreonSource;
pub use source::ProductSource;

// Re-export aggregator types
pub use aggregator::Aggregator;

// Re-export config types
pub use config::{FourthwallConfig, GumroadConfig, LemonSqueezyConfig, PatreonConfig};
