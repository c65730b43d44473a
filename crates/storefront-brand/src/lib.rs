//! Brand asset lookup for the storefront's partner and platform links.
//!
//! Wraps the Brandfetch brand API: given a domain, fetch the brand's
//! display name, primary colors, and a preferred logo asset. Results
//! are meant to be fetched at build time and written to a static JSON
//! cache file checked into the site, so the client is used from a
//! one-shot tool rather than the serving path.

pub mod cache;
pub mod client;
pub mod errors;
pub mod models;

pub use cache::{read_cache_file, write_cache_file};
pub use client::BrandClient;
pub use errors::BrandError;
pub use models::{BrandAsset, BrandColor, BrandProfile};
