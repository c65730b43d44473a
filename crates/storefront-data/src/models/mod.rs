//! Storefront data models
//!
//! This module contains the core data types for aggregation:
//! - `product` - Validated per-source records (ProductRecord, ProductImage, ProductVariant)
//! - `collection` - Merchandise product groups (Collection)
//! - `unified` - Cross-source display shape (UnifiedProduct, SourceKind)

mod collection;
mod product;
mod unified;

pub use collection::Collection;
pub use product::{ProductImage, ProductRecord, ProductVariant};
pub use unified::{SourceKind, UnifiedProduct};
