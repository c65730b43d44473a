//! Source adapter trait definition.

use async_trait::async_trait;

use crate::errors::SourceError;
use crate::models::{ProductRecord, SourceKind};
use crate::util::slug::slugify;

/// Trait for upstream product sources.
///
/// Implement this trait to add support for a new commerce platform.
/// The aggregator stores adapters as `Arc<dyn ProductSource>` and
/// invokes them concurrently; implementations must not share mutable
/// state across calls.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Unique identifier for this source.
    ///
    /// A constant string like "FOURTHWALL" or "GUMROAD", used for
    /// logging and diagnostics.
    fn id(&self) -> &'static str;

    /// Which unified source tag this adapter's products carry.
    fn kind(&self) -> SourceKind;

    /// Fetch every available item from this source.
    ///
    /// Individual malformed items are skipped and logged; a malformed
    /// envelope or transport failure fails the whole call. The
    /// aggregator converts a failed call into zero items for this
    /// source, so an error here never blocks sibling sources.
    async fn list_all(&self) -> Result<Vec<ProductRecord>, SourceError>;

    /// Direct lookup by slug or id.
    ///
    /// The default implementation scans `list_all()`, matching the key
    /// against the id, then the explicit slug, then a slug derived
    /// from the name, in that priority order, returning the first
    /// match. Sources with a native lookup endpoint override this.
    async fn get_by_slug_or_id(
        &self,
        key: &str,
    ) -> Result<Option<ProductRecord>, SourceError> {
        let records = self.list_all().await?;
        Ok(find_by_key(records, key))
    }
}

/// Scan fallback shared by sources without a native lookup endpoint.
///
/// Match priority: id, then explicit slug, then name-derived slug.
pub(crate) fn find_by_key(records: Vec<ProductRecord>, key: &str) -> Option<ProductRecord> {
    if let Some(idx) = records.iter().position(|r| r.id == key) {
        return records.into_iter().nth(idx);
    }
    if let Some(idx) = records.iter().position(|r| r.slug.as_deref() == Some(key)) {
        return records.into_iter().nth(idx);
    }
    let idx = records.iter().position(|r| slugify(&r.name) == key)?;
    records.into_iter().nth(idx)
}
