//! Cross-source product aggregation.
//!
//! The aggregator fans out one `list_all()` per configured source,
//! concurrently and independently, then maps every validated record
//! into the unified display shape. A failed source contributes zero
//! items and is logged; an aggregation pass itself cannot fail.
//!
//! Passes are cached in a read-through TTL cache; within the
//! revalidation window repeated calls return the previous pass
//! unchanged, byte for byte.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use moka::future::Cache;

use crate::config::{FourthwallConfig, GumroadConfig, LemonSqueezyConfig, PatreonConfig};
use crate::models::{SourceKind, UnifiedProduct};
use crate::source::fourthwall::FourthwallSource;
use crate::source::gumroad::GumroadSource;
use crate::source::lemon_squeezy::LemonSqueezySource;
use crate::source::patreon::PatreonSource;
use crate::source::ProductSource;

/// Cache key for the single storefront-wide aggregation pass
const CACHE_KEY: &str = "storefront";

/// Default revalidation window
const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Aggregates all configured sources into one unified collection.
pub struct Aggregator {
    sources: Vec<Arc<dyn ProductSource>>,
    cache: Cache<&'static str, Arc<Vec<UnifiedProduct>>>,
}

impl Aggregator {
    /// Create an aggregator over the given sources with the default
    /// revalidation window.
    ///
    /// Output ordering follows the order of `sources`; pass them in
    /// the fixed storefront order.
    pub fn new(sources: Vec<Arc<dyn ProductSource>>) -> Self {
        Self::with_ttl(sources, DEFAULT_TTL)
    }

    /// Create an aggregator with an explicit revalidation window.
    pub fn with_ttl(sources: Vec<Arc<dyn ProductSource>>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(4)
            .build();

        Self { sources, cache }
    }

    /// Build an aggregator from environment configuration.
    ///
    /// Sources whose required credentials are absent are skipped with
    /// a one-time diagnostic and contribute zero items for the process
    /// lifetime. The fixed source order (fourthwall, gumroad,
    /// lemonsqueezy, patreon) is established here.
    pub fn from_env() -> Self {
        let mut sources: Vec<Arc<dyn ProductSource>> = Vec::new();

        match FourthwallConfig::from_env() {
            Some(config) => sources.push(Arc::new(FourthwallSource::new(config))),
            None => warn!("Fourthwall credentials missing; source disabled"),
        }
        match GumroadConfig::from_env() {
            Some(config) => sources.push(Arc::new(GumroadSource::new(config))),
            None => warn!("Gumroad credentials missing; source disabled"),
        }
        match LemonSqueezyConfig::from_env() {
            Some(config) => sources.push(Arc::new(LemonSqueezySource::new(config))),
            None => warn!("Lemon Squeezy credentials missing; source disabled"),
        }
        match PatreonConfig::from_env() {
            Some(config) => sources.push(Arc::new(PatreonSource::new(config))),
            None => warn!("Patreon credentials missing; source disabled"),
        }

        Self::new(sources)
    }

    /// Produce the unified product collection.
    ///
    /// Never fails: a fully degraded pass (every source down) yields
    /// an empty collection, which callers must treat as a legitimate
    /// "no products" state. Within the revalidation window the cached
    /// pass is returned without re-fetching.
    pub async fn aggregate(&self) -> Arc<Vec<UnifiedProduct>> {
        self.cache
            .get_with(CACHE_KEY, async { Arc::new(self.run_pass().await) })
            .await
    }

    /// One full fetch across all sources, bypassing the cache.
    async fn run_pass(&self) -> Vec<UnifiedProduct> {
        let fetches = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            async move {
                match source.list_all().await {
                    Ok(records) => (source.kind(), records),
                    Err(e) => {
                        warn!(
                            "{}: listing failed, contributing zero items: {}",
                            source.id(),
                            e
                        );
                        (source.kind(), Vec::new())
                    }
                }
            }
        });

        // join_all preserves input order, so completion-order variance
        // never leaks into the output.
        let batches = futures::future::join_all(fetches).await;

        let mut seen: HashSet<(SourceKind, String)> = HashSet::new();
        let mut unified = Vec::new();
        for (kind, records) in batches {
            for record in records {
                if !seen.insert((kind, record.id.clone())) {
                    debug!(
                        "Aggregation: dropping duplicate ({}, '{}')",
                        kind.as_str(),
                        record.id
                    );
                    continue;
                }
                unified.push(UnifiedProduct::from_record(record, kind));
            }
        }

        debug!(
            "Aggregation pass complete: {} products from {} sources",
            unified.len(),
            self.sources.len()
        );
        unified
    }

    /// The configured sources, in output order.
    pub fn sources(&self) -> &[Arc<dyn ProductSource>] {
        &self.sources
    }
}
