//! Fourthwall merchandise source implementation.
//!
//! Fourthwall only exposes products grouped under named collections,
//! so a full listing is a two-step fetch:
//! - `/collections` discovers the product groups (unless the operator
//!   pinned a single collection in config)
//! - `/collections/{slug}/products` is fetched once per collection,
//!   concurrently, with per-collection failures tolerated
//!
//! All requests append the storefront token as a query parameter. The
//! success envelope is `{ results: [...], count?, next?, previous? }`;
//! `next` is a cursor URL followed for paged listings.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::FourthwallConfig;
use crate::errors::{SchemaError, SourceError};
use crate::models::{Collection, ProductImage, ProductRecord, ProductVariant, SourceKind};
use crate::source::{find_by_key, ProductSource};

const SOURCE_ID: &str = "FOURTHWALL";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Hard cap on cursor-following for one listing call
const MAX_PAGES: usize = 32;

/// Fourthwall storefront source.
///
/// # Example
///
/// ```ignore
/// let source = FourthwallSource::new(FourthwallConfig::from_env().unwrap());
/// let records = source.list_all().await?;
/// ```
pub struct FourthwallSource {
    client: Client,
    api_url: String,
    storefront_token: String,
    collection: Option<String>,
}

// ============================================================================
// Response structures for the Fourthwall storefront API
// ============================================================================

/// Success envelope for every list endpoint.
///
/// Items are kept as raw JSON values so one malformed item can be
/// skipped without failing the batch.
#[derive(Debug, Deserialize)]
struct ListEnvelope {
    results: Vec<serde_json::Value>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    id: Option<String>,
    slug: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    id: Option<String>,
    name: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    images: Vec<RawImage>,
    #[serde(default)]
    variants: Vec<RawVariant>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    url: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVariant {
    id: Option<String>,
    name: Option<String>,
    unit_price: Option<RawMoney>,
    /// Attribute bag (color/size sub-attributes); preserved opaquely
    #[serde(default)]
    attributes: serde_json::Value,
    stock: Option<RawStock>,
}

#[derive(Debug, Deserialize)]
struct RawMoney {
    value: Option<Decimal>,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStock {
    #[serde(rename = "type")]
    kind: Option<String>,
    in_stock: Option<i64>,
}

// ============================================================================
// Validation
// ============================================================================

fn to_collection(value: serde_json::Value) -> Result<Collection, SchemaError> {
    let raw: RawCollection =
        serde_json::from_value(value).map_err(|e| SchemaError::InvalidField {
            field: "collection",
            message: e.to_string(),
        })?;

    let id = raw
        .id
        .filter(|v| !v.is_empty())
        .ok_or(SchemaError::MissingField { field: "id" })?;
    let slug = raw
        .slug
        .filter(|v| !v.is_empty())
        .ok_or(SchemaError::MissingField { field: "slug" })?;

    Ok(Collection {
        id,
        name: raw.name.unwrap_or_else(|| slug.clone()),
        slug,
    })
}

fn to_record(value: serde_json::Value) -> Result<ProductRecord, SchemaError> {
    let raw: RawProduct = serde_json::from_value(value).map_err(|e| SchemaError::InvalidField {
        field: "product",
        message: e.to_string(),
    })?;

    let id = raw
        .id
        .filter(|v| !v.is_empty())
        .ok_or(SchemaError::MissingField { field: "id" })?;
    let name = raw
        .name
        .filter(|v| !v.is_empty())
        .ok_or(SchemaError::MissingField { field: "name" })?;

    // Product price is the first variant's unit price; Fourthwall
    // prices per variant only.
    let first_price = raw
        .variants
        .first()
        .and_then(|v| v.unit_price.as_ref());
    let price = first_price.and_then(|m| m.value).unwrap_or_default();
    let currency = first_price
        .and_then(|m| m.currency.clone())
        .unwrap_or_else(|| "USD".to_string());

    let images = raw
        .images
        .into_iter()
        .filter_map(|i| {
            Some(ProductImage {
                url: i.url?,
                width: i.width,
                height: i.height,
            })
        })
        .collect();

    // A product with no stock-tracked variants is treated as
    // available; only an all-variants-sold-out product is not.
    let available = raw.variants.is_empty()
        || raw.variants.iter().any(|v| match &v.stock {
            Some(stock) if stock.kind.as_deref() == Some("Limited") => {
                stock.in_stock.unwrap_or(0) > 0
            }
            _ => true,
        });

    let variants = raw
        .variants
        .into_iter()
        .filter_map(|v| {
            Some(ProductVariant {
                id: v.id?,
                name: v.name.unwrap_or_default(),
                price: v.unit_price.and_then(|m| m.value),
                attributes: v.attributes,
                stock: v.stock.and_then(|s| s.in_stock),
            })
        })
        .collect();

    Ok(ProductRecord {
        id,
        name,
        description: raw.description.unwrap_or_default(),
        price,
        currency,
        formatted_price: None,
        images,
        variants,
        thumbnail: None,
        slug: raw.slug,
        url: None,
        available,
    })
}

/// Flatten per-collection batches, tolerating failed collections and
/// deduplicating overlapping items by id (first occurrence wins).
fn merge_collection_batches(
    batches: Vec<(String, Result<Vec<ProductRecord>, SourceError>)>,
) -> Vec<ProductRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    for (slug, batch) in batches {
        match batch {
            Ok(records) => {
                for record in records {
                    if seen.insert(record.id.clone()) {
                        merged.push(record);
                    } else {
                        debug!(
                            "Fourthwall: dropping duplicate item '{}' from collection '{}'",
                            record.id, slug
                        );
                    }
                }
            }
            Err(e) => {
                warn!(
                    "Fourthwall: collection '{}' fetch failed, contributing zero items: {}",
                    slug, e
                );
            }
        }
    }

    merged
}

// ============================================================================
// FourthwallSource implementation
// ============================================================================

impl FourthwallSource {
    /// Create a new Fourthwall source from its config.
    pub fn new(config: FourthwallConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_url: config.api_url,
            storefront_token: config.storefront_token,
            collection: config.collection,
        }
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, SourceError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("storefront_token", &self.storefront_token));

        Url::parse_with_params(&format!("{}{}", self.api_url, path), &all_params).map_err(|e| {
            SourceError::Transport {
                source_id: SOURCE_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            }
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        debug!(
            "Fourthwall request: {}",
            url.as_str().replace(&self.storefront_token, "***")
        );

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout {
                    source_id: SOURCE_ID.to_string(),
                }
            } else {
                SourceError::Transport {
                    source_id: SOURCE_ID.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited {
                source_id: SOURCE_ID.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                source_id: SOURCE_ID.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| SourceError::Envelope {
            source_id: SOURCE_ID.to_string(),
            message: format!("Failed to decode response: {}", e),
        })
    }

    /// Fetch a list endpoint, following the `next` cursor.
    async fn fetch_paged_results(
        &self,
        first: Url,
    ) -> Result<Vec<serde_json::Value>, SourceError> {
        let mut items = Vec::new();
        let mut next_url = Some(first);
        let mut pages = 0;

        while let Some(url) = next_url.take() {
            pages += 1;
            if pages > MAX_PAGES {
                warn!("Fourthwall: stopping after {} pages", MAX_PAGES);
                break;
            }

            let envelope: ListEnvelope = self.fetch_json(url).await?;
            items.extend(envelope.results);

            next_url = match envelope.next.as_deref() {
                Some(next) => {
                    let mut url =
                        Url::parse(next).map_err(|e| SourceError::Envelope {
                            source_id: SOURCE_ID.to_string(),
                            message: format!("Bad next cursor: {}", e),
                        })?;
                    if !url.query_pairs().any(|(k, _)| k == "storefront_token") {
                        url.query_pairs_mut()
                            .append_pair("storefront_token", &self.storefront_token);
                    }
                    Some(url)
                }
                None => None,
            };
        }

        Ok(items)
    }

    /// Discover all collections on the storefront.
    async fn list_collections(&self) -> Result<Vec<Collection>, SourceError> {
        let url = self.build_url("/collections", &[])?;
        let items = self.fetch_paged_results(url).await?;

        let mut collections = Vec::with_capacity(items.len());
        for item in items {
            match to_collection(item) {
                Ok(collection) => collections.push(collection),
                Err(e) => warn!("Fourthwall: skipping malformed collection: {}", e),
            }
        }

        debug!("Fourthwall: discovered {} collections", collections.len());
        Ok(collections)
    }

    /// Fetch every product in one collection.
    async fn list_collection_products(
        &self,
        slug: &str,
    ) -> Result<Vec<ProductRecord>, SourceError> {
        let url = self.build_url(&format!("/collections/{}/products", slug), &[])?;
        let items = self.fetch_paged_results(url).await?;

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match to_record(item) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "Fourthwall: skipping malformed item in collection '{}': {}",
                    slug, e
                ),
            }
        }

        Ok(records)
    }

    /// Direct product lookup via `/products?slug={slug}`.
    async fn lookup_by_slug(&self, slug: &str) -> Result<Option<ProductRecord>, SourceError> {
        let url = self.build_url("/products", &[("slug", slug)])?;
        let envelope: ListEnvelope = self.fetch_json(url).await?;

        for item in envelope.results {
            match to_record(item) {
                Ok(record) => return Ok(Some(record)),
                Err(e) => warn!("Fourthwall: skipping malformed lookup result: {}", e),
            }
        }

        Ok(None)
    }
}

#[async_trait]
impl ProductSource for FourthwallSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Fourthwall
    }

    async fn list_all(&self) -> Result<Vec<ProductRecord>, SourceError> {
        let slugs: Vec<String> = match &self.collection {
            Some(slug) => vec![slug.clone()],
            None => match self.list_collections().await {
                Ok(collections) => collections.into_iter().map(|c| c.slug).collect(),
                Err(e) => {
                    warn!("Fourthwall: collection discovery failed: {}", e);
                    return Ok(Vec::new());
                }
            },
        };

        if slugs.is_empty() {
            return Ok(Vec::new());
        }

        // One fetch per collection, concurrently; a failed collection
        // contributes zero items instead of failing the listing.
        let fetches = slugs.iter().map(|slug| {
            let slug = slug.clone();
            async move {
                let batch = self.list_collection_products(&slug).await;
                (slug, batch)
            }
        });
        let batches = futures::future::join_all(fetches).await;

        let merged = merge_collection_batches(batches);
        debug!(
            "Fourthwall: {} unique items across {} collections",
            merged.len(),
            slugs.len()
        );
        Ok(merged)
    }

    async fn get_by_slug_or_id(
        &self,
        key: &str,
    ) -> Result<Option<ProductRecord>, SourceError> {
        match self.lookup_by_slug(key).await {
            Ok(Some(record)) => return Ok(Some(record)),
            Ok(None) => {}
            Err(e) => debug!("Fourthwall: direct lookup for '{}' failed: {}", key, e),
        }

        // Not addressable by slug upstream; fall back to scanning the
        // full listing by id, slug, then name-derived slug.
        let records = self.list_all().await?;
        Ok(find_by_key(records, key))
    }
}
