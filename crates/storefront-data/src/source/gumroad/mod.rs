//! Gumroad marketplace source implementation.
//!
//! Single flat listing endpoint (`/products`) authenticated with an
//! `access_token` query parameter. The success envelope is
//! `{ success: true, products: [...] }`. Prices arrive in minor units
//! (cents); Gumroad also sends its own formatted price string, which
//! is preferred for display. The thumbnail lives under one of several
//! field names, probed in a fixed priority order.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::config::GumroadConfig;
use crate::errors::{SchemaError, SourceError};
use crate::models::{ProductRecord, SourceKind};
use crate::source::ProductSource;
use crate::util::money::from_minor_units;

const BASE_URL: &str = "https://api.gumroad.com/v2";
const SOURCE_ID: &str = "GUMROAD";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Gumroad marketplace source.
pub struct GumroadSource {
    client: Client,
    access_token: String,
}

// ============================================================================
// Response structures for the Gumroad API
// ============================================================================

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    #[serde(default = "default_true")]
    success: bool,
    products: Vec<serde_json::Value>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RawGumroadProduct {
    id: Option<String>,
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    /// Price in minor units (cents)
    price: Option<i64>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    formatted_price: Option<String>,
    // Thumbnail candidates, probed in this priority order
    #[serde(default)]
    thumbnail_url: Option<String>,
    #[serde(default)]
    preview_url: Option<String>,
    #[serde(default)]
    cover_url: Option<String>,
    #[serde(default)]
    short_url: Option<String>,
    #[serde(default)]
    custom_permalink: Option<String>,
    #[serde(default)]
    published: Option<bool>,
}

fn to_record(value: serde_json::Value) -> Result<ProductRecord, SchemaError> {
    let raw: RawGumroadProduct =
        serde_json::from_value(value).map_err(|e| SchemaError::InvalidField {
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

    let price = from_minor_units(raw.price.unwrap_or(0));
    let currency = raw
        .currency
        .map(|c| c.to_uppercase())
        .unwrap_or_else(|| "USD".to_string());

    // Fixed probe order: thumbnail, preview, cover.
    let thumbnail = raw
        .thumbnail_url
        .or(raw.preview_url)
        .or(raw.cover_url)
        .filter(|v| !v.is_empty());

    Ok(ProductRecord {
        id,
        name,
        description: raw.description.unwrap_or_default(),
        price,
        currency,
        formatted_price: raw.formatted_price.filter(|v| !v.is_empty()),
        images: Vec::new(),
        variants: Vec::new(),
        thumbnail,
        slug: raw.custom_permalink.filter(|v| !v.is_empty()),
        url: raw.short_url.filter(|v| !v.is_empty()),
        available: raw.published.unwrap_or(true),
    })
}

// ============================================================================
// GumroadSource implementation
// ============================================================================

impl GumroadSource {
    /// Create a new Gumroad source from its config.
    pub fn new(config: GumroadConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            access_token: config.access_token,
        }
    }

    async fn fetch_products(&self) -> Result<ProductsEnvelope, SourceError> {
        let url = Url::parse_with_params(
            &format!("{}/products", BASE_URL),
            &[("access_token", self.access_token.as_str())],
        )
        .map_err(|e| SourceError::Transport {
            source_id: SOURCE_ID.to_string(),
            message: format!("Failed to build URL: {}", e),
        })?;

        debug!(
            "Gumroad request: {}",
            url.as_str().replace(&self.access_token, "***")
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

        let envelope: ProductsEnvelope =
            response
                .json()
                .await
                .map_err(|e| SourceError::Envelope {
                    source_id: SOURCE_ID.to_string(),
                    message: format!("Failed to decode response: {}", e),
                })?;

        if !envelope.success {
            return Err(SourceError::Envelope {
                source_id: SOURCE_ID.to_string(),
                message: "Upstream reported success=false".to_string(),
            });
        }

        Ok(envelope)
    }
}

#[async_trait]
impl ProductSource for GumroadSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Gumroad
    }

    async fn list_all(&self) -> Result<Vec<ProductRecord>, SourceError> {
        let envelope = self.fetch_products().await?;

        let mut records = Vec::with_capacity(envelope.products.len());
        for item in envelope.products {
            match to_record(item) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Gumroad: skipping malformed item: {}", e),
            }
        }

        debug!("Gumroad: fetched {} items", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_to_record_minor_unit_price() {
        let value = json!({
            "id": "abc123",
            "name": "Sample Pack Vol. 1",
            "price": 1999,
            "currency": "usd"
        });

        let rec = to_record(value).unwrap();
        assert_eq!(rec.price, dec!(19.99));
        assert_eq!(rec.currency, "USD");
    }

    #[test]
    fn test_to_record_prefers_upstream_formatted_price() {
        let value = json!({
            "id": "abc123",
            "name": "Sample Pack",
            "price": 1000,
            "currency": "usd",
            "formatted_price": "$10"
        });

        let rec = to_record(value).unwrap();
        assert_eq!(rec.formatted_price.as_deref(), Some("$10"));
    }

    #[test]
    fn test_thumbnail_probe_order() {
        let with_all = json!({
            "id": "1", "name": "A",
            "thumbnail_url": "t.png", "preview_url": "p.png", "cover_url": "c.png"
        });
        assert_eq!(
            to_record(with_all).unwrap().thumbnail.as_deref(),
            Some("t.png")
        );

        let preview_only = json!({
            "id": "1", "name": "A",
            "preview_url": "p.png", "cover_url": "c.png"
        });
        assert_eq!(
            to_record(preview_only).unwrap().thumbnail.as_deref(),
            Some("p.png")
        );

        let cover_only = json!({ "id": "1", "name": "A", "cover_url": "c.png" });
        assert_eq!(
            to_record(cover_only).unwrap().thumbnail.as_deref(),
            Some("c.png")
        );
    }

    #[test]
    fn test_to_record_missing_id_is_rejected() {
        let value = json!({ "name": "No Id", "price": 100 });
        assert_eq!(
            to_record(value).unwrap_err(),
            SchemaError::MissingField { field: "id" }
        );
    }

    #[test]
    fn test_malformed_items_are_excluded_exactly() {
        let items = vec![
            json!({ "id": "1", "name": "Good", "price": 100 }),
            json!({ "name": "Missing id", "price": 100 }),
            json!({ "id": "3", "name": "Also good", "price": 200 }),
        ];

        let records: Vec<_> = items.into_iter().filter_map(|i| to_record(i).ok()).collect();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_unpublished_product_is_unavailable() {
        let value = json!({ "id": "1", "name": "Draft", "published": false });
        assert!(!to_record(value).unwrap().available);
    }
}
