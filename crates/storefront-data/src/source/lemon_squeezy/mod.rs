//! Lemon Squeezy marketplace source implementation.
//!
//! Single flat JSON:API listing endpoint (`/products`) with bearer
//! token auth and `application/vnd.api+json` content negotiation,
//! optionally filtered by store id. The success envelope is a JSON:API
//! document `{ data: [...] }`.
//!
//! Prices arrive both as minor units (`price`) and as an
//! upstream-formatted string (`price_formatted`); the formatted string
//! is trusted as-is for display while the cents still populate the
//! numeric price.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::config::LemonSqueezyConfig;
use crate::errors::{SchemaError, SourceError};
use crate::models::{ProductRecord, SourceKind};
use crate::source::ProductSource;
use crate::util::money::from_minor_units;

const BASE_URL: &str = "https://api.lemonsqueezy.com/v1";
const SOURCE_ID: &str = "LEMONSQUEEZY";
const JSON_API_MIME: &str = "application/vnd.api+json";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Lemon Squeezy marketplace source.
pub struct LemonSqueezySource {
    client: Client,
    api_key: String,
    store_id: Option<String>,
}

// ============================================================================
// Response structures for the Lemon Squeezy API (JSON:API)
// ============================================================================

#[derive(Debug, Deserialize)]
struct JsonApiEnvelope {
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawLsProduct {
    id: Option<String>,
    attributes: Option<RawLsAttributes>,
}

#[derive(Debug, Deserialize)]
struct RawLsAttributes {
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    status: Option<String>,
    /// Price in minor units (cents)
    #[serde(default)]
    price: Option<i64>,
    /// Upstream-formatted display string, e.g. "$9.99"
    #[serde(default)]
    price_formatted: Option<String>,
    #[serde(default)]
    thumb_url: Option<String>,
    #[serde(default)]
    large_thumb_url: Option<String>,
    #[serde(default)]
    buy_now_url: Option<String>,
}

fn to_record(value: serde_json::Value) -> Result<ProductRecord, SchemaError> {
    let raw: RawLsProduct =
        serde_json::from_value(value).map_err(|e| SchemaError::InvalidField {
            field: "product",
            message: e.to_string(),
        })?;

    let id = raw
        .id
        .filter(|v| !v.is_empty())
        .ok_or(SchemaError::MissingField { field: "id" })?;
    let attributes = raw
        .attributes
        .ok_or(SchemaError::MissingField { field: "attributes" })?;
    let name = attributes
        .name
        .filter(|v| !v.is_empty())
        .ok_or(SchemaError::MissingField { field: "name" })?;

    let thumbnail = attributes
        .thumb_url
        .or(attributes.large_thumb_url)
        .filter(|v| !v.is_empty());

    Ok(ProductRecord {
        id,
        name,
        description: attributes.description.unwrap_or_default(),
        price: from_minor_units(attributes.price.unwrap_or(0)),
        // Product-level currency is the store currency, which the
        // listing does not carry; the formatted string remains
        // authoritative for display.
        currency: "USD".to_string(),
        formatted_price: attributes.price_formatted.filter(|v| !v.is_empty()),
        images: Vec::new(),
        variants: Vec::new(),
        thumbnail,
        slug: attributes.slug.filter(|v| !v.is_empty()),
        url: attributes.buy_now_url.filter(|v| !v.is_empty()),
        available: attributes
            .status
            .map(|s| s == "published")
            .unwrap_or(true),
    })
}

// ============================================================================
// LemonSqueezySource implementation
// ============================================================================

impl LemonSqueezySource {
    /// Create a new Lemon Squeezy source from its config.
    pub fn new(config: LemonSqueezyConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API_MIME));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API_MIME));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: config.api_key,
            store_id: config.store_id,
        }
    }

    async fn fetch_products(&self) -> Result<JsonApiEnvelope, SourceError> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(store_id) = &self.store_id {
            params.push(("filter[store_id]", store_id.as_str()));
        }

        let url = Url::parse_with_params(&format!("{}/products", BASE_URL), &params).map_err(
            |e| SourceError::Transport {
                source_id: SOURCE_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            },
        )?;

        debug!("Lemon Squeezy request: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
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

        response
            .json()
            .await
            .map_err(|e| SourceError::Envelope {
                source_id: SOURCE_ID.to_string(),
                message: format!("Failed to decode response: {}", e),
            })
    }
}

#[async_trait]
impl ProductSource for LemonSqueezySource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn kind(&self) -> SourceKind {
        SourceKind::LemonSqueezy
    }

    async fn list_all(&self) -> Result<Vec<ProductRecord>, SourceError> {
        let envelope = self.fetch_products().await?;

        let mut records = Vec::with_capacity(envelope.data.len());
        for item in envelope.data {
            match to_record(item) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Lemon Squeezy: skipping malformed item: {}", e),
            }
        }

        debug!("Lemon Squeezy: fetched {} items", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_to_record_json_api_shape() {
        let value = json!({
            "type": "products",
            "id": "42",
            "attributes": {
                "name": "Preset Bundle",
                "description": "<p>All presets.</p>",
                "slug": "preset-bundle",
                "status": "published",
                "price": 999,
                "price_formatted": "$9.99",
                "thumb_url": "https://cdn.ls/thumb.png",
                "buy_now_url": "https://store.lemonsqueezy.com/checkout/42"
            }
        });

        let rec = to_record(value).unwrap();
        assert_eq!(rec.id, "42");
        assert_eq!(rec.price, dec!(9.99));
        assert_eq!(rec.formatted_price.as_deref(), Some("$9.99"));
        assert_eq!(rec.thumbnail.as_deref(), Some("https://cdn.ls/thumb.png"));
        assert_eq!(
            rec.url.as_deref(),
            Some("https://store.lemonsqueezy.com/checkout/42")
        );
        assert!(rec.available);
    }

    #[test]
    fn test_to_record_requires_attributes() {
        let value = json!({ "type": "products", "id": "42" });
        assert_eq!(
            to_record(value).unwrap_err(),
            SchemaError::MissingField { field: "attributes" }
        );
    }

    #[test]
    fn test_draft_product_is_unavailable() {
        let value = json!({
            "id": "42",
            "attributes": { "name": "Draft", "status": "draft" }
        });
        assert!(!to_record(value).unwrap().available);
    }

    #[test]
    fn test_large_thumb_fallback() {
        let value = json!({
            "id": "42",
            "attributes": { "name": "A", "large_thumb_url": "big.png" }
        });
        assert_eq!(to_record(value).unwrap().thumbnail.as_deref(), Some("big.png"));
    }
}
