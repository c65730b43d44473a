//! Patreon membership-tier source implementation.
//!
//! Single campaign-scoped fetch: the campaign resource is requested
//! with `include=tiers` and explicit sparse fieldsets, bearer token
//! auth. Tiers arrive in the JSON:API `included` array, filtered to
//! items whose type tag is `"tier"`.
//!
//! Tier prices are reported in cents (`amount_cents`) and formatted
//! with a `/mo` recurring-billing marker, distinct from the one-time
//! formatting the other sources use.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::config::PatreonConfig;
use crate::errors::{SchemaError, SourceError};
use crate::models::{ProductRecord, SourceKind};
use crate::source::ProductSource;
use crate::util::money::{format_recurring_price, from_minor_units};

const BASE_URL: &str = "https://www.patreon.com/api/oauth2/v2";
const SOURCE_ID: &str = "PATREON";

/// Sparse fieldset requested for tiers
const TIER_FIELDS: &str = "title,description,amount_cents,image_url,published,url";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Patreon membership-tier source.
pub struct PatreonSource {
    client: Client,
    access_token: String,
    campaign_id: String,
}

// ============================================================================
// Response structures for the Patreon API (JSON:API)
// ============================================================================

#[derive(Debug, Deserialize)]
struct CampaignEnvelope {
    // The campaign resource itself is not used; only its included
    // tiers are.
    #[serde(default)]
    included: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawTier {
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    attributes: Option<RawTierAttributes>,
}

#[derive(Debug, Deserialize)]
struct RawTierAttributes {
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    /// Price in minor units (cents)
    #[serde(default)]
    amount_cents: Option<i64>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    published: Option<bool>,
    /// Checkout path, relative to patreon.com
    #[serde(default)]
    url: Option<String>,
}

fn is_tier(value: &serde_json::Value) -> bool {
    value.get("type").and_then(|t| t.as_str()) == Some("tier")
}

fn to_record(value: serde_json::Value) -> Result<ProductRecord, SchemaError> {
    let raw: RawTier = serde_json::from_value(value).map_err(|e| SchemaError::InvalidField {
        field: "tier",
        message: e.to_string(),
    })?;

    if raw.kind.as_deref() != Some("tier") {
        return Err(SchemaError::InvalidField {
            field: "type",
            message: "expected \"tier\"".to_string(),
        });
    }

    let id = raw
        .id
        .filter(|v| !v.is_empty())
        .ok_or(SchemaError::MissingField { field: "id" })?;
    let attributes = raw
        .attributes
        .ok_or(SchemaError::MissingField { field: "attributes" })?;
    let title = attributes
        .title
        .filter(|v| !v.is_empty())
        .ok_or(SchemaError::MissingField { field: "title" })?;

    let price = from_minor_units(attributes.amount_cents.unwrap_or(0));
    let url = attributes.url.filter(|v| !v.is_empty()).map(|u| {
        if u.starts_with('/') {
            format!("https://www.patreon.com{}", u)
        } else {
            u
        }
    });

    Ok(ProductRecord {
        id,
        name: title,
        description: attributes.description.unwrap_or_default(),
        price,
        currency: "USD".to_string(),
        formatted_price: Some(format_recurring_price(price, "USD")),
        images: Vec::new(),
        variants: Vec::new(),
        thumbnail: attributes.image_url.filter(|v| !v.is_empty()),
        slug: None,
        url,
        available: attributes.published.unwrap_or(true),
    })
}

// ============================================================================
// PatreonSource implementation
// ============================================================================

impl PatreonSource {
    /// Create a new Patreon source from its config.
    pub fn new(config: PatreonConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            access_token: config.access_token,
            campaign_id: config.campaign_id,
        }
    }

    async fn fetch_campaign(&self) -> Result<CampaignEnvelope, SourceError> {
        let url = Url::parse_with_params(
            &format!("{}/campaigns/{}", BASE_URL, self.campaign_id),
            &[("include", "tiers"), ("fields[tier]", TIER_FIELDS)],
        )
        .map_err(|e| SourceError::Transport {
            source_id: SOURCE_ID.to_string(),
            message: format!("Failed to build URL: {}", e),
        })?;

        debug!("Patreon request: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
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
impl ProductSource for PatreonSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Patreon
    }

    async fn list_all(&self) -> Result<Vec<ProductRecord>, SourceError> {
        let envelope = self.fetch_campaign().await?;

        let mut records = Vec::new();
        for item in envelope.included.into_iter().filter(is_tier) {
            match to_record(item) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Patreon: skipping malformed tier: {}", e),
            }
        }

        debug!("Patreon: fetched {} tiers", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_to_record_formats_recurring_price() {
        let value = json!({
            "type": "tier",
            "id": "101",
            "attributes": {
                "title": "Supporter",
                "description": "Early access.",
                "amount_cents": 500,
                "image_url": "https://cdn.patreon/tier.png",
                "published": true,
                "url": "/checkout/artist?rid=101"
            }
        });

        let rec = to_record(value).unwrap();
        assert_eq!(rec.price, dec!(5.00));
        assert_eq!(rec.formatted_price.as_deref(), Some("$5.00/mo"));
        assert_eq!(
            rec.url.as_deref(),
            Some("https://www.patreon.com/checkout/artist?rid=101")
        );
    }

    #[test]
    fn test_non_tier_included_items_are_filtered() {
        let included = vec![
            json!({ "type": "goal", "id": "g1", "attributes": {} }),
            json!({ "type": "tier", "id": "t1", "attributes": { "title": "Fan", "amount_cents": 300 } }),
            json!({ "type": "reward-item", "id": "r1" }),
        ];

        let tiers: Vec<_> = included.iter().filter(|v| is_tier(v)).collect();
        assert_eq!(tiers.len(), 1);
    }

    #[test]
    fn test_to_record_missing_title_is_rejected() {
        let value = json!({ "type": "tier", "id": "101", "attributes": { "amount_cents": 500 } });
        assert_eq!(
            to_record(value).unwrap_err(),
            SchemaError::MissingField { field: "title" }
        );
    }

    #[test]
    fn test_absolute_tier_url_is_left_alone() {
        let value = json!({
            "type": "tier",
            "id": "101",
            "attributes": { "title": "Fan", "url": "https://www.patreon.com/join/artist" }
        });
        assert_eq!(
            to_record(value).unwrap().url.as_deref(),
            Some("https://www.patreon.com/join/artist")
        );
    }
}
