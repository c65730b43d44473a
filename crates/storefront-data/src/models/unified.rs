use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::util::money::format_price;
use crate::util::slug::slugify;

use super::product::ProductRecord;

/// Closed tag naming which adapter produced a unified product.
///
/// Every record in the unified collection carries exactly one of
/// these; downstream mapping never sniffs fields to guess a source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Merchandise platform (internal product pages)
    Fourthwall,
    /// Digital goods marketplace
    Gumroad,
    /// Digital goods marketplace
    #[serde(rename = "lemonsqueezy")]
    LemonSqueezy,
    /// Membership tier platform
    Patreon,
}

impl SourceKind {
    /// Stable lowercase tag used in serialized output and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Fourthwall => "fourthwall",
            SourceKind::Gumroad => "gumroad",
            SourceKind::LemonSqueezy => "lemonsqueezy",
            SourceKind::Patreon => "patreon",
        }
    }

    /// Internal products render on our own product pages; external
    /// ones link out to the upstream platform.
    pub fn is_external(&self) -> bool {
        !matches!(self, SourceKind::Fourthwall)
    }
}

/// The cross-source normalized product used for storefront display.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UnifiedProduct {
    /// Identifier, unique per `(id, source)` within one pass
    pub id: String,

    /// Display name
    pub name: String,

    /// Opaque formatted description text
    pub description: String,

    /// Single best-choice image URL, when any image exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Price in major currency units
    pub price: Decimal,

    /// ISO 4217 currency code
    pub currency: String,

    /// Pre-formatted price string for display
    pub display_price: String,

    /// Internal URL slug (internal-source products only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// External purchase URL (third-party products only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Whether purchase happens off-site
    pub external: bool,

    /// Which adapter produced this record
    pub source: SourceKind,

    /// Whether the item is currently purchasable
    pub available: bool,
}

impl UnifiedProduct {
    /// Total mapping from a validated record to the unified shape.
    ///
    /// Image selection prefers the source's thumbnail, then the first
    /// image in upstream order. Slugs are derived for internal items
    /// only; external items carry the upstream purchase URL instead.
    /// The upstream-provided formatted price string is trusted when
    /// present; otherwise the price is formatted locally.
    pub fn from_record(record: ProductRecord, source: SourceKind) -> Self {
        let image = record.best_image().map(str::to_string);
        let display_price = record
            .formatted_price
            .clone()
            .unwrap_or_else(|| format_price(record.price, &record.currency));

        let (slug, url) = if source.is_external() {
            (None, record.url.clone())
        } else {
            let slug = record.slug.clone().unwrap_or_else(|| slugify(&record.name));
            (Some(slug), None)
        };

        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            image,
            price: record.price,
            currency: record.currency,
            display_price,
            slug,
            url,
            external: source.is_external(),
            source,
            available: record.available,
        }
    }
}
