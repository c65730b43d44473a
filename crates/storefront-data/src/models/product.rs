use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single product image, in upstream display order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductImage {
    /// Image URL
    pub url: String,

    /// Pixel width, when the upstream reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Pixel height, when the upstream reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// A purchasable variant of a product.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    /// Variant identifier
    pub id: String,

    /// Variant display name
    pub name: String,

    /// Price override in major currency units, when the variant
    /// differs from the product price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,

    /// Opaque attribute bag as received from the upstream. Color and
    /// size sub-attributes live here; the shape is source-specific.
    pub attributes: serde_json::Value,

    /// Units in stock, when the upstream tracks inventory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

/// The validated per-source product record.
///
/// This is the only shape an adapter may hand past its boundary. The
/// upstream identifier is required and stable across fetches; a raw
/// record without one is rejected during validation rather than
/// defaulted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    /// Source-unique, stable identifier (required)
    pub id: String,

    /// Display name
    pub name: String,

    /// May contain markup; treated as opaque formatted text
    pub description: String,

    /// Price in major currency units
    pub price: Decimal,

    /// ISO 4217 currency code
    pub currency: String,

    /// Formatted price string as provided by the upstream, when it
    /// provides one. Preferred over local reformatting for display to
    /// avoid rounding and locale mismatches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_price: Option<String>,

    /// Ordered image list; empty when the upstream omits it
    pub images: Vec<ProductImage>,

    /// Purchasable variants; empty when the upstream has none
    pub variants: Vec<ProductVariant>,

    /// Preferred thumbnail, when the upstream distinguishes one from
    /// the ordered image list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Canonical URL slug, when the upstream provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Purchase page on the upstream platform (third-party sources)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Whether the item is currently purchasable
    pub available: bool,
}

impl ProductRecord {
    /// Best display image: the explicit thumbnail when present, else
    /// the first image in upstream order.
    pub fn best_image(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()
            .or_else(|| self.images.first().map(|i| i.url.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record_with_images(thumbnail: Option<&str>, image_urls: &[&str]) -> ProductRecord {
        ProductRecord {
            id: "p1".to_string(),
            name: "Test".to_string(),
            description: String::new(),
            price: dec!(10),
            currency: "USD".to_string(),
            formatted_price: None,
            images: image_urls
                .iter()
                .map(|u| ProductImage {
                    url: u.to_string(),
                    width: None,
                    height: None,
                })
                .collect(),
            variants: Vec::new(),
            thumbnail: thumbnail.map(str::to_string),
            slug: None,
            url: None,
            available: true,
        }
    }

    #[test]
    fn test_best_image_prefers_thumbnail() {
        let record = record_with_images(Some("thumb.png"), &["first.png", "second.png"]);
        assert_eq!(record.best_image(), Some("thumb.png"));
    }

    #[test]
    fn test_best_image_falls_back_to_first_image() {
        let record = record_with_images(None, &["first.png", "second.png"]);
        assert_eq!(record.best_image(), Some("first.png"));
    }

    #[test]
    fn test_best_image_none_without_images() {
        let record = record_with_images(None, &[]);
        assert_eq!(record.best_image(), None);
    }
}
