//! End-to-end aggregation behavior through the public API.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal_macros::dec;
use storefront_data::errors::SourceError;
use storefront_data::models::ProductRecord;
use storefront_data::{Aggregator, ProductSource, SourceKind};

struct StubSource {
    id: &'static str,
    kind: SourceKind,
    outcome: Result<Vec<ProductRecord>, u16>,
}

#[async_trait]
impl ProductSource for StubSource {
    fn id(&self) -> &'static str {
        self.id
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn list_all(&self) -> Result<Vec<ProductRecord>, SourceError> {
        match &self.outcome {
            Ok(records) => Ok(records.clone()),
            Err(status) => Err(SourceError::Status {
                source_id: self.id.to_string(),
                status: *status,
            }),
        }
    }
}

fn record(id: &str, name: &str) -> ProductRecord {
    ProductRecord {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{} description", name),
        price: dec!(12.50),
        currency: "USD".to_string(),
        formatted_price: None,
        images: Vec::new(),
        variants: Vec::new(),
        thumbnail: Some(format!("https://cdn.example/{}.png", id)),
        slug: None,
        url: Some(format!("https://shop.example/{}", id)),
        available: true,
    }
}

/// Two merch items, one marketplace item, one failing marketplace, one
/// tier: exactly four unified products, correctly tagged, no error.
#[tokio::test]
async fn partial_failure_yields_the_surviving_products() {
    let sources: Vec<Arc<dyn ProductSource>> = vec![
        Arc::new(StubSource {
            id: "FOURTHWALL",
            kind: SourceKind::Fourthwall,
            outcome: Ok(vec![record("fw-1", "Tour Tee"), record("fw-2", "Poster")]),
        }),
        Arc::new(StubSource {
            id: "GUMROAD",
            kind: SourceKind::Gumroad,
            outcome: Ok(vec![record("gr-1", "Sample Pack")]),
        }),
        Arc::new(StubSource {
            id: "LEMONSQUEEZY",
            kind: SourceKind::LemonSqueezy,
            outcome: Err(503),
        }),
        Arc::new(StubSource {
            id: "PATREON",
            kind: SourceKind::Patreon,
            outcome: Ok(vec![record("101", "Supporter")]),
        }),
    ];

    let aggregator = Aggregator::new(sources);
    let products = aggregator.aggregate().await;

    let tags: Vec<SourceKind> = products.iter().map(|p| p.source).collect();
    assert_eq!(
        tags,
        vec![
            SourceKind::Fourthwall,
            SourceKind::Fourthwall,
            SourceKind::Gumroad,
            SourceKind::Patreon
        ]
    );

    // Unified shape checks on a representative item.
    let tee = &products[0];
    assert_eq!(tee.id, "fw-1");
    assert_eq!(tee.name, "Tour Tee");
    assert_eq!(tee.display_price, "$12.50");
    assert!(!tee.external);
    assert_eq!(tee.slug.as_deref(), Some("tour-tee"));

    let pack = &products[2];
    assert!(pack.external);
    assert_eq!(pack.url.as_deref(), Some("https://shop.example/gr-1"));
}

#[tokio::test]
async fn zero_configured_sources_is_an_empty_collection() {
    let aggregator = Aggregator::new(Vec::new());
    assert!(aggregator.aggregate().await.is_empty());
}
