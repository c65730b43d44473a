//! Environment configuration for the four upstream sources.
//!
//! Each source has its own config struct with an `Option`-returning
//! `from_env`. A source whose required credentials are absent fails
//! closed: the constructor returns `None` and the aggregator never
//! builds that adapter, so it contributes zero items for the process
//! lifetime.

use std::env;

/// Default Fourthwall storefront API base URL.
pub const DEFAULT_FOURTHWALL_API_URL: &str = "https://storefront-api.fourthwall.com/v1";

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Merchandise platform configuration.
#[derive(Clone, Debug)]
pub struct FourthwallConfig {
    /// Base API URL; overridable for staging environments
    pub api_url: String,
    /// Storefront token appended to every request
    pub storefront_token: String,
    /// Optional single-collection override. When set, collection
    /// discovery is skipped and only this collection is fetched.
    pub collection: Option<String>,
}

impl FourthwallConfig {
    /// Read from `FOURTHWALL_API_URL`, `FOURTHWALL_STOREFRONT_TOKEN`
    /// and `FOURTHWALL_COLLECTION`. Returns `None` without a token.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            api_url: non_empty("FOURTHWALL_API_URL")
                .unwrap_or_else(|| DEFAULT_FOURTHWALL_API_URL.to_string()),
            storefront_token: non_empty("FOURTHWALL_STOREFRONT_TOKEN")?,
            collection: non_empty("FOURTHWALL_COLLECTION"),
        })
    }
}

/// Gumroad marketplace configuration.
#[derive(Clone, Debug)]
pub struct GumroadConfig {
    /// OAuth access token passed as a query parameter
    pub access_token: String,
}

impl GumroadConfig {
    /// Read from `GUMROAD_ACCESS_TOKEN`.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            access_token: non_empty("GUMROAD_ACCESS_TOKEN")?,
        })
    }
}

/// Lemon Squeezy marketplace configuration.
#[derive(Clone, Debug)]
pub struct LemonSqueezyConfig {
    /// API key sent as a bearer token
    pub api_key: String,
    /// Optional store filter; without it the listing spans all stores
    /// the key can see
    pub store_id: Option<String>,
}

impl LemonSqueezyConfig {
    /// Read from `LEMONSQUEEZY_API_KEY` and `LEMONSQUEEZY_STORE_ID`.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            api_key: non_empty("LEMONSQUEEZY_API_KEY")?,
            store_id: non_empty("LEMONSQUEEZY_STORE_ID"),
        })
    }
}

/// Patreon membership-tier configuration.
#[derive(Clone, Debug)]
pub struct PatreonConfig {
    /// Creator access token sent as a bearer token
    pub access_token: String,
    /// Campaign whose tiers are listed
    pub campaign_id: String,
}

impl PatreonConfig {
    /// Read from `PATREON_ACCESS_TOKEN` and `PATREON_CAMPAIGN_ID`.
    /// Both are required.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            access_token: non_empty("PATREON_ACCESS_TOKEN")?,
            campaign_id: non_empty("PATREON_CAMPAIGN_ID")?,
        })
    }
}
