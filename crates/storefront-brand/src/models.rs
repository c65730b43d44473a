use serde::{Deserialize, Serialize};

/// A single brand color swatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColor {
    /// Hex value including the leading '#'
    pub hex: String,
    /// Upstream role tag, e.g. "accent", "dark", "light"
    #[serde(rename = "type")]
    pub kind: String,
}

/// A downloadable logo asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandAsset {
    pub url: String,
    pub format: String,
}

/// Brand lookup result for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandProfile {
    pub domain: String,
    pub name: String,
    #[serde(default)]
    pub colors: Vec<BrandColor>,
    /// Preferred logo asset, if any were published
    #[serde(default)]
    pub logo: Option<BrandAsset>,
}

impl BrandProfile {
    /// The accent color if the brand publishes one, else the first
    /// color of any role.
    pub fn accent_color(&self) -> Option<&BrandColor> {
        self.colors
            .iter()
            .find(|c| c.kind == "accent")
            .or_else(|| self.colors.first())
    }
}
