//! Brandfetch API client.

use std::time::Duration;

use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::errors::BrandError;
use crate::models::{BrandAsset, BrandColor, BrandProfile};

const BASE_URL: &str = "https://api.brandfetch.io/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for domain-based brand lookups.
pub struct BrandClient {
    client: Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct RawBrand {
    name: Option<String>,
    #[serde(default)]
    colors: Vec<BrandColor>,
    #[serde(default)]
    logos: Vec<RawLogo>,
}

#[derive(Debug, Deserialize)]
struct RawLogo {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    formats: Vec<RawLogoFormat>,
}

#[derive(Debug, Deserialize)]
struct RawLogoFormat {
    src: Option<String>,
    format: Option<String>,
}

// Lower rank wins.
fn kind_rank(kind: Option<&str>) -> u8 {
    match kind {
        Some("logo") => 0,
        Some("icon") => 1,
        _ => 2,
    }
}

fn format_rank(format: &str) -> u8 {
    match format {
        "svg" => 0,
        "png" => 1,
        _ => 2,
    }
}

/// Pick the best logo asset: a full logo over an icon, svg over png.
fn select_logo(logos: &[RawLogo]) -> Option<BrandAsset> {
    let mut best: Option<(u8, u8, BrandAsset)> = None;

    for logo in logos {
        let kr = kind_rank(logo.kind.as_deref());
        for fmt in &logo.formats {
            let (Some(src), Some(format)) = (&fmt.src, &fmt.format) else {
                continue;
            };
            let fr = format_rank(format);
            let better = match &best {
                Some((bk, bf, _)) => (kr, fr) < (*bk, *bf),
                None => true,
            };
            if better {
                best = Some((
                    kr,
                    fr,
                    BrandAsset {
                        url: src.clone(),
                        format: format.clone(),
                    },
                ));
            }
        }
    }

    best.map(|(_, _, asset)| asset)
}

impl BrandClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Build a client from `BRANDFETCH_API_KEY`, if set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("BRANDFETCH_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        Some(Self::new(api_key))
    }

    /// Look up the brand profile for one domain.
    pub async fn lookup(&self, domain: &str) -> Result<BrandProfile, BrandError> {
        let url = format!("{}/brands/{}", BASE_URL, domain);
        debug!("Brand lookup: {}", domain);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| BrandError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BrandError::Status(404));
        }
        if !status.is_success() {
            return Err(BrandError::Status(status.as_u16()));
        }

        let raw: RawBrand = response
            .json()
            .await
            .map_err(|e| BrandError::Decode(e.to_string()))?;

        Ok(BrandProfile {
            domain: domain.to_string(),
            name: raw.name.unwrap_or_else(|| domain.to_string()),
            logo: select_logo(&raw.logos),
            colors: raw.colors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logo(kind: &str, formats: &[(&str, &str)]) -> RawLogo {
        RawLogo {
            kind: Some(kind.to_string()),
            formats: formats
                .iter()
                .map(|(src, format)| RawLogoFormat {
                    src: Some(src.to_string()),
                    format: Some(format.to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn test_select_logo_prefers_logo_over_icon() {
        let logos = vec![
            logo("icon", &[("icon.svg", "svg")]),
            logo("logo", &[("logo.png", "png")]),
        ];
        assert_eq!(select_logo(&logos).unwrap().url, "logo.png");
    }

    #[test]
    fn test_select_logo_prefers_svg_within_kind() {
        let logos = vec![logo("logo", &[("logo.png", "png"), ("logo.svg", "svg")])];
        assert_eq!(select_logo(&logos).unwrap().format, "svg");
    }

    #[test]
    fn test_select_logo_skips_incomplete_formats() {
        let logos = vec![RawLogo {
            kind: Some("logo".to_string()),
            formats: vec![RawLogoFormat {
                src: None,
                format: Some("svg".to_string()),
            }],
        }];
        assert!(select_logo(&logos).is_none());
    }
}
