//! Static brand cache file.
//!
//! Lookups are keyed by domain and written to a pretty-printed JSON
//! file with stable key order, so regenerating the cache only diffs
//! the entries that actually changed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::errors::BrandError;
use crate::models::BrandProfile;

/// Write the brand cache to `path`, creating parent directories as
/// needed. A trailing newline keeps the file diff-friendly.
pub fn write_cache_file(
    path: &Path,
    entries: &BTreeMap<String, BrandProfile>,
) -> Result<(), BrandError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut json = serde_json::to_string_pretty(entries)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

/// Read a previously written brand cache. A missing file is an empty
/// cache, not an error.
pub fn read_cache_file(path: &Path) -> Result<BTreeMap<String, BrandProfile>, BrandError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BrandColor;

    fn profile(domain: &str, name: &str) -> BrandProfile {
        BrandProfile {
            domain: domain.to_string(),
            name: name.to_string(),
            colors: vec![BrandColor {
                hex: "#ff90e8".to_string(),
                kind: "accent".to_string(),
            }],
            logo: None,
        }
    }

    #[test]
    fn test_round_trip_preserves_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brands.json");

        let mut entries = BTreeMap::new();
        entries.insert("gumroad.com".to_string(), profile("gumroad.com", "Gumroad"));
        entries.insert("patreon.com".to_string(), profile("patreon.com", "Patreon"));

        write_cache_file(&path, &entries).unwrap();
        let loaded = read_cache_file(&path).unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_output_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path_a = dir.path().join("a.json");
        let path_b = dir.path().join("b.json");

        let mut entries = BTreeMap::new();
        entries.insert("patreon.com".to_string(), profile("patreon.com", "Patreon"));
        entries.insert("gumroad.com".to_string(), profile("gumroad.com", "Gumroad"));

        write_cache_file(&path_a, &entries).unwrap();
        write_cache_file(&path_b, &entries).unwrap();

        let a = fs::read_to_string(&path_a).unwrap();
        let b = fs::read_to_string(&path_b).unwrap();
        assert_eq!(a, b);
        // BTreeMap keys serialize sorted.
        assert!(a.find("gumroad.com").unwrap() < a.find("patreon.com").unwrap());
    }

    #[test]
    fn test_missing_cache_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = read_cache_file(&dir.path().join("nope.json")).unwrap();
        assert!(loaded.is_empty());
    }
}
