use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::properties::NormalizedProperties;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config")]
    Yaml(#[from] serde_yaml::Error),
}

/// Settings for the `steam-listing` binary, read from YAML.
///
/// ```yaml
/// owner_steamid: "76561198277655553"
/// tag_summary: false
/// log_level: info
/// metrics_file: /var/lib/node_exporter/steam_listing.prom
/// overlay:
///   marketplace: community
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Owner used for items that do not name one.
    pub owner_steamid: Option<String>,
    pub tag_summary: bool,
    pub log_level: Option<String>,
    pub metrics_file: Option<PathBuf>,
    /// Properties added to every listing, below the item's own.
    pub overlay: NormalizedProperties,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyValue;

    #[test]
    fn full() {
        let config = Config::from_yaml(
            r#"
owner_steamid: "76561198277655553"
tag_summary: true
log_level: debug
metrics_file: /tmp/steam_listing.prom
overlay:
  marketplace: community
  featured: true
  empty: ""
"#,
        )
        .unwrap();

        assert_eq!(config.owner_steamid.as_deref(), Some("76561198277655553"));
        assert!(config.tag_summary);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.metrics_file, Some(PathBuf::from("/tmp/steam_listing.prom")));
        assert_eq!(config.overlay.get_str("marketplace"), Some("community"));
        assert_eq!(config.overlay.get("featured"), Some(&PropertyValue::Bool(true)));
        assert!(!config.overlay.contains_key("empty"));
    }

    #[test]
    fn overlay_numbers() {
        let config = Config::from_yaml("overlay:\n  price: 1.50\n  quantity: 3\n  market_id: 18446744073709551615\n").unwrap();

        assert_eq!(config.overlay.get_str("price"), Some("1.5"));
        assert_eq!(config.overlay.get("quantity"), Some(&PropertyValue::Integer(3)));
        assert_eq!(config.overlay.get_str("market_id"), Some("18446744073709551615"));
    }

    #[test]
    fn empty_is_default() {
        let config = Config::from_yaml("{}").unwrap();

        assert_eq!(config.owner_steamid, None);
        assert!(!config.tag_summary);
        assert!(config.overlay.is_empty());
    }
}
