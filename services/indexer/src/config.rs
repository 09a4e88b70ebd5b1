//! Configuration loading for the indexer.
//!
//! Loaded from a YAML file; relative paths resolve against the config
//! file's own directory so the file stays portable across hosts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root configuration for the indexer service.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    /// Root of the received-product tree.
    pub files: PathBuf,

    /// Path of the catalog database file.
    pub database: PathBuf,

    /// Storage quota in bytes. Omit to disable eviction.
    #[serde(default)]
    pub quota: Option<u64>,

    /// Longest thumbnail edge in pixels. Omit to disable thumbnails.
    #[serde(default)]
    pub thumbnail: Option<u32>,
}

impl IndexerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let mut config: IndexerConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;

        if let Some(dir) = path.parent() {
            config.files = resolve(dir, &config.files);
            config.database = resolve(dir, &config.database);
        }
        Ok(config)
    }
}

fn resolve(dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.yaml");
        fs::write(
            &path,
            "files: products\ndatabase: catalog.db\nquota: 1000000\nthumbnail: 300\n",
        )
        .unwrap();

        let config = IndexerConfig::load(&path).unwrap();
        assert_eq!(config.files, dir.path().join("products"));
        assert_eq!(config.database, dir.path().join("catalog.db"));
        assert_eq!(config.quota, Some(1_000_000));
        assert_eq!(config.thumbnail, Some(300));
    }

    #[test]
    fn test_optional_fields_default_off() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.yaml");
        fs::write(&path, "files: /data/products\ndatabase: /data/catalog.db\n").unwrap();

        let config = IndexerConfig::load(&path).unwrap();
        assert_eq!(config.files, PathBuf::from("/data/products"));
        assert_eq!(config.quota, None);
        assert_eq!(config.thumbnail, None);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(IndexerConfig::load(Path::new("/nonexistent/indexer.yaml")).is_err());
    }
}
