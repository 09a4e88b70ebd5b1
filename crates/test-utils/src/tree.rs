//! On-disk product tree builder.
//!
//! Integration tests for the ingestion pipeline need a real directory
//! of data files and sidecars. `ProductTree` owns a tempdir and writes
//! files into it by relative path, creating parent directories as
//! needed. Panics on I/O errors; this is test-only code.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// A temporary received-product tree.
pub struct ProductTree {
    dir: TempDir,
}

impl ProductTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a JSON sidecar at `rel`, returning its absolute path.
    pub fn write_sidecar(&self, rel: &str, doc: &Value) -> PathBuf {
        self.write_bytes(rel, serde_json::to_string_pretty(doc).unwrap().as_bytes())
    }

    /// Write a text file at `rel`.
    pub fn write_text(&self, rel: &str, content: &str) -> PathBuf {
        self.write_bytes(rel, content.as_bytes())
    }

    /// Write a small gradient image at `rel`. The format follows the
    /// file extension.
    pub fn write_image(&self, rel: &str, width: u32, height: u32) -> PathBuf {
        let path = self.ensure_parent(rel);
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        img.save(&path).unwrap();
        path
    }

    pub fn write_bytes(&self, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = self.ensure_parent(rel);
        fs::write(&path, bytes).unwrap();
        path
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.dir.path().join(rel).exists()
    }

    pub fn size_of(&self, rel: &str) -> u64 {
        fs::metadata(self.dir.path().join(rel)).unwrap().len()
    }

    fn ensure_parent(&self, rel: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        path
    }
}

impl Default for ProductTree {
    fn default() -> Self {
        Self::new()
    }
}
