//! Build artifacts produced by a capsule build

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// A file produced by the build: absolute path, bytes, and the base
/// directory its relative path is computed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
    contents: Vec<u8>,
    base: PathBuf,
}

impl Artifact {
    /// Create an artifact at `path` whose relative path is taken against `base`.
    pub fn new(path: PathBuf, contents: Vec<u8>, base: PathBuf) -> Self {
        Self {
            path,
            contents,
            base,
        }
    }

    /// Absolute path of the artifact within the dist tree.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw bytes as read from disk.
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Directory the relative path is computed against, normally `<wd>/dist`.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path relative to `base`, POSIX-style.
    ///
    /// Falls back to the full path when the artifact does not sit under its base.
    pub fn relative(&self) -> String {
        match self.path.strip_prefix(&self.base) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => self.path.to_string_lossy().replace('\\', "/"),
        }
    }

    /// `sha256:<hex>` hash of the contents.
    pub fn bytes_hash(&self) -> String {
        let digest = Sha256::digest(&self.contents);
        format!("sha256:{}", hex::encode(digest))
    }

    /// Size of the contents in bytes.
    pub fn size(&self) -> u64 {
        self.contents.len() as u64
    }
}
