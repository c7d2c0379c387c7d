// SPDX-License-Identifier: MIT
//! Flat-file persistence of encoded outputs

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::errors::HarnessError;

/// Output directory plus the file stem shared by every artifact
///
/// A codec with extension `ext` writes `<root>/<stem>.<ext>`; writes
/// overwrite whatever was there.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    stem: String,
}

/// Where an artifact landed and what it contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub path: PathBuf,
    pub bytes_written: u64,
    /// SHA-256 of the written bytes, lowercase hex
    pub digest: String,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            stem: stem.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{}", self.stem, extension))
    }

    /// Create the output directory if it does not exist
    pub fn init(&self) -> Result<(), HarnessError> {
        fs::create_dir_all(&self.root).map_err(|source| HarnessError::ArtifactWrite {
            path: self.root.clone(),
            source,
        })
    }

    pub fn write(&self, extension: &str, bytes: &[u8]) -> Result<StoredArtifact, HarnessError> {
        let path = self.path_for(extension);
        fs::write(&path, bytes).map_err(|source| HarnessError::ArtifactWrite {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), bytes = bytes.len(), "Artifact written");
        Ok(StoredArtifact {
            path,
            bytes_written: bytes.len() as u64,
            digest: sha256_hex(bytes),
        })
    }

    /// Size of an artifact as reported by the filesystem
    pub fn size_on_disk(&self, path: &Path) -> Result<u64, HarnessError> {
        fs::metadata(path)
            .map(|m| m.len())
            .map_err(|source| HarnessError::ArtifactRead {
                path: path.to_path_buf(),
                source,
            })
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
