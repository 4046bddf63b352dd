//! Filesystem attachment store rooted at a configured directory.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use tripdesk_core::AttachmentStore;
use tripdesk_domain::{Result as DomainResult, TripDeskError};

use crate::errors::to_domain;

#[derive(Debug, Clone)]
pub struct LocalAttachmentStore {
    root: PathBuf,
}

impl LocalAttachmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of `key`; keys must be relative and stay under the root.
    pub fn resolve(&self, key: &str) -> DomainResult<PathBuf> {
        let relative = Path::new(key);
        let escapes = key.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(TripDeskError::Validation(format!("Invalid attachment key: {key}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AttachmentStore for LocalAttachmentStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> DomainResult<u64> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(to_domain)?;
        }
        let size = bytes.len() as u64;
        tokio::fs::write(&path, bytes).await.map_err(to_domain)?;
        debug!(key, size, "Attachment stored");
        Ok(size)
    }

    async fn get(&self, key: &str) -> DomainResult<Vec<u8>> {
        let path = self.resolve(key)?;
        tokio::fs::read(&path).await.map_err(to_domain)
    }

    async fn exists(&self, key: &str) -> DomainResult<bool> {
        let path = self.resolve(key)?;
        tokio::fs::try_exists(&path).await.map_err(to_domain)
    }
}
