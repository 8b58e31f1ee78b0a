use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use conflux_store::{StoreError, StoreResult};
use tokio::fs;

use crate::client::{rollup_prefixes, BlobClient, ObjectMeta};

/// Blob client over a local directory tree.
///
/// Object names map to relative file paths under the root; listing walks
/// the tree. Creation time comes from the file's modification time, which
/// is the portable choice and is exact for our write-once objects.
pub struct FsBlobClient {
    root: PathBuf,
}

impl FsBlobClient {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an object name to a path under the root. Rejects names that
    /// would escape it.
    fn object_path(&self, name: &str) -> StoreResult<PathBuf> {
        if name.is_empty() || name.starts_with('/') {
            return Err(StoreError::MalformedPath {
                path: name.to_owned(),
            });
        }
        let mut path = self.root.clone();
        for segment in name.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(StoreError::MalformedPath {
                    path: name.to_owned(),
                });
            }
            path.push(segment);
        }
        Ok(path)
    }

    /// Flat listing of every object under the root, sorted by name. A
    /// missing root is an empty store, not an error.
    async fn walk(&self) -> StoreResult<Vec<ObjectMeta>> {
        let mut objects = Vec::new();
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound && dir == self.root => {
                    return Ok(objects);
                }
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    let metadata = entry.metadata().await?;
                    let created: DateTime<Utc> = metadata.modified()?.into();
                    objects.push(ObjectMeta::new(self.relative_name(&entry.path()), created));
                }
            }
        }
        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    fn relative_name(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let segments: Vec<String> = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect();
        segments.join("/")
    }
}

#[async_trait]
impl BlobClient for FsBlobClient {
    async fn list_objects(&self, prefix: &str) -> StoreResult<Vec<ObjectMeta>> {
        let objects = self.walk().await?;
        Ok(objects
            .into_iter()
            .filter(|meta| meta.name.starts_with(prefix))
            .collect())
    }

    async fn list_prefixes(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let objects = self.walk().await?;
        Ok(rollup_prefixes(
            objects.iter().map(|meta| meta.name.as_str()),
            prefix,
        ))
    }

    async fn read_object(&self, name: &str) -> StoreResult<Vec<u8>> {
        let path = self.object_path(name)?;
        Ok(fs::read(path).await?)
    }

    async fn write_object(&self, name: &str, bytes: Vec<u8>) -> StoreResult<()> {
        let path = self.object_path(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, bytes).await?;
        Ok(())
    }
}
