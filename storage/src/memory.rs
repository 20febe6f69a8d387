use std::collections::{BTreeMap, BTreeSet, HashMap};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use tokio::{io::AsyncWriteExt, sync::RwLock};

use storage_driver::{
    DirEntry, Driver, Metadata, Reader, StorageError, StorageErrorKind, Writer,
};

type Bucket = BTreeMap<Utf8PathBuf, MemoryFileItem>;

#[derive(Debug)]
struct MemoryFileItem {
    modified: DateTime<Utc>,
    data: Vec<u8>,
}

impl AsRef<[u8]> for MemoryFileItem {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for MemoryFileItem {
    fn from(data: Vec<u8>) -> Self {
        Self {
            modified: Utc::now(),
            data,
        }
    }
}

impl From<&MemoryFileItem> for Metadata {
    fn from(value: &MemoryFileItem) -> Self {
        Self {
            modified: Some(value.modified),
            size: value.data.len() as u64,
        }
    }
}

/// Storage driver that stores files in memory.
///
/// Directories are implied by the paths of the stored files, so an empty
/// directory only exists as the root of a bucket.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    buckets: RwLock<HashMap<String, Bucket>>,
}

impl MemoryStorage {
    /// Create a new `MemoryStorage` instance, with no buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new `MemoryStorage` instance, with the given buckets.
    pub fn with_buckets(buckets: &[&str]) -> Self {
        let map = buckets
            .iter()
            .map(|bucket| (bucket.to_string(), Bucket::new()))
            .collect();

        Self {
            buckets: RwLock::new(map),
        }
    }

    /// Create a new bucket in the storage.
    pub async fn create_bucket(&self, bucket: String) {
        let mut buckets = self.buckets.write().await;
        buckets.entry(bucket).or_default();
    }

    /// Store a file directly, without going through a reader.
    pub async fn insert(&self, bucket: &str, remote: impl Into<Utf8PathBuf>, data: Vec<u8>) {
        let mut buckets = self.buckets.write().await;
        buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(remote.into(), data.into());
    }

    fn missing_bucket(&self, bucket: &str) -> StorageError {
        StorageError::builder(
            self.name(),
            StorageErrorKind::NotFound,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Bucket not found: {bucket}"),
            ),
        )
        .bucket(bucket)
        .context("bucket not found")
        .build()
    }
}

fn io_error(engine: &'static str, err: std::io::Error) -> StorageError {
    StorageError::io(engine, err)
}

#[async_trait::async_trait]
impl Driver for MemoryStorage {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn scheme(&self) -> &str {
        "memory"
    }

    async fn metadata(&self, bucket: &str, remote: &Utf8Path) -> Result<Metadata, StorageError> {
        let buckets = self.buckets.read().await;
        let files = buckets
            .get(bucket)
            .ok_or_else(|| self.missing_bucket(bucket))?;
        files
            .get(remote)
            .map(Metadata::from)
            .ok_or_else(|| StorageError::not_found(self.name(), bucket, remote.as_str()))
    }

    async fn read_dir(
        &self,
        bucket: &str,
        remote: &Utf8Path,
    ) -> Result<Vec<DirEntry>, StorageError> {
        tracing::trace!(%bucket, %remote, "list memory bucket");

        let buckets = self.buckets.read().await;
        let files = buckets
            .get(bucket)
            .ok_or_else(|| self.missing_bucket(bucket))?;

        if files.contains_key(remote) {
            return Err(StorageError::builder(
                self.name(),
                StorageErrorKind::NotADirectory,
                std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    format!("Not a directory: {remote}"),
                ),
            )
            .bucket(bucket)
            .path(remote.as_str())
            .build());
        }

        let mut directories = BTreeSet::new();
        let mut entries = Vec::new();
        for (path, item) in files.iter() {
            let Ok(rest) = path.strip_prefix(remote) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            if components.next().is_some() {
                directories.insert(first.as_str().to_owned());
            } else {
                entries.push(DirEntry::file(first.as_str(), item.into()));
            }
        }

        if entries.is_empty() && directories.is_empty() && !remote.as_str().is_empty() {
            return Err(StorageError::not_found(self.name(), bucket, remote.as_str()));
        }

        entries.extend(directories.into_iter().map(DirEntry::directory));
        Ok(entries)
    }

    async fn upload(
        &self,
        bucket: &str,
        remote: &Utf8Path,
        local: &mut Reader<'_>,
    ) -> Result<(), StorageError> {
        let mut buf = Vec::new();

        tokio::io::copy(local, &mut buf)
            .await
            .map_err(|err| io_error(self.name(), err))?;

        buf.shutdown()
            .await
            .map_err(|err| io_error(self.name(), err))?;

        self.insert(bucket, remote, buf).await;
        Ok(())
    }

    async fn download(
        &self,
        bucket: &str,
        remote: &Utf8Path,
        local: &mut Writer<'_>,
    ) -> Result<(), StorageError> {
        let buckets = self.buckets.read().await;
        let files = buckets
            .get(bucket)
            .ok_or_else(|| self.missing_bucket(bucket))?;
        let mut buf = files
            .get(remote)
            .ok_or_else(|| StorageError::not_found(self.name(), bucket, remote.as_str()))?
            .as_ref();

        tokio::io::copy(&mut buf, local)
            .await
            .map_err(|err| io_error(self.name(), err))?;

        local
            .flush()
            .await
            .map_err(|err| io_error(self.name(), err))?;

        Ok(())
    }

    async fn delete(&self, bucket: &str, remote: &Utf8Path) -> Result<(), StorageError> {
        let mut buckets = self.buckets.write().await;
        let files = buckets
            .get_mut(bucket)
            .ok_or_else(|| self.missing_bucket(bucket))?;
        files
            .remove(remote)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(self.name(), bucket, remote.as_str()))
    }
}
