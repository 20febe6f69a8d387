use std::{fmt, ops::Deref, sync::Arc};

use camino::Utf8Path;
use chrono::{DateTime, Utc};
use tokio::io;

use crate::error::StorageError;

/// A reader stream for file contents.
pub type Reader<'r> = dyn io::AsyncBufRead + Unpin + Send + Sync + 'r;

/// A writer stream for file contents.
pub type Writer<'w> = dyn io::AsyncWrite + Unpin + Send + Sync + 'w;

/// File object metadata, which will be generically provided by the driver.
///
/// This struct only provides common metadata fields, and drivers may provide more specific
/// metadata fields directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Metadata {
    /// The size of the file in bytes.
    pub size: u64,

    /// The last modification timestamp of the file, when the backend tracks one.
    pub modified: Option<DateTime<Utc>>,
}

/// Whether a directory entry is a nested directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A directory, which can be listed in turn.
    Directory,

    /// A regular file.
    File,
}

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirEntry {
    /// The entry name, without any leading path components.
    pub name: String,

    /// Directory or file.
    pub kind: EntryKind,

    /// Metadata for files. Directories carry no metadata.
    pub metadata: Option<Metadata>,
}

impl DirEntry {
    /// A directory entry with the given name.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            metadata: None,
        }
    }

    /// A file entry with the given name and metadata.
    pub fn file(name: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            metadata: Some(metadata),
        }
    }

    /// Is this entry a directory?
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// A storage driver, which provides the ability to interact with a storage backend.
///
/// Paths are always relative to the bucket root. An empty path names the bucket root itself.
#[async_trait::async_trait]
pub trait Driver: fmt::Debug {
    /// The name of the driver.
    fn name(&self) -> &'static str;

    /// The Uri scheme of the driver.
    fn scheme(&self) -> &str;

    /// Get the metadata for a file, by path.
    async fn metadata(&self, bucket: &str, remote: &Utf8Path) -> Result<Metadata, StorageError>;

    /// List the immediate children of a directory.
    ///
    /// Fails with [`StorageErrorKind::NotFound`](crate::StorageErrorKind::NotFound) when the
    /// directory does not exist, and with
    /// [`StorageErrorKind::NotADirectory`](crate::StorageErrorKind::NotADirectory) when the
    /// path names a file. No ordering is promised.
    async fn read_dir(&self, bucket: &str, remote: &Utf8Path)
        -> Result<Vec<DirEntry>, StorageError>;

    /// Upload a file to the storage, using a reader stream to provide the contents.
    async fn upload(
        &self,
        bucket: &str,
        remote: &Utf8Path,
        reader: &mut Reader<'_>,
    ) -> Result<(), StorageError>;

    /// Download a file from storage, into a writer stream.
    async fn download(
        &self,
        bucket: &str,
        remote: &Utf8Path,
        writer: &mut Writer<'_>,
    ) -> Result<(), StorageError>;

    /// Delete a file from the storage, by path.
    async fn delete(&self, bucket: &str, remote: &Utf8Path) -> Result<(), StorageError>;
}

#[async_trait::async_trait]
impl<D> Driver for Arc<D>
where
    D: ?Sized + Driver + Sync + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.deref().name()
    }

    fn scheme(&self) -> &str {
        self.deref().scheme()
    }

    async fn metadata(&self, bucket: &str, remote: &Utf8Path) -> Result<Metadata, StorageError> {
        self.deref().metadata(bucket, remote).await
    }

    async fn read_dir(
        &self,
        bucket: &str,
        remote: &Utf8Path,
    ) -> Result<Vec<DirEntry>, StorageError> {
        self.deref().read_dir(bucket, remote).await
    }

    async fn upload(
        &self,
        bucket: &str,
        remote: &Utf8Path,
        reader: &mut Reader<'_>,
    ) -> Result<(), StorageError> {
        self.deref().upload(bucket, remote, reader).await
    }

    async fn download(
        &self,
        bucket: &str,
        remote: &Utf8Path,
        writer: &mut Writer<'_>,
    ) -> Result<(), StorageError> {
        self.deref().download(bucket, remote, writer).await
    }

    async fn delete(&self, bucket: &str, remote: &Utf8Path) -> Result<(), StorageError> {
        self.deref().delete(bucket, remote).await
    }
}
