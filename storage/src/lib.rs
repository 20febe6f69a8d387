//! # Storage backends
//!
//! Configuration and unification for the storage backends which hold
//! repository files.

use std::sync::Arc;

use camino::Utf8Path;
#[cfg(feature = "local")]
use camino::Utf8PathBuf;
use serde::Deserialize;
use tokio::io;

#[cfg(feature = "local")]
pub(crate) mod local;
mod location;
pub(crate) mod memory;
pub mod multi;

#[cfg(feature = "local")]
#[doc(inline)]
pub use local::LocalDriver;

#[doc(inline)]
pub use location::Location;

#[doc(inline)]
pub use memory::MemoryStorage;

#[doc(inline)]
pub use multi::MultiBackend;

#[doc(inline)]
pub use storage_driver::{
    DirEntry, Driver, EntryKind, Metadata, StorageError, StorageErrorKind,
};

/// Description of a single storage backend, as found in configuration files.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendConfig {
    /// Files held in memory, lost at shutdown.
    Memory {
        /// Buckets which exist from the start.
        #[serde(default)]
        buckets: Vec<String>,
    },

    /// Files below a local directory.
    #[cfg(feature = "local")]
    Local {
        /// Directory holding one sub-directory per bucket.
        path: Utf8PathBuf,

        /// Scheme to register the driver under, `local` by default.
        #[serde(default)]
        scheme: Option<String>,
    },
}

impl BackendConfig {
    /// Construct the configured backend.
    #[tracing::instrument]
    pub fn build(self) -> Result<Backend, StorageError> {
        let backend: Backend = match self {
            BackendConfig::Memory { buckets } => {
                let buckets: Vec<&str> = buckets.iter().map(String::as_str).collect();
                MemoryStorage::with_buckets(&buckets).into()
            }
            #[cfg(feature = "local")]
            BackendConfig::Local { path, scheme } => {
                let driver = LocalDriver::new(path);
                match scheme {
                    Some(scheme) => driver.with_scheme(scheme).into(),
                    None => driver.into(),
                }
            }
        };
        Ok(backend)
    }
}

pub(crate) type ArcDriver = Arc<dyn Driver + Send + Sync>;

/// A shareable handle to one storage driver.
#[derive(Debug, Clone)]
pub struct Backend {
    driver: ArcDriver,
}

impl<D> From<D> for Backend
where
    D: Driver + Send + Sync + 'static,
{
    fn from(value: D) -> Self {
        Backend::new(value)
    }
}

impl Backend {
    /// Wrap a driver.
    pub fn new<D: Driver + Send + Sync + 'static>(driver: D) -> Self {
        Self {
            driver: Arc::new(driver),
        }
    }

    /// Wrap a driver which is already shared.
    pub fn from_arc(driver: ArcDriver) -> Self {
        Self { driver }
    }

    /// Name of the underlying driver.
    pub fn name(&self) -> &'static str {
        self.driver.name()
    }

    /// Scheme of the underlying driver.
    pub fn scheme(&self) -> &str {
        self.driver.scheme()
    }

    #[tracing::instrument(skip(self), fields(driver=self.driver.name()))]
    pub async fn metadata(
        &self,
        bucket: &str,
        remote: &Utf8Path,
    ) -> Result<Metadata, StorageError> {
        self.driver.metadata(bucket, remote).await
    }

    #[tracing::instrument(skip(self), fields(driver=self.driver.name()))]
    pub async fn read_dir(
        &self,
        bucket: &str,
        remote: &Utf8Path,
    ) -> Result<Vec<DirEntry>, StorageError> {
        self.driver.read_dir(bucket, remote).await
    }

    #[tracing::instrument(skip(self, writer), fields(driver=self.driver.name()))]
    pub async fn download<W>(
        &self,
        bucket: &str,
        remote: &Utf8Path,
        writer: &mut W,
    ) -> Result<(), StorageError>
    where
        W: io::AsyncWrite + Unpin + Send + Sync,
    {
        tracing::trace!(%remote, "Downloading from: {bucket}/{remote}");
        self.driver.download(bucket, remote, writer).await
    }

    #[tracing::instrument(skip(self, reader), fields(driver=self.driver.name()))]
    pub async fn upload<R>(
        &self,
        bucket: &str,
        remote: &Utf8Path,
        reader: &mut R,
    ) -> Result<(), StorageError>
    where
        R: io::AsyncBufRead + Unpin + Send + Sync,
    {
        tracing::trace!(%remote, "Uploading to: {bucket}/{remote}");
        self.driver.upload(bucket, remote, reader).await
    }

    #[tracing::instrument(skip(self), fields(driver=self.driver.name()))]
    pub async fn delete(&self, bucket: &str, remote: &Utf8Path) -> Result<(), StorageError> {
        self.driver.delete(bucket, remote).await
    }
}
