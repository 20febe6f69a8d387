//! A storage backend that can use multiple drivers based on the location
//! scheme, and possibly the bucket.

use std::collections::HashMap;

use camino::Utf8Path;
use storage_driver::{DirEntry, Metadata, StorageError, StorageErrorKind};
use tokio::io;

use crate::{Backend, Location};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Key {
    scheme: String,
    bucket: Option<String>,
}

/// A storage backend that can use multiple drivers based on the location
/// scheme, and possibly the bucket.
#[derive(Debug, Default, Clone)]
pub struct MultiBackend {
    drivers: HashMap<Key, Backend>,
}

macro_rules! forward_driver {
    ($this:ident.$method:ident($location:expr, $relative:expr $(, $args:expr)*)) => {
        async {
            let backend = $this.get($location)?;
            let remote = $location.join($relative);
            tracing::trace!(method=%stringify!($method), driver=%backend.name(), %remote, "Using {} driver", backend.name());
            backend.$method($location.bucket(), &remote $(, $args)*).await
        }
    };
}

impl MultiBackend {
    /// Create a new `MultiBackend` instance, with no drivers.
    pub fn new() -> Self {
        Self {
            drivers: HashMap::new(),
        }
    }

    /// Add a backend, applicable to all locations with its scheme.
    pub fn add(&mut self, backend: impl Into<Backend>) {
        let backend = backend.into();
        self.drivers.insert(
            Key {
                scheme: backend.scheme().into(),
                bucket: None,
            },
            backend,
        );
    }

    /// Add a backend which only serves one bucket of its scheme.
    pub fn add_for_bucket(&mut self, bucket: impl Into<String>, backend: impl Into<Backend>) {
        let backend = backend.into();
        self.drivers.insert(
            Key {
                scheme: backend.scheme().into(),
                bucket: Some(bucket.into()),
            },
            backend,
        );
    }

    /// Builder-style variant of [`MultiBackend::add`].
    pub fn with(mut self, backend: impl Into<Backend>) -> Self {
        self.add(backend);
        self
    }

    /// Get the backend serving a location. A bucket specific backend wins over
    /// one registered for the whole scheme.
    pub fn get(&self, location: &Location) -> Result<&Backend, StorageError> {
        let specific = Key {
            scheme: location.scheme().to_owned(),
            bucket: Some(location.bucket().to_owned()),
        };
        if let Some(backend) = self.drivers.get(&specific) {
            return Ok(backend);
        }

        let general = Key {
            scheme: location.scheme().to_owned(),
            bucket: None,
        };
        self.drivers.get(&general).ok_or_else(|| {
            StorageError::builder(
                "multi driver",
                StorageErrorKind::InvalidRequest,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Driver for {}:// not found", location.scheme()),
                ),
            )
            .bucket(location.bucket())
            .build()
        })
    }

    /// Is there a backend for this location?
    pub fn serves(&self, location: &Location) -> bool {
        self.get(location).is_ok()
    }

    /// Get file metadata.
    pub async fn metadata(
        &self,
        location: &Location,
        relative: &Utf8Path,
    ) -> Result<Metadata, StorageError> {
        forward_driver!(self.metadata(location, relative)).await
    }

    /// List the immediate children of a directory below the location root.
    pub async fn read_dir(
        &self,
        location: &Location,
        relative: &Utf8Path,
    ) -> Result<Vec<DirEntry>, StorageError> {
        forward_driver!(self.read_dir(location, relative)).await
    }

    /// Download a file to a writer.
    pub async fn download<W>(
        &self,
        location: &Location,
        relative: &Utf8Path,
        writer: &mut W,
    ) -> Result<(), StorageError>
    where
        W: io::AsyncWrite + Unpin + Send + Sync,
    {
        forward_driver!(self.download(location, relative, writer)).await
    }

    /// Upload a file from a reader.
    pub async fn upload<R>(
        &self,
        location: &Location,
        relative: &Utf8Path,
        reader: &mut R,
    ) -> Result<(), StorageError>
    where
        R: io::AsyncBufRead + Unpin + Send + Sync,
    {
        forward_driver!(self.upload(location, relative, reader)).await
    }

    /// Delete a file.
    pub async fn delete(
        &self,
        location: &Location,
        relative: &Utf8Path,
    ) -> Result<(), StorageError> {
        forward_driver!(self.delete(location, relative)).await
    }
}
