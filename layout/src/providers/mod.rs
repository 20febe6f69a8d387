//! Layout providers: one strategy object per package ecosystem.

use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use provider_registry::{ProviderRegistry, Unkeyed};

use crate::coordinates::ArtifactCoordinates;
use crate::error::{CoordinatesMismatch, DuplicateProvider, InvalidArtifactPath, ProviderNotFound};

mod maven;
mod npm;
mod nuget;

pub use self::maven::Maven2LayoutProvider;
pub use self::npm::NpmLayoutProvider;
pub use self::nuget::NugetLayoutProvider;

/// Directories a repository reserves for its own bookkeeping.
pub const RESERVED_DIRECTORIES: [&str; 3] = [".temp", ".trash", ".index"];

/// Suffixes of files which are still being written or are held as locks.
pub const TEMPORARY_SUFFIXES: [&str; 3] = [".tmp", ".lock", ".part"];

/// Addressing and classification rules of one package ecosystem.
///
/// Implementations are stateless: every method is a pure function of its
/// arguments.
pub trait LayoutProvider: fmt::Debug + Send + Sync {
    /// Unique name of the layout, e.g. `Maven 2`.
    fn alias(&self) -> &'static str;

    /// Interpret a repository relative path as artifact coordinates.
    fn parse_coordinates(&self, path: &str) -> Result<ArtifactCoordinates, InvalidArtifactPath>;

    /// Canonical path of the coordinates, the inverse of [`parse_coordinates`](Self::parse_coordinates).
    fn build_path(&self, coordinates: &ArtifactCoordinates) -> Result<Utf8PathBuf, CoordinatesMismatch> {
        if coordinates.layout() != self.alias() {
            return Err(CoordinatesMismatch {
                expected: self.alias().to_owned(),
                actual: coordinates.layout(),
            });
        }
        Ok(coordinates.to_path())
    }

    /// Digest algorithms whose files accompany artifacts, as file extensions.
    fn digest_algorithms(&self) -> &'static [&'static str];

    /// Is this a repository metadata file (index, package manifest)?
    fn is_metadata(&self, path: &Utf8Path) -> bool;

    /// Is this a checksum companion of another file?
    fn is_checksum(&self, path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| self.digest_algorithms().contains(&ext))
    }

    /// Is this a temporary file, a lock file, or inside a reserved directory?
    fn is_temporary(&self, path: &Utf8Path) -> bool {
        if path
            .components()
            .any(|c| RESERVED_DIRECTORIES.contains(&c.as_str()))
        {
            return true;
        }

        path.file_name()
            .is_some_and(|name| TEMPORARY_SUFFIXES.iter().any(|s| name.ends_with(s)))
    }

    /// Is this a real artifact, rather than metadata, a checksum or a temporary file?
    fn is_artifact(&self, path: &Utf8Path) -> bool {
        !self.is_metadata(path) && !self.is_checksum(path) && !self.is_temporary(path)
    }
}

/// Layout providers keyed by their alias.
pub struct LayoutProviderRegistry {
    inner: ProviderRegistry<String, Unkeyed, dyn LayoutProvider>,
}

impl fmt::Debug for LayoutProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl Default for LayoutProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutProviderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            inner: ProviderRegistry::new("layout provider"),
        }
    }

    /// A registry holding the Maven 2, NuGet and npm providers.
    pub fn builtin() -> Self {
        let registry = Self::new();
        let providers: [Arc<dyn LayoutProvider>; 3] = [
            Arc::new(Maven2LayoutProvider),
            Arc::new(NugetLayoutProvider),
            Arc::new(NpmLayoutProvider),
        ];
        for provider in providers {
            registry.inner.register_or_replace(provider.alias().to_owned(), Unkeyed, provider);
        }
        registry
    }

    /// Register a provider under its alias, refusing to shadow an existing one.
    pub fn register(&self, provider: Arc<dyn LayoutProvider>) -> Result<(), DuplicateProvider> {
        self.inner
            .register(provider.alias().to_owned(), Unkeyed, provider)
    }

    /// Register a provider, replacing any provider under the same alias.
    pub fn register_or_replace(
        &self,
        provider: Arc<dyn LayoutProvider>,
    ) -> Option<Arc<dyn LayoutProvider>> {
        self.inner
            .register_or_replace(provider.alias().to_owned(), Unkeyed, provider)
    }

    /// Remove the provider registered under `alias`.
    pub fn unregister(&self, alias: &str) -> Option<Arc<dyn LayoutProvider>> {
        self.inner.unregister(alias, &Unkeyed)
    }

    /// Find the provider registered under `alias`.
    pub fn lookup(&self, alias: &str) -> Result<Arc<dyn LayoutProvider>, ProviderNotFound> {
        self.inner.lookup(alias, &Unkeyed)
    }

    /// Is a provider registered under `alias`?
    pub fn contains(&self, alias: &str) -> bool {
        self.inner.contains(alias, &Unkeyed)
    }

    /// Registered aliases, sorted.
    pub fn aliases(&self) -> Vec<String> {
        self.inner.keys().into_iter().map(|(alias, _)| alias).collect()
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Is the registry empty?
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
