//! # Layouts
//!
//! Each package ecosystem addresses artifacts differently. This crate gives
//! them one model: [`ArtifactCoordinates`] is a closed enum with one variant
//! per supported layout, a [`LayoutProvider`] maps between coordinates and
//! repository paths, and a [`DependencySynonymFormatter`] renders the
//! declaration a build tool needs to consume an artifact.
//!
//! Providers and formatters live in registries which are built once and passed
//! around explicitly, bundled as [`Providers`].
//!
//! ```rust
//! use layout::Providers;
//!
//! let providers = Providers::builtin();
//! let coordinates = providers
//!     .parse_coordinates("NuGet", "Newtonsoft.Json/13.0.3/Newtonsoft.Json.13.0.3.nupkg")
//!     .unwrap();
//! let snippet = providers
//!     .dependency_snippet("NuGet", "nuget", &coordinates)
//!     .unwrap();
//! assert_eq!(snippet, "<dependency id=\"Newtonsoft.Json\" version=\"13.0.3\" />\n");
//! ```

use std::sync::Arc;

use camino::Utf8PathBuf;

pub mod coordinates;
pub mod error;
pub mod providers;
pub mod snippet;
pub mod version;

pub use self::coordinates::{ArtifactCoordinates, Maven2Coordinates, NpmCoordinates, NugetCoordinates};
pub use self::error::{
    CoordinatesMismatch, DuplicateProvider, InvalidArtifactPath, InvalidCoordinates, LayoutError,
    ProviderNotFound, Violation,
};
pub use self::providers::{LayoutProvider, LayoutProviderRegistry};
pub use self::snippet::{DependencyFormatRegistry, DependencySynonymFormatter};

/// The layout and formatter registries a process works with.
///
/// Cloning is cheap and clones share the registries, so providers registered
/// through one clone are visible through all of them.
#[derive(Debug, Clone, Default)]
pub struct Providers {
    layouts: Arc<LayoutProviderRegistry>,
    formatters: Arc<DependencyFormatRegistry>,
}

impl Providers {
    /// Bundle existing registries.
    pub fn new(layouts: Arc<LayoutProviderRegistry>, formatters: Arc<DependencyFormatRegistry>) -> Self {
        Self { layouts, formatters }
    }

    /// Registries holding every built-in layout and formatter.
    pub fn builtin() -> Self {
        Self::new(
            Arc::new(LayoutProviderRegistry::builtin()),
            Arc::new(DependencyFormatRegistry::builtin()),
        )
    }

    /// The layout provider registry.
    pub fn layouts(&self) -> &Arc<LayoutProviderRegistry> {
        &self.layouts
    }

    /// The dependency formatter registry.
    pub fn formatters(&self) -> &Arc<DependencyFormatRegistry> {
        &self.formatters
    }

    /// Find the layout provider registered under `alias`.
    pub fn lookup_layout_provider(&self, alias: &str) -> Result<Arc<dyn LayoutProvider>, ProviderNotFound> {
        self.layouts.lookup(alias)
    }

    /// Find the formatter for `(layout, formatter)`.
    pub fn lookup_dependency_formatter(
        &self,
        layout: &str,
        formatter: &str,
    ) -> Result<Arc<dyn DependencySynonymFormatter>, ProviderNotFound> {
        self.formatters.lookup(layout, formatter)
    }

    /// Parse a repository relative path with the named layout.
    pub fn parse_coordinates(&self, layout: &str, path: &str) -> Result<ArtifactCoordinates, LayoutError> {
        let provider = self.lookup_layout_provider(layout)?;
        let coordinates = provider
            .parse_coordinates(path)
            .inspect_err(|err| tracing::debug!(%err, "Path is not an artifact"))?;
        Ok(coordinates)
    }

    /// Canonical path of the coordinates, built by the provider of their layout.
    pub fn build_path(&self, coordinates: &ArtifactCoordinates) -> Result<Utf8PathBuf, LayoutError> {
        let provider = self.lookup_layout_provider(coordinates.layout())?;
        Ok(provider.build_path(coordinates)?)
    }

    /// Render a dependency snippet with the formatter registered under `(layout, formatter)`.
    pub fn dependency_snippet(
        &self,
        layout: &str,
        formatter: &str,
        coordinates: &ArtifactCoordinates,
    ) -> Result<String, LayoutError> {
        let implementation = self.lookup_dependency_formatter(layout, formatter)?;
        if coordinates.layout() != layout {
            return Err(CoordinatesMismatch {
                expected: layout.to_owned(),
                actual: coordinates.layout(),
            }
            .into());
        }
        Ok(implementation.dependency_snippet(coordinates)?)
    }
}
