use camino::Utf8Path;

use super::LayoutProvider;
use crate::coordinates::{ArtifactCoordinates, NugetCoordinates, NUGET};
use crate::error::InvalidArtifactPath;

/// The NuGet package layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct NugetLayoutProvider;

impl LayoutProvider for NugetLayoutProvider {
    fn alias(&self) -> &'static str {
        NUGET
    }

    fn parse_coordinates(&self, path: &str) -> Result<ArtifactCoordinates, InvalidArtifactPath> {
        NugetCoordinates::parse(path).map(Into::into)
    }

    fn digest_algorithms(&self) -> &'static [&'static str] {
        &["sha512"]
    }

    fn is_metadata(&self, path: &Utf8Path) -> bool {
        path.extension() == Some("nuspec")
    }
}
