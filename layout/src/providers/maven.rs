use camino::Utf8Path;

use super::LayoutProvider;
use crate::coordinates::{ArtifactCoordinates, Maven2Coordinates, MAVEN2};
use crate::error::InvalidArtifactPath;

/// The Maven 2 repository layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Maven2LayoutProvider;

impl LayoutProvider for Maven2LayoutProvider {
    fn alias(&self) -> &'static str {
        MAVEN2
    }

    fn parse_coordinates(&self, path: &str) -> Result<ArtifactCoordinates, InvalidArtifactPath> {
        Maven2Coordinates::parse(path).map(Into::into)
    }

    fn digest_algorithms(&self) -> &'static [&'static str] {
        &["md5", "sha1", "sha256", "sha512"]
    }

    fn is_metadata(&self, path: &Utf8Path) -> bool {
        path.file_name().is_some_and(|name| {
            (name.starts_with("maven-metadata") && name.ends_with(".xml"))
                || name == "archetype-catalog.xml"
        })
    }
}
