use camino::Utf8Path;

use super::LayoutProvider;
use crate::coordinates::{ArtifactCoordinates, NpmCoordinates, NPM};
use crate::error::InvalidArtifactPath;

/// The npm package layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmLayoutProvider;

impl LayoutProvider for NpmLayoutProvider {
    fn alias(&self) -> &'static str {
        NPM
    }

    fn parse_coordinates(&self, path: &str) -> Result<ArtifactCoordinates, InvalidArtifactPath> {
        NpmCoordinates::parse(path).map(Into::into)
    }

    fn digest_algorithms(&self) -> &'static [&'static str] {
        &["sha1", "sha512"]
    }

    fn is_metadata(&self, path: &Utf8Path) -> bool {
        path.file_name() == Some("package.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_files() {
        let provider = NpmLayoutProvider;
        assert!(provider.is_metadata(Utf8Path::new("left-pad/package.json")));
        assert!(provider.is_checksum(Utf8Path::new("left-pad/1.3.0/left-pad-1.3.0.tgz.sha1")));
        assert!(provider.is_artifact(Utf8Path::new("left-pad/1.3.0/left-pad-1.3.0.tgz")));
    }

    #[test]
    fn scoped_packages_parse() {
        let coordinates = NpmLayoutProvider
            .parse_coordinates("@types/node/20.1.0/node-20.1.0.tgz")
            .unwrap();
        assert_eq!(coordinates.id(), "@types/node");
        assert_eq!(coordinates.version_string(), "20.1.0");
    }
}
