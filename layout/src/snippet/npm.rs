use super::{mismatch, DependencySynonymFormatter};
use crate::coordinates::{ArtifactCoordinates, NpmCoordinates, NPM};
use crate::error::CoordinatesMismatch;

fn npm(coordinates: &ArtifactCoordinates) -> Result<&NpmCoordinates, CoordinatesMismatch> {
    coordinates
        .as_npm()
        .ok_or_else(|| mismatch(NPM, coordinates))
}

/// Entry for the `dependencies` object of a `package.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmDependencyFormatter;

impl DependencySynonymFormatter for NpmDependencyFormatter {
    fn layout(&self) -> &'static str {
        NPM
    }

    fn alias(&self) -> &'static str {
        "npm"
    }

    fn dependency_snippet(
        &self,
        coordinates: &ArtifactCoordinates,
    ) -> Result<String, CoordinatesMismatch> {
        let c = npm(coordinates)?;
        Ok(format!("\"{}\": \"{}\"\n", c.id(), c.version()))
    }
}

/// `yarn add` command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct YarnDependencyFormatter;

impl DependencySynonymFormatter for YarnDependencyFormatter {
    fn layout(&self) -> &'static str {
        NPM
    }

    fn alias(&self) -> &'static str {
        "yarn"
    }

    fn dependency_snippet(
        &self,
        coordinates: &ArtifactCoordinates,
    ) -> Result<String, CoordinatesMismatch> {
        let c = npm(coordinates)?;
        Ok(format!("yarn add {}@{}\n", c.id(), c.version()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_package_snippets() {
        let c: ArtifactCoordinates = NpmCoordinates::new(Some("types"), "node", "20.1.0", "tgz")
            .unwrap()
            .into();
        assert_eq!(
            NpmDependencyFormatter.dependency_snippet(&c).unwrap(),
            "\"@types/node\": \"20.1.0\"\n"
        );
        assert_eq!(
            YarnDependencyFormatter.dependency_snippet(&c).unwrap(),
            "yarn add @types/node@20.1.0\n"
        );
    }
}
