use super::{mismatch, xml_escape, DependencySynonymFormatter};
use crate::coordinates::{ArtifactCoordinates, NugetCoordinates, NUGET};
use crate::error::CoordinatesMismatch;

fn nuget(coordinates: &ArtifactCoordinates) -> Result<&NugetCoordinates, CoordinatesMismatch> {
    coordinates
        .as_nuget()
        .ok_or_else(|| mismatch(NUGET, coordinates))
}

/// `<dependency>` element for a `.nuspec`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NugetDependencyFormatter;

impl DependencySynonymFormatter for NugetDependencyFormatter {
    fn layout(&self) -> &'static str {
        NUGET
    }

    fn alias(&self) -> &'static str {
        "nuget"
    }

    fn dependency_snippet(
        &self,
        coordinates: &ArtifactCoordinates,
    ) -> Result<String, CoordinatesMismatch> {
        let c = nuget(coordinates)?;
        Ok(format!(
            "<dependency id=\"{}\" version=\"{}\" />\n",
            xml_escape(c.id()),
            xml_escape(c.version().as_str())
        ))
    }
}

/// Line for a Paket `paket.dependencies` file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaketDependencyFormatter;

impl DependencySynonymFormatter for PaketDependencyFormatter {
    fn layout(&self) -> &'static str {
        NUGET
    }

    fn alias(&self) -> &'static str {
        "paket"
    }

    fn dependency_snippet(
        &self,
        coordinates: &ArtifactCoordinates,
    ) -> Result<String, CoordinatesMismatch> {
        let c = nuget(coordinates)?;
        Ok(format!("nuget {} {}\n", c.id(), c.version()))
    }
}
