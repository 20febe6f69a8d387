use std::fmt::Write as _;

use super::{mismatch, quote_escape, xml_escape, DependencySynonymFormatter};
use crate::coordinates::{ArtifactCoordinates, Maven2Coordinates, MAVEN2};
use crate::error::CoordinatesMismatch;

fn maven2(coordinates: &ArtifactCoordinates) -> Result<&Maven2Coordinates, CoordinatesMismatch> {
    coordinates
        .as_maven2()
        .ok_or_else(|| mismatch(MAVEN2, coordinates))
}

/// `<dependency>` block for a `pom.xml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MavenDependencyFormatter;

impl DependencySynonymFormatter for MavenDependencyFormatter {
    fn layout(&self) -> &'static str {
        MAVEN2
    }

    fn alias(&self) -> &'static str {
        "maven"
    }

    fn dependency_snippet(
        &self,
        coordinates: &ArtifactCoordinates,
    ) -> Result<String, CoordinatesMismatch> {
        let c = maven2(coordinates)?;

        let mut snippet = String::from("<dependency>\n");
        let mut element = |name: &str, value: &str| {
            // Writing into a String cannot fail.
            let _ = writeln!(snippet, "    <{name}>{}</{name}>", xml_escape(value));
        };
        element("groupId", c.group_id());
        element("artifactId", c.artifact_id());
        element("version", c.version().as_str());
        if c.extension() != "jar" {
            element("type", c.extension());
        }
        if let Some(classifier) = c.classifier() {
            element("classifier", classifier);
        }
        element("scope", "compile");
        snippet.push_str("</dependency>\n");
        Ok(snippet)
    }
}

/// `implementation` line for a Gradle build script.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradleDependencyFormatter;

impl DependencySynonymFormatter for GradleDependencyFormatter {
    fn layout(&self) -> &'static str {
        MAVEN2
    }

    fn alias(&self) -> &'static str {
        "gradle"
    }

    fn dependency_snippet(
        &self,
        coordinates: &ArtifactCoordinates,
    ) -> Result<String, CoordinatesMismatch> {
        let c = maven2(coordinates)?;

        let mut notation = format!("{}:{}:{}", c.group_id(), c.artifact_id(), c.version());
        if let Some(classifier) = c.classifier() {
            notation.push(':');
            notation.push_str(classifier);
        }
        if c.extension() != "jar" {
            notation.push('@');
            notation.push_str(c.extension());
        }
        Ok(format!("implementation \"{}\"\n", quote_escape(&notation)))
    }
}

/// `<dependency>` element for an `ivy.xml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IvyDependencyFormatter;

impl DependencySynonymFormatter for IvyDependencyFormatter {
    fn layout(&self) -> &'static str {
        MAVEN2
    }

    fn alias(&self) -> &'static str {
        "ivy"
    }

    fn dependency_snippet(
        &self,
        coordinates: &ArtifactCoordinates,
    ) -> Result<String, CoordinatesMismatch> {
        let c = maven2(coordinates)?;
        Ok(format!(
            "<dependency org=\"{}\" name=\"{}\" rev=\"{}\" />\n",
            xml_escape(c.group_id()),
            xml_escape(c.artifact_id()),
            xml_escape(c.version().as_str()),
        ))
    }
}

/// `libraryDependencies` line for an sbt build.
#[derive(Debug, Clone, Copy, Default)]
pub struct SbtDependencyFormatter;

impl DependencySynonymFormatter for SbtDependencyFormatter {
    fn layout(&self) -> &'static str {
        MAVEN2
    }

    fn alias(&self) -> &'static str {
        "sbt"
    }

    fn dependency_snippet(
        &self,
        coordinates: &ArtifactCoordinates,
    ) -> Result<String, CoordinatesMismatch> {
        let c = maven2(coordinates)?;
        Ok(format!(
            "libraryDependencies += \"{}\" % \"{}\" % \"{}\"\n",
            quote_escape(c.group_id()),
            quote_escape(c.artifact_id()),
            quote_escape(c.version().as_str())
        ))
    }
}

/// Dependency vector for a Leiningen `project.clj`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeiningenDependencyFormatter;

impl DependencySynonymFormatter for LeiningenDependencyFormatter {
    fn layout(&self) -> &'static str {
        MAVEN2
    }

    fn alias(&self) -> &'static str {
        "leiningen"
    }

    fn dependency_snippet(
        &self,
        coordinates: &ArtifactCoordinates,
    ) -> Result<String, CoordinatesMismatch> {
        let c = maven2(coordinates)?;
        Ok(format!(
            "[{}/{} \"{}\"]\n",
            c.group_id(),
            c.artifact_id(),
            quote_escape(c.version().as_str())
        ))
    }
}
