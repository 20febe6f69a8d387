//! Artifact coordinates: the structured identity of one artifact within a layout.

use std::fmt;

use camino::Utf8PathBuf;

use crate::error::{InvalidArtifactPath, InvalidCoordinates, Violation};

mod maven;
mod npm;
mod nuget;

pub use self::maven::Maven2Coordinates;
pub use self::npm::NpmCoordinates;
pub use self::nuget::NugetCoordinates;

/// Alias of the Maven 2 layout.
pub const MAVEN2: &str = "Maven 2";

/// Alias of the NuGet layout.
pub const NUGET: &str = "NuGet";

/// Alias of the npm layout.
pub const NPM: &str = "npm";

/// Coordinates of an artifact, tagged with the layout they belong to.
///
/// Coordinates of different layouts never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactCoordinates {
    /// `groupId:artifactId:version[:classifier]@extension`
    Maven2(Maven2Coordinates),

    /// `id` + `version` + package type
    Nuget(NugetCoordinates),

    /// `[@scope/]name` + semantic version
    Npm(NpmCoordinates),
}

impl ArtifactCoordinates {
    /// Alias of the layout these coordinates belong to.
    pub fn layout(&self) -> &'static str {
        match self {
            ArtifactCoordinates::Maven2(_) => MAVEN2,
            ArtifactCoordinates::Nuget(_) => NUGET,
            ArtifactCoordinates::Npm(_) => NPM,
        }
    }

    /// The layout specific identifier, e.g. `groupId:artifactId` for Maven 2.
    pub fn id(&self) -> String {
        match self {
            ArtifactCoordinates::Maven2(c) => c.id(),
            ArtifactCoordinates::Nuget(c) => c.id().to_owned(),
            ArtifactCoordinates::Npm(c) => c.id(),
        }
    }

    /// The version as written.
    pub fn version_string(&self) -> String {
        match self {
            ArtifactCoordinates::Maven2(c) => c.version().to_string(),
            ArtifactCoordinates::Nuget(c) => c.version().to_string(),
            ArtifactCoordinates::Npm(c) => c.version().to_string(),
        }
    }

    /// The artifact variant, where the layout has them.
    pub fn classifier(&self) -> Option<&str> {
        match self {
            ArtifactCoordinates::Maven2(c) => c.classifier(),
            ArtifactCoordinates::Nuget(_) | ArtifactCoordinates::Npm(_) => None,
        }
    }

    /// File extension (the package type for NuGet).
    pub fn extension(&self) -> &str {
        match self {
            ArtifactCoordinates::Maven2(c) => c.extension(),
            ArtifactCoordinates::Nuget(c) => c.package_type(),
            ArtifactCoordinates::Npm(c) => c.extension(),
        }
    }

    /// Canonical path of the artifact, relative to the repository root.
    pub fn to_path(&self) -> Utf8PathBuf {
        match self {
            ArtifactCoordinates::Maven2(c) => c.to_path(),
            ArtifactCoordinates::Nuget(c) => c.to_path(),
            ArtifactCoordinates::Npm(c) => c.to_path(),
        }
    }

    /// Only Maven 2 artifacts can be snapshots.
    pub fn is_snapshot(&self) -> bool {
        match self {
            ArtifactCoordinates::Maven2(c) => c.version().is_snapshot(),
            ArtifactCoordinates::Nuget(_) | ArtifactCoordinates::Npm(_) => false,
        }
    }

    /// The Maven 2 coordinates, if these are Maven 2 coordinates.
    pub fn as_maven2(&self) -> Option<&Maven2Coordinates> {
        match self {
            ArtifactCoordinates::Maven2(c) => Some(c),
            _ => None,
        }
    }

    /// The NuGet coordinates, if these are NuGet coordinates.
    pub fn as_nuget(&self) -> Option<&NugetCoordinates> {
        match self {
            ArtifactCoordinates::Nuget(c) => Some(c),
            _ => None,
        }
    }

    /// The npm coordinates, if these are npm coordinates.
    pub fn as_npm(&self) -> Option<&NpmCoordinates> {
        match self {
            ArtifactCoordinates::Npm(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactCoordinates::Maven2(c) => c.fmt(f),
            ArtifactCoordinates::Nuget(c) => c.fmt(f),
            ArtifactCoordinates::Npm(c) => c.fmt(f),
        }
    }
}

impl From<Maven2Coordinates> for ArtifactCoordinates {
    fn from(value: Maven2Coordinates) -> Self {
        ArtifactCoordinates::Maven2(value)
    }
}

impl From<NugetCoordinates> for ArtifactCoordinates {
    fn from(value: NugetCoordinates) -> Self {
        ArtifactCoordinates::Nuget(value)
    }
}

impl From<NpmCoordinates> for ArtifactCoordinates {
    fn from(value: NpmCoordinates) -> Self {
        ArtifactCoordinates::Npm(value)
    }
}

/// Split a relative path into segments, refusing empty, `.` and `..` segments.
pub(crate) fn segments<'p>(
    layout: &'static str,
    path: &'p str,
) -> Result<Vec<&'p str>, InvalidArtifactPath> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| matches!(*s, "" | "." | "..")) {
        return Err(InvalidArtifactPath {
            layout,
            path: path.to_owned(),
            violation: Violation::BadSegment,
        });
    }
    Ok(segments)
}

/// Can `value` be used as (part of) one path segment?
pub(crate) fn is_segment_safe(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control())
}

pub(crate) fn invalid_field(
    layout: &'static str,
    field: &'static str,
    value: &str,
) -> InvalidCoordinates {
    InvalidCoordinates {
        layout,
        violation: Violation::Field {
            field,
            value: value.to_owned(),
        },
    }
}

pub(crate) fn invalid_version(
    layout: &'static str,
    version: &str,
    reason: impl fmt::Display,
) -> InvalidCoordinates {
    InvalidCoordinates {
        layout,
        violation: Violation::Version {
            version: version.to_owned(),
            reason: reason.to_string(),
        },
    }
}

pub(crate) fn path_error(
    layout: &'static str,
    path: &str,
    violation: Violation,
) -> InvalidArtifactPath {
    InvalidArtifactPath {
        layout,
        path: path.to_owned(),
        violation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(ArtifactCoordinates: Send, Sync, Clone, Eq, std::hash::Hash);

    #[test]
    fn variants_never_compare_equal() {
        let maven: ArtifactCoordinates =
            Maven2Coordinates::new("org.example", "lib", "1.0", None, "jar")
                .unwrap()
                .into();
        let nuget: ArtifactCoordinates = NugetCoordinates::new("lib", "1.0", "nupkg")
            .unwrap()
            .into();

        assert_ne!(maven, nuget);
        assert_eq!(maven.version_string(), nuget.version_string());
        assert_eq!(maven.layout(), MAVEN2);
        assert_eq!(nuget.layout(), NUGET);
    }

    #[test]
    fn accessors_dispatch_on_the_variant() {
        let coordinates: ArtifactCoordinates = Maven2Coordinates::new(
            "org.example",
            "lib",
            "1.0-SNAPSHOT",
            Some("sources"),
            "jar",
        )
        .unwrap()
        .into();

        assert_eq!(coordinates.id(), "org.example:lib");
        assert_eq!(coordinates.classifier(), Some("sources"));
        assert_eq!(coordinates.extension(), "jar");
        assert!(coordinates.is_snapshot());
        assert!(coordinates.as_maven2().is_some());
        assert!(coordinates.as_npm().is_none());
        assert_eq!(
            coordinates.to_path(),
            "org/example/lib/1.0-SNAPSHOT/lib-1.0-SNAPSHOT-sources.jar"
        );

        let npm: ArtifactCoordinates = NpmCoordinates::new(Some("types"), "node", "20.1.0", "tgz")
            .unwrap()
            .into();
        assert_eq!(npm.id(), "@types/node");
        assert_eq!(npm.classifier(), None);
        assert!(!npm.is_snapshot());
    }

    #[test]
    fn segments_refuse_relative_parts() {
        assert!(segments(MAVEN2, "a/b/c").is_ok());
        for path in ["a/../b", "./a", "a//b", "/a", "a/", ""] {
            let err = segments(MAVEN2, path).unwrap_err();
            assert_eq!(err.violation, Violation::BadSegment, "{path}");
        }
    }
}
