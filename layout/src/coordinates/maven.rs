use std::fmt;

use camino::Utf8PathBuf;

use super::{invalid_field, invalid_version, is_segment_safe, path_error, segments, MAVEN2};
use crate::error::{InvalidArtifactPath, InvalidCoordinates, Violation};
use crate::version::{timestamped_base, MavenVersion, SNAPSHOT_SUFFIX};

/// Maven 2 coordinates: `groupId:artifactId:version[:classifier]@extension`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Maven2Coordinates {
    group_id: String,
    artifact_id: String,
    version: MavenVersion,
    classifier: Option<String>,
    extension: String,
}

impl Maven2Coordinates {
    /// Validate and assemble coordinates.
    pub fn new(
        group_id: &str,
        artifact_id: &str,
        version: &str,
        classifier: Option<&str>,
        extension: &str,
    ) -> Result<Self, InvalidCoordinates> {
        if group_id.is_empty() || !group_id.split('.').all(is_segment_safe) {
            return Err(invalid_field(MAVEN2, "groupId", group_id));
        }
        if !is_segment_safe(artifact_id) {
            return Err(invalid_field(MAVEN2, "artifactId", artifact_id));
        }
        if let Some(classifier) = classifier {
            if !is_segment_safe(classifier) || classifier.contains('.') {
                return Err(invalid_field(MAVEN2, "classifier", classifier));
            }
        }
        if !is_segment_safe(extension) {
            return Err(invalid_field(MAVEN2, "extension", extension));
        }
        let version =
            MavenVersion::parse(version).map_err(|err| invalid_version(MAVEN2, version, err))?;

        Ok(Self {
            group_id: group_id.to_owned(),
            artifact_id: artifact_id.to_owned(),
            version,
            classifier: classifier.map(str::to_owned),
            extension: extension.to_owned(),
        })
    }

    /// Parse a repository relative path.
    ///
    /// The version directory holds either the version itself, or for
    /// timestamped snapshots, the matching `-SNAPSHOT` version.
    pub fn parse(path: &str) -> Result<Self, InvalidArtifactPath> {
        let parts = segments(MAVEN2, path)?;
        let count = || {
            path_error(
                MAVEN2,
                path,
                Violation::SegmentCount {
                    expected: "at least 4",
                    found: parts.len(),
                },
            )
        };
        let [groups @ .., artifact_id, directory, file] = parts.as_slice() else {
            return Err(count());
        };
        if groups.is_empty() {
            return Err(count());
        }

        let prefix = format!("{artifact_id}-");
        let Some(rest) = file.strip_prefix(&prefix) else {
            return Err(path_error(
                MAVEN2,
                path,
                Violation::FileName {
                    file: (*file).to_owned(),
                    expected: prefix,
                },
            ));
        };

        let (version, tail) = split_version(directory, rest).ok_or_else(|| {
            path_error(
                MAVEN2,
                path,
                Violation::FileName {
                    file: (*file).to_owned(),
                    expected: format!("{artifact_id}-{directory}"),
                },
            )
        })?;

        let (classifier, extension) = if let Some(tail) = tail.strip_prefix('-') {
            match tail.split_once('.') {
                Some((classifier, extension)) => (Some(classifier), extension),
                None => return Err(path_error(MAVEN2, path, Violation::MissingExtension)),
            }
        } else if let Some(extension) = tail.strip_prefix('.') {
            (None, extension)
        } else {
            return Err(path_error(MAVEN2, path, Violation::MissingExtension));
        };

        let coordinates = Self::new(
            &groups.join("."),
            artifact_id,
            version,
            classifier,
            extension,
        )
        .map_err(|err| err.at(path))?;

        if coordinates.version.base_version() != *directory {
            return Err(path_error(
                MAVEN2,
                path,
                Violation::Version {
                    version: version.to_owned(),
                    reason: "timestamped snapshot outside its -SNAPSHOT directory".into(),
                },
            ));
        }

        Ok(coordinates)
    }

    /// `groupId:artifactId`
    pub fn id(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Dot separated group.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Artifact name within the group.
    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// Artifact version.
    pub fn version(&self) -> &MavenVersion {
        &self.version
    }

    /// Variant of the artifact, e.g. `sources`.
    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    /// File extension, e.g. `jar`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `g/r/o/u/p/artifactId/baseVersion/artifactId-version[-classifier].extension`
    pub fn to_path(&self) -> Utf8PathBuf {
        let mut path: Utf8PathBuf = self.group_id.split('.').collect();
        path.push(&self.artifact_id);
        path.push(self.version.base_version());

        let mut file = format!("{}-{}", self.artifact_id, self.version);
        if let Some(classifier) = &self.classifier {
            file.push('-');
            file.push_str(classifier);
        }
        file.push('.');
        file.push_str(&self.extension);
        path.push(file);
        path
    }
}

/// Find the version the file name carries, returning it with the rest of the file name.
fn split_version<'f>(directory: &'f str, rest: &'f str) -> Option<(&'f str, &'f str)> {
    if let Some(tail) = rest.strip_prefix(directory) {
        if tail.is_empty() || tail.starts_with(['.', '-']) {
            return Some((directory, tail));
        }
    }

    // 1.0-SNAPSHOT/lib-1.0-20240101.101010-3.jar
    let base = directory.strip_suffix(SNAPSHOT_SUFFIX)?;
    let stamped = rest.strip_prefix(base)?.strip_prefix('-')?;
    // yyyyMMdd.HHmmss-
    let build = stamped.get(16..)?;
    let digits = build.bytes().take_while(u8::is_ascii_digit).count();
    let end = base.len() + 1 + 16 + digits;
    let version = &rest[..end];
    (timestamped_base(version) == Some(base)).then(|| (version, &rest[end..]))
}

impl fmt::Display for Maven2Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        write!(f, "@{}", self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinates(
        group: &str,
        artifact: &str,
        version: &str,
        classifier: Option<&str>,
        extension: &str,
    ) -> Maven2Coordinates {
        Maven2Coordinates::new(group, artifact, version, classifier, extension).unwrap()
    }

    #[test]
    fn builds_canonical_paths() {
        let c = coordinates(
            "org.carlspring.strongbox.browsing",
            "test-browsing",
            "1.1",
            None,
            "jar",
        );
        assert_eq!(
            c.to_path(),
            "org/carlspring/strongbox/browsing/test-browsing/1.1/test-browsing-1.1.jar"
        );

        let c = coordinates("org.example", "lib", "1.0", Some("sources"), "jar");
        assert_eq!(c.to_path(), "org/example/lib/1.0/lib-1.0-sources.jar");
    }

    #[test]
    fn timestamped_snapshots_live_in_snapshot_directory() {
        let c = coordinates("org.example", "lib", "1.0-20240101.101010-3", None, "pom");
        assert_eq!(
            c.to_path(),
            "org/example/lib/1.0-SNAPSHOT/lib-1.0-20240101.101010-3.pom"
        );
        assert_eq!(Maven2Coordinates::parse(c.to_path().as_str()).unwrap(), c);
    }

    #[test]
    fn round_trips() {
        let cases = [
            coordinates("org.example", "lib", "1.0", None, "jar"),
            coordinates("org.example", "lib", "1.0", None, "jar.sha1"),
            coordinates("org.example", "lib", "1.0", Some("javadoc"), "jar"),
            coordinates("org", "commons-lang", "2.6-beta-1", Some("linux-x86_64"), "tar.gz"),
            coordinates("org.example", "lib", "1.0-SNAPSHOT", None, "pom"),
            coordinates("org.example", "lib", "1.0-SNAPSHOT", Some("tests"), "jar"),
            coordinates("org.example", "lib", "2.0-20240101.101010-12", Some("tests"), "jar"),
        ];

        for c in cases {
            let path = c.to_path();
            assert_eq!(Maven2Coordinates::parse(path.as_str()).unwrap(), c, "{path}");
        }
    }

    #[test]
    fn rejects_malformed_paths() {
        let err = Maven2Coordinates::parse("lib/1.0/lib-1.0.jar").unwrap_err();
        assert!(matches!(err.violation, Violation::SegmentCount { found: 3, .. }));

        let err = Maven2Coordinates::parse("org/lib/1.0/other-1.0.jar").unwrap_err();
        assert!(matches!(err.violation, Violation::FileName { .. }));

        let err = Maven2Coordinates::parse("org/lib/1.0/lib-1.1.jar").unwrap_err();
        assert!(matches!(err.violation, Violation::FileName { .. }));

        let err = Maven2Coordinates::parse("org/lib/1.0/lib-1.0").unwrap_err();
        assert_eq!(err.violation, Violation::MissingExtension);

        let err = Maven2Coordinates::parse("org/lib/1.0/lib-1.0-sources").unwrap_err();
        assert_eq!(err.violation, Violation::MissingExtension);

        let err = Maven2Coordinates::parse("org/../lib/1.0/lib-1.0.jar").unwrap_err();
        assert_eq!(err.violation, Violation::BadSegment);
    }

    #[test]
    fn rejects_timestamp_outside_snapshot_directory() {
        let err = Maven2Coordinates::parse(
            "org/lib/1.0-20240101.101010-3/lib-1.0-20240101.101010-3.jar",
        )
        .unwrap_err();
        assert!(matches!(err.violation, Violation::Version { .. }));
    }

    #[test]
    fn rejects_bad_attributes() {
        assert!(Maven2Coordinates::new("org..example", "lib", "1.0", None, "jar").is_err());
        assert!(Maven2Coordinates::new("org.example", "li/b", "1.0", None, "jar").is_err());
        assert!(Maven2Coordinates::new("org.example", "lib", "", None, "jar").is_err());
        assert!(Maven2Coordinates::new("org.example", "lib", "1.0", Some("a.b"), "jar").is_err());
        assert!(Maven2Coordinates::new("org.example", "lib", "1.0", None, "").is_err());
    }

    #[test]
    fn display() {
        let c = coordinates("org.example", "lib", "1.0", Some("sources"), "jar");
        assert_eq!(c.to_string(), "org.example:lib:1.0:sources@jar");
        assert_eq!(c.id(), "org.example:lib");
    }
}
