use std::fmt;

use camino::Utf8PathBuf;

use super::{invalid_field, invalid_version, path_error, segments, NUGET};
use crate::error::{InvalidArtifactPath, InvalidCoordinates, Violation};
use crate::version::NugetVersion;

/// NuGet coordinates: package id, version and package type (`nupkg`, `nuspec`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NugetCoordinates {
    id: String,
    version: NugetVersion,
    package_type: String,
}

/// `^\w+([_.-]\w+)*$`
fn valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .split(['.', '-', '_'])
            .all(|part| !part.is_empty() && part.chars().all(char::is_alphanumeric))
}

fn valid_package_type(package_type: &str) -> bool {
    !package_type.is_empty()
        && package_type
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric()))
}

impl NugetCoordinates {
    /// Validate and assemble coordinates.
    pub fn new(id: &str, version: &str, package_type: &str) -> Result<Self, InvalidCoordinates> {
        if !valid_id(id) {
            return Err(invalid_field(NUGET, "id", id));
        }
        if !valid_package_type(package_type) {
            return Err(invalid_field(NUGET, "type", package_type));
        }
        let version =
            NugetVersion::parse(version).map_err(|err| invalid_version(NUGET, version, err))?;

        Ok(Self {
            id: id.to_owned(),
            version,
            package_type: package_type.to_owned(),
        })
    }

    /// Parse `id/version/id.version.type`.
    pub fn parse(path: &str) -> Result<Self, InvalidArtifactPath> {
        let parts = segments(NUGET, path)?;
        let [id, version, file] = parts.as_slice() else {
            return Err(path_error(
                NUGET,
                path,
                Violation::SegmentCount {
                    expected: "exactly 3",
                    found: parts.len(),
                },
            ));
        };

        let expected = format!("{id}.{version}.");
        let Some(package_type) = file.strip_prefix(&expected) else {
            return Err(path_error(
                NUGET,
                path,
                Violation::FileName {
                    file: (*file).to_owned(),
                    expected,
                },
            ));
        };
        if package_type.is_empty() {
            return Err(path_error(NUGET, path, Violation::MissingExtension));
        }

        Self::new(id, version, package_type).map_err(|err| err.at(path))
    }

    /// Package id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Package version.
    pub fn version(&self) -> &NugetVersion {
        &self.version
    }

    /// Kind of file, e.g. `nupkg`.
    pub fn package_type(&self) -> &str {
        &self.package_type
    }

    /// `id/version/id.version.type`
    pub fn to_path(&self) -> Utf8PathBuf {
        let mut path = Utf8PathBuf::from(&self.id);
        path.push(self.version.as_str());
        path.push(format!("{}.{}.{}", self.id, self.version, self.package_type));
        path
    }
}

impl fmt::Display for NugetCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.id, self.version, self.package_type)
    }
}
