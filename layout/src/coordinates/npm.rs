use std::fmt;

use camino::Utf8PathBuf;
use semver::Version;

use super::{invalid_field, invalid_version, is_segment_safe, path_error, segments, NPM};
use crate::error::{InvalidArtifactPath, InvalidCoordinates, Violation};

const MAX_NAME_LENGTH: usize = 214;

/// npm coordinates: optional scope, package name, semantic version and extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NpmCoordinates {
    scope: Option<String>,
    name: String,
    version: Version,
    extension: String,
}

/// Lowercase and url safe, not starting with `.` or `_`.
fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(['.', '_'])
        && name.bytes().all(|b| {
            b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'-' | b'.' | b'_' | b'~')
        })
}

impl NpmCoordinates {
    /// Validate and assemble coordinates. `scope` is given without its `@`.
    pub fn new(
        scope: Option<&str>,
        name: &str,
        version: &str,
        extension: &str,
    ) -> Result<Self, InvalidCoordinates> {
        if let Some(scope) = scope {
            if !valid_name(scope) {
                return Err(invalid_field(NPM, "scope", scope));
            }
        }
        let full_length = name.len() + scope.map_or(0, |s| s.len() + 2);
        if !valid_name(name) || full_length > MAX_NAME_LENGTH {
            return Err(invalid_field(NPM, "name", name));
        }
        if !is_segment_safe(extension) {
            return Err(invalid_field(NPM, "extension", extension));
        }
        let parsed = Version::parse(version).map_err(|err| invalid_version(NPM, version, err))?;

        Ok(Self {
            scope: scope.map(str::to_owned),
            name: name.to_owned(),
            version: parsed,
            extension: extension.to_owned(),
        })
    }

    /// Parse `[@scope/]name/version/name-version.extension`.
    pub fn parse(path: &str) -> Result<Self, InvalidArtifactPath> {
        let parts = segments(NPM, path)?;
        let (scope, name, version, file) = match parts.as_slice() {
            [scope, name, version, file] if scope.starts_with('@') => {
                (Some(&scope[1..]), *name, *version, *file)
            }
            [name, version, file] if !name.starts_with('@') => (None, *name, *version, *file),
            _ => {
                return Err(path_error(
                    NPM,
                    path,
                    Violation::SegmentCount {
                        expected: "3, or 4 with a scope",
                        found: parts.len(),
                    },
                ))
            }
        };

        let expected = format!("{name}-{version}.");
        let Some(extension) = file.strip_prefix(&expected) else {
            return Err(path_error(
                NPM,
                path,
                Violation::FileName {
                    file: file.to_owned(),
                    expected,
                },
            ));
        };
        if extension.is_empty() {
            return Err(path_error(NPM, path, Violation::MissingExtension));
        }

        let coordinates =
            Self::new(scope, name, version, extension).map_err(|err| err.at(path))?;
        if coordinates.version.to_string() != version {
            return Err(path_error(
                NPM,
                path,
                Violation::Version {
                    version: version.to_owned(),
                    reason: "version is not in canonical form".into(),
                },
            ));
        }
        Ok(coordinates)
    }

    /// `@scope/name`, or just `name`.
    pub fn id(&self) -> String {
        match &self.scope {
            Some(scope) => format!("@{scope}/{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Scope without its `@`.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Package name within the scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Package version.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// File extension, usually `tgz`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `[@scope/]name/version/name-version.extension`
    pub fn to_path(&self) -> Utf8PathBuf {
        let mut path = Utf8PathBuf::new();
        if let Some(scope) = &self.scope {
            path.push(format!("@{scope}"));
        }
        path.push(&self.name);
        path.push(self.version.to_string());
        path.push(format!("{}-{}.{}", self.name, self.version, self.extension));
        path
    }
}

impl fmt::Display for NpmCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id(), self.version)
    }
}
