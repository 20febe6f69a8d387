//! Repository root locations, written as `scheme://bucket/root/path`.

use std::{fmt, str::FromStr};

use camino::{Utf8Path, Utf8PathBuf};
use http::Uri;
use storage_driver::{StorageError, StorageErrorKind};

/// Where a repository keeps its files: a driver scheme, a bucket within that
/// driver, and a directory within the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    scheme: String,
    bucket: String,
    root: Utf8PathBuf,
}

impl Location {
    /// Build a location from its parts.
    pub fn new(
        scheme: impl Into<String>,
        bucket: impl Into<String>,
        root: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            bucket: bucket.into(),
            root: root.into(),
        }
    }

    /// Parse a location from a Uri, e.g. `local://storage0/releases`.
    pub fn from_uri(uri: &Uri) -> Result<Self, StorageError> {
        let scheme = uri
            .scheme_str()
            .ok_or_else(|| invalid(format!("Missing scheme: invalid location {uri}")))?;
        let bucket = uri
            .host()
            .ok_or_else(|| invalid(format!("Missing bucket: invalid location {uri}")))?;
        let root = Utf8PathBuf::from(uri.path().trim_matches('/'));

        Ok(Self::new(scheme, bucket, root))
    }

    /// The driver scheme.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The bucket within the driver.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The root directory within the bucket. Empty for the bucket root.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Compose a path relative to this location's root into a bucket path.
    pub fn join(&self, relative: &Utf8Path) -> Utf8PathBuf {
        if relative.as_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }
}

fn invalid(message: String) -> StorageError {
    StorageError::new(
        "location",
        StorageErrorKind::InvalidRequest,
        std::io::Error::new(std::io::ErrorKind::InvalidInput, message),
    )
}

impl FromStr for Location {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uri = s
            .parse::<Uri>()
            .map_err(StorageError::with("location", StorageErrorKind::InvalidRequest))?;
        Location::from_uri(&uri)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.bucket)?;
        if !self.root.as_str().is_empty() {
            write!(f, "/{}", self.root)?;
        }
        Ok(())
    }
}

impl<'de> serde::Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_local_location() {
        let location: Location = "local://storage0/releases".parse().unwrap();
        assert_eq!(location.scheme(), "local");
        assert_eq!(location.bucket(), "storage0");
        assert_eq!(location.root(), "releases");
        assert_eq!(location.to_string(), "local://storage0/releases");
    }

    #[test]
    fn parse_bucket_root() {
        let location: Location = "memory://releases".parse().unwrap();
        assert_eq!(location.bucket(), "releases");
        assert_eq!(location.root(), "");
        assert_eq!(location.join(Utf8Path::new("")), "");
        assert_eq!(location.join(Utf8Path::new("org/x")), "org/x");
        assert_eq!(location.to_string(), "memory://releases");
    }

    #[test]
    fn join_under_root() {
        let location: Location = "tmp://bucket/a/b/".parse().unwrap();
        assert_eq!(location.root(), "a/b");
        assert_eq!(location.join(Utf8Path::new("c")), "a/b/c");
    }

    #[test]
    fn reject_missing_scheme() {
        let err = "/just/a/path".parse::<Location>().unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::InvalidRequest);
    }
}
