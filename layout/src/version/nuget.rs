//! NuGet package versions: `major.minor[.patch[.revision]][-prerelease][+metadata]`.

use std::{cmp::Ordering, fmt, hash, str::FromStr};

/// Error returned for strings which cannot be NuGet versions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidNugetVersion(&'static str);

/// A NuGet version.
///
/// Release versions sort after their pre-releases, pre-release labels compare
/// case-insensitively, and build metadata does not take part in ordering.
/// Equality is on the written form.
#[derive(Clone)]
pub struct NugetVersion {
    raw: String,
    numbers: [u64; 4],
    prerelease: Vec<String>,
}

fn valid_label(label: &str) -> bool {
    !label.is_empty() && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

impl NugetVersion {
    /// Parse a version.
    pub fn parse(version: &str) -> Result<Self, InvalidNugetVersion> {
        let (rest, metadata) = match version.split_once('+') {
            Some((rest, metadata)) => (rest, Some(metadata)),
            None => (version, None),
        };
        if let Some(metadata) = metadata {
            if !metadata.split('.').all(valid_label) {
                return Err(InvalidNugetVersion("invalid build metadata"));
            }
        }

        let (release, prerelease) = match rest.split_once('-') {
            Some((release, prerelease)) => (release, Some(prerelease)),
            None => (rest, None),
        };

        let parts: Vec<&str> = release.split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(InvalidNugetVersion(
                "expected two to four numeric components",
            ));
        }

        let mut numbers = [0u64; 4];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(InvalidNugetVersion("non-numeric version component"));
            }
            *slot = part
                .parse()
                .map_err(|_| InvalidNugetVersion("version component out of range"))?;
        }

        let prerelease = match prerelease {
            Some(labels) => {
                let labels: Vec<String> = labels.split('.').map(str::to_owned).collect();
                if !labels.iter().all(|l| valid_label(l)) {
                    return Err(InvalidNugetVersion("invalid pre-release label"));
                }
                labels
            }
            None => Vec::new(),
        };

        Ok(Self {
            raw: version.to_owned(),
            numbers,
            prerelease,
        })
    }

    /// The version as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Does this version carry a pre-release label?
    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// Compare by NuGet semantics only, without the tie break on the written form.
    pub fn cmp_semantic(&self, other: &Self) -> Ordering {
        self.numbers
            .cmp(&other.numbers)
            .then_with(|| cmp_prerelease(&self.prerelease, &other.prerelease))
    }
}

fn cmp_prerelease(left: &[String], right: &[String]) -> Ordering {
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    for (l, r) in left.iter().zip(right) {
        let result = match (l.parse::<u64>(), r.parse::<u64>()) {
            (Ok(l), Ok(r)) => l.cmp(&r),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => l.to_ascii_lowercase().cmp(&r.to_ascii_lowercase()),
        };
        if result != Ordering::Equal {
            return result;
        }
    }
    left.len().cmp(&right.len())
}

impl fmt::Debug for NugetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NugetVersion").field(&self.raw).finish()
    }
}

impl fmt::Display for NugetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for NugetVersion {
    type Err = InvalidNugetVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NugetVersion::parse(s)
    }
}

impl PartialEq for NugetVersion {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for NugetVersion {}

impl hash::Hash for NugetVersion {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for NugetVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NugetVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_semantic(other)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}
