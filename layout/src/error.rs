//! Errors raised while interpreting artifact paths and coordinates.

pub use provider_registry::{DuplicateProvider, ProviderNotFound};

/// The rule a path or coordinate value broke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// Too few or too many path segments for the layout.
    #[error("expected {expected} path segments, found {found}")]
    SegmentCount {
        /// Human readable expectation, e.g. "at least 4".
        expected: &'static str,
        /// Segments actually present.
        found: usize,
    },

    /// A path segment was empty, `.` or `..`.
    #[error("empty or relative path segment")]
    BadSegment,

    /// The file name does not repeat the coordinates held by its directories.
    #[error("file name '{file}' does not start with '{expected}'")]
    FileName {
        /// The offending file name.
        file: String,
        /// The prefix derived from the directories.
        expected: String,
    },

    /// The file name carries no extension after the version.
    #[error("missing extension")]
    MissingExtension,

    /// A coordinate attribute contains characters the layout forbids.
    #[error("invalid {field} '{value}'")]
    Field {
        /// Attribute name, e.g. "groupId".
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The version token could not be parsed.
    #[error("invalid version '{version}': {reason}")]
    Version {
        /// The rejected version.
        version: String,
        /// Why the version parser refused it.
        reason: String,
    },
}

/// A path which does not follow the structural grammar of the claimed layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {layout} artifact path '{path}': {violation}")]
pub struct InvalidArtifactPath {
    /// Alias of the layout which rejected the path.
    pub layout: &'static str,
    /// The rejected path.
    pub path: String,
    /// The broken rule.
    pub violation: Violation,
}

/// Coordinate attributes which cannot form coordinates of the layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {layout} coordinates: {violation}")]
pub struct InvalidCoordinates {
    /// Alias of the layout.
    pub layout: &'static str,
    /// The broken rule.
    pub violation: Violation,
}

impl InvalidCoordinates {
    pub(crate) fn at(self, path: &str) -> InvalidArtifactPath {
        InvalidArtifactPath {
            layout: self.layout,
            path: path.to_owned(),
            violation: self.violation,
        }
    }
}

/// Coordinates of one layout were handed to a component serving another.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} coordinates, got {actual} coordinates")]
pub struct CoordinatesMismatch {
    /// Layout the component serves.
    pub expected: String,
    /// Layout of the coordinates received.
    pub actual: &'static str,
}

/// Errors of the layout facade operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// No layout provider or formatter for the alias(es).
    #[error(transparent)]
    ProviderNotFound(#[from] ProviderNotFound),

    /// The path is not an artifact path of the layout.
    #[error(transparent)]
    InvalidArtifactPath(#[from] InvalidArtifactPath),

    /// The coordinates belong to a different layout.
    #[error(transparent)]
    CoordinatesMismatch(#[from] CoordinatesMismatch),
}
