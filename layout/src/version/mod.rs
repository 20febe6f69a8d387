//! Comparable version types, one per layout that needs its own semantics.
//!
//! npm versions are plain semantic versions and use [`semver::Version`].

mod maven;
mod nuget;

pub(crate) use self::maven::timestamped_base;
pub use self::maven::{InvalidMavenVersion, MavenVersion, SNAPSHOT_SUFFIX};
pub use self::nuget::{InvalidNugetVersion, NugetVersion};
