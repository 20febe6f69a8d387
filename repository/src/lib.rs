//! # Repositories
//!
//! Storages own named repositories. Each repository is bound to one layout
//! provider, resolved once when the repository is created, and to one root
//! [`Location`](storage::Location) served by a storage backend.
//!
//! The [`Browser`] lists what a repository holds, and the [`ArtifactStore`]
//! deploys and resolves artifacts by their coordinates. Both work on an
//! immutable [`Configuration`]; reconfiguring means building a new one.

mod artifact;
mod browse;
pub mod config;
mod error;
mod listing;
mod model;

pub use self::artifact::ArtifactStore;
pub use self::browse::{relative_path, Browser};
pub use self::config::ConfigurationFile;
pub use self::error::{ConfigurationError, RepositoryError};
pub use self::listing::{DirectoryListing, FileEntry};
pub use self::model::{Configuration, Repository, RepositoryPolicy, Storage};
