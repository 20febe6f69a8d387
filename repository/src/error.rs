use layout::{CoordinatesMismatch, InvalidArtifactPath, ProviderNotFound};
use storage::{StorageError, StorageErrorKind};

use crate::RepositoryPolicy;

/// Errors raised while browsing repositories or moving artifacts in and out of them.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No storage with this id is configured.
    #[error("storage '{storage}' not found")]
    StorageNotFound {
        /// Requested storage id.
        storage: String,
    },

    /// The storage exists but holds no repository with this name.
    #[error("repository '{storage}/{repository}' not found")]
    RepositoryNotFound {
        /// Storage id.
        storage: String,
        /// Requested repository name.
        repository: String,
    },

    /// The path does not exist below the repository root, or tries to leave it.
    #[error("path '{path}' not found in repository '{storage}/{repository}'")]
    PathNotFound {
        /// Storage id.
        storage: String,
        /// Repository name.
        repository: String,
        /// Requested path, as given.
        path: String,
    },

    /// The path is not an artifact path of the repository's layout.
    #[error(transparent)]
    InvalidArtifactPath(#[from] InvalidArtifactPath),

    /// The coordinates belong to a layout other than the repository's.
    #[error(transparent)]
    CoordinatesMismatch(#[from] CoordinatesMismatch),

    /// The repository policy refuses these coordinates.
    #[error("{policy} repository '{storage}/{repository}' does not accept {coordinates}")]
    PolicyViolation {
        /// Storage id.
        storage: String,
        /// Repository name.
        repository: String,
        /// Policy of the repository.
        policy: RepositoryPolicy,
        /// The refused coordinates, as displayed.
        coordinates: String,
    },

    /// The storage backend failed.
    #[error("storage backend failed")]
    Storage(#[from] StorageError),
}

impl RepositoryError {
    /// Is this one of the browsing misses (storage, repository or path not found)?
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RepositoryError::StorageNotFound { .. }
                | RepositoryError::RepositoryNotFound { .. }
                | RepositoryError::PathNotFound { .. }
        )
    }

    /// Was the request at fault, rather than the server?
    ///
    /// Backend misses are already [`RepositoryError::PathNotFound`], so any
    /// remaining storage failure, e.g. a location no driver serves, is the server's.
    pub fn is_client_fault(&self) -> bool {
        !matches!(self, RepositoryError::Storage(_))
    }

    pub(crate) fn path_not_found(storage: &str, repository: &str, path: &str) -> Self {
        RepositoryError::PathNotFound {
            storage: storage.to_owned(),
            repository: repository.to_owned(),
            path: path.to_owned(),
        }
    }

    /// Storage misses below a repository become [`RepositoryError::PathNotFound`].
    pub(crate) fn from_storage(
        err: StorageError,
        storage: &str,
        repository: &str,
        path: &str,
    ) -> Self {
        match err.kind() {
            StorageErrorKind::NotFound | StorageErrorKind::NotADirectory => {
                tracing::debug!(%err, "Storage miss");
                Self::path_not_found(storage, repository, path)
            }
            _ => RepositoryError::Storage(err),
        }
    }
}

/// Errors in a storage and repository configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// A repository names a layout no provider is registered for.
    #[error("repository '{storage}/{repository}' uses unknown layout '{layout}'")]
    UnknownLayout {
        /// Storage id.
        storage: String,
        /// Repository name.
        repository: String,
        /// The unknown layout alias.
        layout: String,
        /// The failed registry lookup.
        #[source]
        source: ProviderNotFound,
    },

    /// A repository with this name already exists in the storage.
    #[error("repository '{storage}/{repository}' is defined twice")]
    DuplicateRepository {
        /// Storage id.
        storage: String,
        /// Repository name.
        repository: String,
    },

    /// A storage with this id already exists.
    #[error("storage '{storage}' is defined twice")]
    DuplicateStorage {
        /// Storage id.
        storage: String,
    },

    /// A configured storage backend could not be built.
    #[error("backend '{backend}' could not be built")]
    Backend {
        /// Name of the backend in the configuration.
        backend: String,
        /// Why the driver failed.
        #[source]
        source: StorageError,
    },
}
