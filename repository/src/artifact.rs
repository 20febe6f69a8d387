//! Deploying and resolving artifacts by their coordinates.

use std::sync::Arc;

use camino::Utf8PathBuf;
use layout::ArtifactCoordinates;
use storage::MultiBackend;
use tokio::io;

use crate::browse::relative_path;
use crate::error::RepositoryError;
use crate::model::Configuration;

/// Moves artifacts in and out of repositories, addressed by coordinates.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    configuration: Arc<Configuration>,
    backends: Arc<MultiBackend>,
}

impl ArtifactStore {
    /// Store artifacts of a configuration through its storage backends.
    pub fn new(configuration: Arc<Configuration>, backends: Arc<MultiBackend>) -> Self {
        Self {
            configuration,
            backends,
        }
    }

    /// Interpret a path within a repository with the repository's layout.
    pub fn parse(
        &self,
        storage: &str,
        repository: &str,
        path: &str,
    ) -> Result<ArtifactCoordinates, RepositoryError> {
        let repo = self.configuration.get_repository(storage, repository)?;
        let relative = relative_path(path)
            .ok_or_else(|| RepositoryError::path_not_found(storage, repository, path))?;
        Ok(repo.layout_provider().parse_coordinates(relative.as_str())?)
    }

    /// Upload an artifact, returning the path it was stored under.
    ///
    /// The repository policy must accept the coordinates.
    #[tracing::instrument(skip(self, coordinates, reader), fields(%coordinates))]
    pub async fn deploy<R>(
        &self,
        storage: &str,
        repository: &str,
        coordinates: &ArtifactCoordinates,
        reader: &mut R,
    ) -> Result<Utf8PathBuf, RepositoryError>
    where
        R: io::AsyncBufRead + Unpin + Send + Sync,
    {
        let repo = self.configuration.get_repository(storage, repository)?;
        if !repo.policy().accepts(coordinates) {
            return Err(RepositoryError::PolicyViolation {
                storage: storage.to_owned(),
                repository: repository.to_owned(),
                policy: repo.policy(),
                coordinates: coordinates.to_string(),
            });
        }

        let path = repo.layout_provider().build_path(coordinates)?;
        self.backends.upload(repo.location(), &path, reader).await?;
        tracing::debug!(%path, "Deployed artifact");
        Ok(path)
    }

    /// Download an artifact into `writer`.
    #[tracing::instrument(skip(self, coordinates, writer), fields(%coordinates))]
    pub async fn resolve<W>(
        &self,
        storage: &str,
        repository: &str,
        coordinates: &ArtifactCoordinates,
        writer: &mut W,
    ) -> Result<(), RepositoryError>
    where
        W: io::AsyncWrite + Unpin + Send + Sync,
    {
        let repo = self.configuration.get_repository(storage, repository)?;
        let path = repo.layout_provider().build_path(coordinates)?;
        self.backends
            .download(repo.location(), &path, writer)
            .await
            .map_err(|err| RepositoryError::from_storage(err, storage, repository, path.as_str()))
    }
}
