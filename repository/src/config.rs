//! Serde model of the storage and repository configuration file.
//!
//! ```toml
//! [backends.local]
//! local = { path = "/var/lib/depot" }
//!
//! [storages.storage0.repositories.releases]
//! layout = "Maven 2"
//! location = "local://storage0/releases"
//! policy = "release"
//! ```

use std::collections::BTreeMap;

use layout::LayoutProviderRegistry;
use serde::Deserialize;
use storage::{BackendConfig, Location, MultiBackend};

use crate::error::ConfigurationError;
use crate::model::{Configuration, Repository, RepositoryPolicy, Storage};

/// The whole configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationFile {
    /// Storage drivers, by name.
    #[serde(default)]
    pub backends: BTreeMap<String, BackendConfig>,

    /// Storages, by id.
    #[serde(default)]
    pub storages: BTreeMap<String, StorageConfig>,
}

/// One storage in the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Repositories, by name.
    #[serde(default)]
    pub repositories: BTreeMap<String, RepositoryConfig>,
}

/// One repository in the configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Layout alias, e.g. `Maven 2`.
    pub layout: String,

    /// Root location, e.g. `local://storage0/releases`.
    pub location: Location,

    /// Accepted versions, `mixed` by default.
    #[serde(default)]
    pub policy: RepositoryPolicy,
}

impl ConfigurationFile {
    /// Build the immutable configuration, resolving every layout alias.
    #[tracing::instrument(skip_all)]
    pub fn build(&self, layouts: &LayoutProviderRegistry) -> Result<Configuration, ConfigurationError> {
        let mut configuration = Configuration::new();
        for (id, config) in &self.storages {
            if config.repositories.is_empty() {
                tracing::warn!(storage = %id, "Storage has no repositories");
            }

            let mut storage = Storage::new(id);
            for (name, repository) in &config.repositories {
                storage.add_repository(Repository::new(
                    id,
                    name,
                    &repository.layout,
                    layouts,
                    repository.location.clone(),
                    repository.policy,
                )?)?;
            }
            configuration.add_storage(storage)?;
        }

        tracing::debug!(storages = self.storages.len(), "Built configuration");
        Ok(configuration)
    }

    /// Build every configured storage backend.
    #[tracing::instrument(skip_all)]
    pub fn backends(&self) -> Result<MultiBackend, ConfigurationError> {
        let mut multi = MultiBackend::new();
        for (name, config) in &self.backends {
            let backend = config
                .clone()
                .build()
                .map_err(|source| ConfigurationError::Backend {
                    backend: name.clone(),
                    source,
                })?;
            tracing::debug!(backend = %name, scheme = backend.scheme(), "Configured backend");
            multi.add(backend);
        }
        Ok(multi)
    }
}
