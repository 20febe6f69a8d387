//! Storages own repositories; each repository is bound to one layout and one location.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use layout::{ArtifactCoordinates, LayoutProvider, LayoutProviderRegistry};
use serde::{Deserialize, Serialize};
use storage::Location;

use crate::error::{ConfigurationError, RepositoryError};

/// Which artifact versions a repository accepts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryPolicy {
    /// Only release versions.
    Release,

    /// Only snapshot versions.
    Snapshot,

    /// Anything.
    #[default]
    Mixed,
}

impl RepositoryPolicy {
    /// Does the policy admit these coordinates?
    pub fn accepts(&self, coordinates: &ArtifactCoordinates) -> bool {
        match self {
            RepositoryPolicy::Release => !coordinates.is_snapshot(),
            RepositoryPolicy::Snapshot => coordinates.is_snapshot(),
            RepositoryPolicy::Mixed => true,
        }
    }
}

impl fmt::Display for RepositoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RepositoryPolicy::Release => "release",
            RepositoryPolicy::Snapshot => "snapshot",
            RepositoryPolicy::Mixed => "mixed",
        })
    }
}

/// A named, layout bound container of artifacts.
///
/// The layout provider is resolved when the repository is created and kept
/// for its lifetime.
#[derive(Debug, Clone)]
pub struct Repository {
    storage: String,
    name: String,
    layout: Arc<dyn LayoutProvider>,
    location: Location,
    policy: RepositoryPolicy,
}

impl Repository {
    /// Create a repository, resolving `layout` in the registry.
    pub fn new(
        storage: impl Into<String>,
        name: impl Into<String>,
        layout: &str,
        layouts: &LayoutProviderRegistry,
        location: Location,
        policy: RepositoryPolicy,
    ) -> Result<Self, ConfigurationError> {
        let storage = storage.into();
        let name = name.into();
        let provider = match layouts.lookup(layout) {
            Ok(provider) => provider,
            Err(source) => {
                return Err(ConfigurationError::UnknownLayout {
                    storage,
                    repository: name,
                    layout: layout.to_owned(),
                    source,
                })
            }
        };

        Ok(Self {
            storage,
            name,
            layout: provider,
            location,
            policy,
        })
    }

    /// Id of the owning storage.
    pub fn storage(&self) -> &str {
        &self.storage
    }

    /// Repository name, unique within its storage.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alias of the bound layout.
    pub fn layout(&self) -> &'static str {
        self.layout.alias()
    }

    /// The bound layout provider.
    pub fn layout_provider(&self) -> &Arc<dyn LayoutProvider> {
        &self.layout
    }

    /// Where the repository keeps its files.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Which versions the repository accepts.
    pub fn policy(&self) -> RepositoryPolicy {
        self.policy
    }
}

/// A named top level container of repositories.
#[derive(Debug, Clone)]
pub struct Storage {
    id: String,
    repositories: BTreeMap<String, Arc<Repository>>,
}

impl Storage {
    /// An empty storage.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            repositories: BTreeMap::new(),
        }
    }

    /// Storage id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add a repository. Names are unique within a storage.
    pub fn add_repository(&mut self, repository: Repository) -> Result<(), ConfigurationError> {
        if self.repositories.contains_key(repository.name()) {
            return Err(ConfigurationError::DuplicateRepository {
                storage: self.id.clone(),
                repository: repository.name().to_owned(),
            });
        }
        self.repositories
            .insert(repository.name().to_owned(), Arc::new(repository));
        Ok(())
    }

    /// Find a repository by name.
    pub fn get_repository(&self, name: &str) -> Result<&Arc<Repository>, RepositoryError> {
        self.repositories
            .get(name)
            .ok_or_else(|| RepositoryError::RepositoryNotFound {
                storage: self.id.clone(),
                repository: name.to_owned(),
            })
    }

    /// Repositories, ordered by name.
    pub fn repositories(&self) -> impl Iterator<Item = &Arc<Repository>> {
        self.repositories.values()
    }
}

/// Every storage a process serves.
///
/// Immutable once built: reconfiguration replaces the whole value.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    storages: BTreeMap<String, Arc<Storage>>,
}

impl Configuration {
    /// A configuration without storages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a storage. Ids are unique.
    pub fn add_storage(&mut self, storage: Storage) -> Result<(), ConfigurationError> {
        if self.storages.contains_key(storage.id()) {
            return Err(ConfigurationError::DuplicateStorage {
                storage: storage.id().to_owned(),
            });
        }
        self.storages
            .insert(storage.id().to_owned(), Arc::new(storage));
        Ok(())
    }

    /// Find a storage by id.
    pub fn get_storage(&self, id: &str) -> Result<&Arc<Storage>, RepositoryError> {
        self.storages
            .get(id)
            .ok_or_else(|| RepositoryError::StorageNotFound {
                storage: id.to_owned(),
            })
    }

    /// Find a repository by storage id and name.
    pub fn get_repository(
        &self,
        storage: &str,
        repository: &str,
    ) -> Result<&Arc<Repository>, RepositoryError> {
        self.get_storage(storage)?.get_repository(repository)
    }

    /// Storages, ordered by id.
    pub fn storages(&self) -> impl Iterator<Item = &Arc<Storage>> {
        self.storages.values()
    }
}
