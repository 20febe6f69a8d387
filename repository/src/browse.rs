//! Directory listings of storages, repositories, and paths within repositories.

use std::sync::Arc;

use camino::Utf8PathBuf;
use storage::{MultiBackend, StorageErrorKind};

use crate::error::RepositoryError;
use crate::listing::{DirectoryListing, FileEntry};
use crate::model::Configuration;

/// Turn a requested path into a path relative to a repository root.
///
/// Empty and `.` segments are dropped. Returns `None` for any path holding a
/// `..` segment or a backslash, whether or not it would leave the root.
pub fn relative_path(path: &str) -> Option<Utf8PathBuf> {
    let mut relative = Utf8PathBuf::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains('\\') => return None,
            s => relative.push(s),
        }
    }
    Some(relative)
}

fn is_miss(kind: StorageErrorKind) -> bool {
    matches!(kind, StorageErrorKind::NotFound | StorageErrorKind::NotADirectory)
}

/// The browsing engine: resolves storages and repositories by name and lists
/// what their storage backend holds.
#[derive(Debug, Clone)]
pub struct Browser {
    configuration: Arc<Configuration>,
    backends: Arc<MultiBackend>,
}

impl Browser {
    /// Browse a configuration through its storage backends.
    pub fn new(configuration: Arc<Configuration>, backends: Arc<MultiBackend>) -> Self {
        Self {
            configuration,
            backends,
        }
    }

    /// The configuration this browser serves.
    pub fn configuration(&self) -> &Arc<Configuration> {
        &self.configuration
    }

    /// The ordered storage ids, as directories.
    pub fn list_storages(&self) -> DirectoryListing {
        DirectoryListing::of_directories(self.configuration.storages().map(|s| s.id()))
    }

    /// The ordered repository names of a storage, as directories.
    pub fn list_repositories(&self, storage: &str) -> Result<DirectoryListing, RepositoryError> {
        let storage = self.configuration.get_storage(storage)?;
        Ok(DirectoryListing::of_directories(
            storage.repositories().map(|r| r.name()),
        ))
    }

    /// List a directory below a repository root.
    ///
    /// Temporary files, lock files and reserved directories are left out.
    /// Metadata and checksum files are listed like any other file.
    #[tracing::instrument(skip(self))]
    pub async fn browse(
        &self,
        storage: &str,
        repository: &str,
        path: &str,
    ) -> Result<DirectoryListing, RepositoryError> {
        let repo = self.configuration.get_repository(storage, repository)?;
        let provider = repo.layout_provider();

        let Some(relative) = relative_path(path) else {
            tracing::debug!("Rejected path with parent segments");
            return Err(RepositoryError::path_not_found(storage, repository, path));
        };
        if provider.is_temporary(&relative) {
            return Err(RepositoryError::path_not_found(storage, repository, path));
        }

        let entries = match self.backends.read_dir(repo.location(), &relative).await {
            Ok(entries) => entries,
            // The root of a configured repository exists before anything is stored in it.
            Err(err) if relative.as_str().is_empty() && is_miss(err.kind()) => {
                tracing::debug!(%err, "Repository root holds nothing yet");
                Vec::new()
            }
            Err(err) => return Err(RepositoryError::from_storage(err, storage, repository, path)),
        };

        let mut directories = Vec::new();
        let mut files = Vec::new();
        for entry in entries {
            if provider.is_temporary(&relative.join(&entry.name)) {
                tracing::trace!(name = %entry.name, "Skipping temporary entry");
                continue;
            }
            if entry.is_dir() {
                directories.push(FileEntry::from(entry));
            } else {
                files.push(FileEntry::from(entry));
            }
        }

        Ok(DirectoryListing::new(directories, files))
    }
}

#[cfg(test)]
mod tests {
    use layout::LayoutProviderRegistry;
    use storage::{LocalDriver, Location, MemoryStorage};

    use super::*;
    use crate::model::{Repository, RepositoryPolicy, Storage};

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn configuration(location: &str) -> Arc<Configuration> {
        let layouts = LayoutProviderRegistry::builtin();
        let location: Location = location.parse().unwrap();

        let mut storage0 = Storage::new("storage0");
        storage0
            .add_repository(
                Repository::new(
                    "storage0",
                    "releases",
                    "Maven 2",
                    &layouts,
                    location.clone(),
                    RepositoryPolicy::Release,
                )
                .unwrap(),
            )
            .unwrap();
        storage0
            .add_repository(
                Repository::new(
                    "storage0",
                    "npm",
                    "npm",
                    &layouts,
                    location,
                    RepositoryPolicy::Mixed,
                )
                .unwrap(),
            )
            .unwrap();

        let mut configuration = Configuration::new();
        configuration.add_storage(storage0).unwrap();
        configuration.add_storage(Storage::new("storage-b")).unwrap();
        Arc::new(configuration)
    }

    async fn memory_browser() -> Browser {
        let memory = MemoryStorage::with_buckets(&["storage0"]);
        for file in [
            "releases/org/example/lib/1.0/lib-1.0.jar",
            "releases/org/example/lib/1.0/lib-1.0.jar.sha1",
            "releases/org/example/lib/1.0/lib-1.0.pom",
            "releases/org/example/lib/1.0/lib-1.0.jar.part",
            "releases/org/example/lib/maven-metadata.xml",
            "releases/org/example/lib/maven-metadata.xml.md5",
            "releases/.trash/org/example/old.jar",
            "releases/.index/segments",
            "releases/b.jar",
            "releases/a.jar",
            "releases/sub/x.txt",
        ] {
            memory.insert("storage0", file, b"data".to_vec()).await;
        }

        Browser::new(
            configuration("memory://storage0/releases"),
            Arc::new(MultiBackend::new().with(memory)),
        )
    }

    #[test]
    fn relative_paths() {
        assert_eq!(relative_path("").unwrap(), "");
        assert_eq!(relative_path("/org//example/./lib/").unwrap(), "org/example/lib");
        assert!(relative_path("..").is_none());
        assert!(relative_path("org/../../etc").is_none());
        assert!(relative_path("org/example/..").is_none());
        assert!(relative_path("org\\..\\etc").is_none());
    }

    #[tokio::test]
    async fn storage_and_repository_levels() {
        let browser = memory_browser().await;

        let storages = browser.list_storages();
        assert_eq!(names(&storages.directories), ["storage-b", "storage0"]);
        assert!(storages.files.is_empty());

        let repositories = browser.list_repositories("storage0").unwrap();
        assert_eq!(names(&repositories.directories), ["npm", "releases"]);

        let empty = browser.list_repositories("storage-b").unwrap();
        assert!(empty.is_empty());

        assert!(matches!(
            browser.list_repositories("storagefoo"),
            Err(RepositoryError::StorageNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn root_listing_sorts_and_hides_reserved_directories() {
        let browser = memory_browser().await;
        let listing = browser.browse("storage0", "releases", "").await.unwrap();

        assert_eq!(names(&listing.directories), ["org", "sub"]);
        assert_eq!(names(&listing.files), ["a.jar", "b.jar"]);
    }

    #[tokio::test]
    async fn leaf_listing_keeps_checksums_and_metadata() {
        let browser = memory_browser().await;

        let listing = browser
            .browse("storage0", "releases", "org/example/lib/1.0")
            .await
            .unwrap();
        assert!(listing.directories.is_empty());
        assert_eq!(
            names(&listing.files),
            ["lib-1.0.jar", "lib-1.0.jar.sha1", "lib-1.0.pom"]
        );
        assert_eq!(listing.files[0].size, Some(4));

        let listing = browser
            .browse("storage0", "releases", "org/example/lib")
            .await
            .unwrap();
        assert_eq!(names(&listing.directories), ["1.0"]);
        assert_eq!(
            names(&listing.files),
            ["maven-metadata.xml", "maven-metadata.xml.md5"]
        );
    }

    #[tokio::test]
    async fn listings_are_deterministic() {
        let browser = memory_browser().await;
        let first = browser.browse("storage0", "releases", "org").await.unwrap();
        let second = browser.browse("storage0", "releases", "org").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn misses_are_not_found() {
        let browser = memory_browser().await;

        let err = browser.browse("storagefoo", "releases", "").await.unwrap_err();
        assert!(matches!(err, RepositoryError::StorageNotFound { .. }));

        let err = browser.browse("storage0", "repofoo", "").await.unwrap_err();
        assert!(matches!(err, RepositoryError::RepositoryNotFound { .. }));

        let err = browser
            .browse("storage0", "releases", "foo/bar")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::PathNotFound { .. }));

        // Files are not directories.
        let err = browser
            .browse("storage0", "releases", "a.jar")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::PathNotFound { .. }));

        let err = browser
            .browse("storage0", "releases", ".trash/org")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::PathNotFound { .. }));

        for err in [
            RepositoryError::path_not_found("s", "r", "p"),
            RepositoryError::StorageNotFound { storage: "s".into() },
        ] {
            assert!(err.is_not_found());
        }
    }

    #[tokio::test]
    async fn empty_repository_root_lists_nothing() {
        // Nothing is stored below the npm repository, and the bucket does not exist.
        let browser = Browser::new(
            configuration("memory://storage0/npm"),
            Arc::new(MultiBackend::new().with(MemoryStorage::new())),
        );

        let listing = browser.browse("storage0", "npm", "").await.unwrap();
        assert!(listing.is_empty());
        let listing = browser.browse("storage0", "npm", "/").await.unwrap();
        assert!(listing.is_empty());

        let err = browser.browse("storage0", "npm", "a").await.unwrap_err();
        assert!(matches!(err, RepositoryError::PathNotFound { .. }));
    }

    #[tokio::test]
    async fn parent_segments_are_rejected_even_when_the_target_exists() {
        let browser = memory_browser().await;
        let err = browser
            .browse("storage0", "releases", "org/../sub")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::PathNotFound { .. }));
    }

    #[tokio::test]
    async fn local_driver_listing() {
        let dir = tempfile::tempdir().unwrap();
        let root = camino::Utf8PathBuf::from_path_buf(dir.path().to_owned()).unwrap();
        let base = root.join("storage0/releases/org/example");
        std::fs::create_dir_all(base.join("sub")).unwrap();
        std::fs::create_dir_all(root.join("storage0/releases/.temp")).unwrap();
        std::fs::write(base.join("b.jar"), b"b").unwrap();
        std::fs::write(base.join("a.jar"), b"a").unwrap();
        std::fs::write(base.join("a.jar.lock"), b"").unwrap();
        std::fs::write(root.join("secret.txt"), b"s").unwrap();

        let browser = Browser::new(
            configuration("local://storage0/releases"),
            Arc::new(MultiBackend::new().with(LocalDriver::new(root))),
        );

        let listing = browser
            .browse("storage0", "releases", "org/example")
            .await
            .unwrap();
        assert_eq!(names(&listing.directories), ["sub"]);
        assert_eq!(names(&listing.files), ["a.jar", "b.jar"]);

        let listing = browser.browse("storage0", "releases", "").await.unwrap();
        assert_eq!(names(&listing.directories), ["org"]);

        let err = browser
            .browse("storage0", "releases", "../../secret.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::PathNotFound { .. }));
    }
}
