use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::DirEntry;

/// One entry of a [`DirectoryListing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Entry name, without leading path components.
    pub name: String,

    /// File size in bytes. Not known for directories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Last modification time, when the backend tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl FileEntry {
    /// An entry carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            last_modified: None,
        }
    }
}

impl From<DirEntry> for FileEntry {
    fn from(entry: DirEntry) -> Self {
        Self {
            name: entry.name,
            size: entry.metadata.as_ref().map(|m| m.size),
            last_modified: entry.metadata.and_then(|m| m.modified),
        }
    }
}

/// The immediate subdirectories and files at one browsed path.
///
/// Both sequences are ordered by name, comparing bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    /// Subdirectories.
    pub directories: Vec<FileEntry>,

    /// Files.
    pub files: Vec<FileEntry>,
}

impl DirectoryListing {
    /// A listing of directories only, e.g. storage or repository names.
    pub fn of_directories<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(FileEntry::named).collect(), Vec::new())
    }

    /// Sort both sequences into listing order.
    pub fn new(mut directories: Vec<FileEntry>, mut files: Vec<FileEntry>) -> Self {
        directories.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        files.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        Self { directories, files }
    }

    /// Split driver entries into directories and files, in listing order.
    pub fn from_entries(entries: impl IntoIterator<Item = DirEntry>) -> Self {
        let (directories, files): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(DirEntry::is_dir);
        Self::new(
            directories.into_iter().map(FileEntry::from).collect(),
            files.into_iter().map(FileEntry::from).collect(),
        )
    }

    /// Does the listing hold nothing?
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }
}
