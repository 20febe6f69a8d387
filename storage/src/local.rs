use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use eyre::WrapErr;
use tokio::io::AsyncWriteExt;

use storage_driver::{
    DirEntry, Driver, Metadata, Reader, StorageError, StorageErrorKind, Writer,
};

/// Storage driver backed by a directory on the local filesystem.
///
/// Each bucket is a directory directly below the root.
#[derive(Debug)]
pub struct LocalDriver {
    root: Utf8PathBuf,
    scheme: String,
}

impl LocalDriver {
    /// Create a driver rooted at `root`, answering to the `local` scheme.
    pub fn new(root: Utf8PathBuf) -> Self {
        Self {
            root,
            scheme: "local".into(),
        }
    }

    /// Use a different Uri scheme for this driver.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// The directory holding all buckets.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn path(&self, bucket: &str, remote: &Utf8Path) -> Result<Utf8PathBuf, StorageError> {
        let escapes = remote
            .components()
            .any(|c| !matches!(c, Utf8Component::Normal(_) | Utf8Component::CurDir));
        if escapes || bucket.contains(['/', '\\']) || bucket == ".." {
            return Err(StorageError::builder(
                self.name(),
                StorageErrorKind::InvalidRequest,
                eyre::eyre!("path escapes the bucket root"),
            )
            .bucket(bucket)
            .path(remote.as_str())
            .build());
        }

        let mut path = self.root.join(bucket);
        path.push(remote);
        Ok(path)
    }

    fn error(
        &self,
        err: std::io::Error,
        bucket: &str,
        remote: &Utf8Path,
        context: &'static str,
    ) -> StorageError {
        let kind = err.kind().into();
        StorageError::builder(self.name(), kind, eyre::Report::new(err).wrap_err(context))
            .bucket(bucket)
            .path(remote.as_str())
            .build()
    }
}

fn metadata_from_fs(metadata: &std::fs::Metadata) -> Metadata {
    Metadata {
        size: metadata.len(),
        modified: metadata.modified().ok().map(Into::into),
    }
}

#[async_trait::async_trait]
impl Driver for LocalDriver {
    fn name(&self) -> &'static str {
        "local"
    }

    fn scheme(&self) -> &str {
        &self.scheme
    }

    async fn metadata(&self, bucket: &str, remote: &Utf8Path) -> Result<Metadata, StorageError> {
        let path = self.path(bucket, remote)?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|err| self.error(err, bucket, remote, "local driver: metadata"))?;
        Ok(metadata_from_fs(&metadata))
    }

    async fn read_dir(
        &self,
        bucket: &str,
        remote: &Utf8Path,
    ) -> Result<Vec<DirEntry>, StorageError> {
        let path = self.path(bucket, remote)?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|err| self.error(err, bucket, remote, "local driver: stat directory"))?;
        if !metadata.is_dir() {
            return Err(StorageError::builder(
                self.name(),
                StorageErrorKind::NotADirectory,
                eyre::eyre!("{path} is not a directory"),
            )
            .bucket(bucket)
            .path(remote.as_str())
            .build());
        }

        let mut reader = tokio::fs::read_dir(&path)
            .await
            .map_err(|err| self.error(err, bucket, remote, "local driver: read_dir"))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|err| self.error(err, bucket, remote, "local driver: next_entry"))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                tracing::warn!(dir = %path, "Skipping entry with a non UTF-8 name");
                continue;
            };

            let metadata = entry
                .metadata()
                .await
                .map_err(|err| self.error(err, bucket, remote, "local driver: entry metadata"))?;

            if metadata.is_dir() {
                entries.push(DirEntry::directory(name));
            } else {
                entries.push(DirEntry::file(name, metadata_from_fs(&metadata)));
            }
        }

        tracing::debug!("Found {} entries", entries.len());
        Ok(entries)
    }

    async fn upload(
        &self,
        bucket: &str,
        remote: &Utf8Path,
        local: &mut Reader<'_>,
    ) -> Result<(), StorageError> {
        let path = self.path(bucket, remote)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.error(err, bucket, remote, "create_dir_all"))?;
        }

        let mut writer = tokio::io::BufWriter::new(
            tokio::fs::File::create(&path)
                .await
                .map_err(|err| self.error(err, bucket, remote, "local: create remote file"))?,
        );

        tokio::io::copy(local, &mut writer)
            .await
            .map_err(|err| self.error(err, bucket, remote, "copy"))?;

        writer
            .shutdown()
            .await
            .map_err(|err| self.error(err, bucket, remote, "shutdown writer"))?;
        Ok(())
    }

    async fn download(
        &self,
        bucket: &str,
        remote: &Utf8Path,
        local: &mut Writer<'_>,
    ) -> Result<(), StorageError> {
        let path = self.path(bucket, remote)?;

        let mut reader = tokio::io::BufReader::new(
            tokio::fs::File::open(&path)
                .await
                .map_err(|err| self.error(err, bucket, remote, "local: open remote file"))?,
        );

        tokio::io::copy(&mut reader, local)
            .await
            .map_err(|err| self.error(err, bucket, remote, "copy"))?;

        local
            .flush()
            .await
            .map_err(|err| self.error(err, bucket, remote, "flush writer"))?;

        Ok(())
    }

    async fn delete(&self, bucket: &str, remote: &Utf8Path) -> Result<(), StorageError> {
        let path = self.path(bucket, remote)?;
        tokio::fs::remove_file(path)
            .await
            .map_err(|err| self.error(err, bucket, remote, "remove_file"))?;
        Ok(())
    }
}
