//! Chunk sources
//!
//! [`FileSource`] reads the real tailed file; [`MemorySource`] is an
//! append-only in-memory stand-in used to drive the watcher in tests.

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{ChunkSource, ContractError};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, instrument};

/// Read-only handle on the tailed file
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: File,
}

impl FileSource {
    /// Open the file for reading
    ///
    /// # Errors
    /// [`ContractError::FileOpen`] if the path cannot be opened or names a directory
    #[instrument(name = "file_source_open", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .await
            .map_err(|e| ContractError::file_open(&path, e))?;

        let metadata = file
            .metadata()
            .await
            .map_err(|e| ContractError::file_open(&path, e))?;
        if metadata.is_dir() {
            return Err(ContractError::file_open(
                &path,
                io::Error::new(io::ErrorKind::InvalidInput, "is a directory"),
            ));
        }

        debug!(path = %path.display(), len = metadata.len(), "file opened");
        Ok(Self { path, file })
    }

    /// Path the source was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChunkSource for FileSource {
    async fn size(&mut self) -> io::Result<u64> {
        Ok(self.file.metadata().await?.len())
    }

    async fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.file.seek(SeekFrom::Start(offset)).await?;

        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]).await {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

/// In-memory append-only source
///
/// Clones share the same buffer, so a test can keep one handle to append to
/// while the watcher owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    data: Vec<u8>,
    failing_reads: usize,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source with pre-existing content
    pub fn with_content(content: impl AsRef<[u8]>) -> Self {
        let source = Self::new();
        source.append(content);
        source
    }

    /// Append bytes at the end
    pub fn append(&self, bytes: impl AsRef<[u8]>) {
        self.lock().data.extend_from_slice(bytes.as_ref());
    }

    /// Make the next `count` reads fail
    pub fn fail_next_reads(&self, count: usize) {
        self.lock().failing_reads = count;
    }

    /// Current content length
    pub fn len(&self) -> usize {
        self.lock().data.len()
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChunkSource for MemorySource {
    async fn size(&mut self) -> io::Result<u64> {
        Ok(self.lock().data.len() as u64)
    }

    async fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let mut inner = self.lock();
        if inner.failing_reads > 0 {
            inner.failing_reads -= 1;
            return Err(io::Error::other("injected read failure"));
        }

        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        if start >= inner.data.len() {
            return Ok(0);
        }
        let available = &inner.data[start..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_memory_source_reads_by_offset() {
        let mut source = MemorySource::with_content(b"hello world");
        let mut buf = [0u8; 5];

        assert_eq!(source.read_at(0, &mut buf).await.unwrap(), 5);
        assert_eq!(&buf, b"hello");
        assert_eq!(source.read_at(6, &mut buf).await.unwrap(), 5);
        assert_eq!(&buf, b"world");
        assert_eq!(source.read_at(11, &mut buf).await.unwrap(), 0);
        assert_eq!(source.read_at(99, &mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_memory_source_shared_append() {
        let mut source = MemorySource::new();
        let writer = source.clone();
        assert_eq!(source.size().await.unwrap(), 0);

        writer.append(b"abc");
        assert_eq!(source.size().await.unwrap(), 3);
        assert_eq!(source.len(), 3);
    }

    #[tokio::test]
    async fn test_memory_source_injected_failures() {
        let mut source = MemorySource::with_content(b"data");
        source.fail_next_reads(2);
        let mut buf = [0u8; 4];

        assert!(source.read_at(0, &mut buf).await.is_err());
        assert!(source.read_at(0, &mut buf).await.is_err());
        assert_eq!(source.read_at(0, &mut buf).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_file_source_sees_appends() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"first\n").unwrap();
        file.flush().unwrap();

        let mut source = FileSource::open(file.path()).await.unwrap();
        assert_eq!(source.size().await.unwrap(), 6);

        file.write_all(b"second\n").unwrap();
        file.flush().unwrap();
        assert_eq!(source.size().await.unwrap(), 13);

        let mut buf = vec![0u8; 64];
        let n = source.read_at(6, &mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"second\n");
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::open(dir.path().join("nope.log"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::FileOpen { .. }));
    }

    #[tokio::test]
    async fn test_file_source_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, ContractError::FileOpen { .. }));
    }
}
