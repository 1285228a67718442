//! Write-capable filesystem collaborators.
//!
//! Filesystems are name-keyed scopes; every write names the scope the
//! document was opened from. The shell ships the local scope; remote scopes
//! are host implementations of [`DocumentWriter`].

use std::io;
use std::path::Path;

use async_trait::async_trait;

/// Name of the default filesystem scope.
pub const LOCAL_FILESYSTEM: &str = "local";

/// External collaborator that persists document content.
#[async_trait]
pub trait DocumentWriter: Send + Sync {
	/// Writes `content` to `path` within the named filesystem scope.
	async fn write(&self, path: &Path, content: &str, filesystem: &str) -> io::Result<()>;
}

/// Writer backed by the local filesystem.
#[derive(Debug, Default)]
pub struct LocalFilesystemWriter;

#[async_trait]
impl DocumentWriter for LocalFilesystemWriter {
	async fn write(&self, path: &Path, content: &str, filesystem: &str) -> io::Result<()> {
		if filesystem != LOCAL_FILESYSTEM {
			return Err(io::Error::new(
				io::ErrorKind::Unsupported,
				format!("unknown filesystem scope: {filesystem}"),
			));
		}

		if let Some(parent) = path.parent()
			&& !parent.as_os_str().is_empty()
		{
			tokio::fs::create_dir_all(parent).await?;
		}

		tokio::fs::write(path, content).await
	}
}
