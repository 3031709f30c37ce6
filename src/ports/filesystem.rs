//! Filesystem port for reading static assets.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;

/// Boxed future returned by [`FileSystem::read`].
pub type ReadFuture<'a> = Pin<Box<dyn Future<Output = io::Result<Vec<u8>>> + Send + 'a>>;

/// Provides read access to files on disk.
///
/// Abstracting the filesystem lets the asset fallback be tested without
/// touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    fn read(&self, path: PathBuf) -> ReadFuture<'_>;
}
