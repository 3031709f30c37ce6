//! Live filesystem adapter using `tokio::fs`.

use std::path::PathBuf;

use crate::ports::filesystem::{FileSystem, ReadFuture};

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read(&self, path: PathBuf) -> ReadFuture<'_> {
        Box::pin(async move { tokio::fs::read(&path).await })
    }
}
