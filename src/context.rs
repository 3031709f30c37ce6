//! Service context bundling all port trait objects.

use std::sync::Arc;

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::shell::LiveShellExecutor;
use crate::adapters::live::taskwarrior::TaskwarriorCli;
use crate::adapters::memory::InMemoryTaskStore;
use crate::ports::filesystem::FileSystem;
use crate::ports::tasks::{TaskFetcher, TaskModifier};

/// Bundles the external boundaries the server talks to.
///
/// Fetcher and modifier are usually the same store object seen through two
/// traits.
#[derive(Clone)]
pub struct ServiceContext {
    /// Reads the full task collection.
    pub fetcher: Arc<dyn TaskFetcher>,
    /// Applies mutations.
    pub modifier: Arc<dyn TaskModifier>,
    /// Reads static assets.
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a context backed by the Taskwarrior CLI at `task_program`.
    #[must_use]
    pub fn live(task_program: &str) -> Self {
        let shell = Arc::new(LiveShellExecutor);
        Self::with_store(Arc::new(TaskwarriorCli::new(shell, task_program)))
    }

    /// Creates a context backed by an empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryTaskStore::new()))
    }

    /// Creates a context around any store implementing both task ports.
    #[must_use]
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: TaskFetcher + TaskModifier + 'static,
    {
        Self {
            fetcher: store.clone(),
            modifier: store,
            fs: Arc::new(LiveFileSystem),
        }
    }

    /// Replaces the filesystem adapter.
    #[must_use]
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }
}
