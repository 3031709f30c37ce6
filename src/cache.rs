//! Snapshot of the task collection served by `/tasks`.
//!
//! The cache is replaced wholesale by a successful refresh and never
//! touched by mutations, so readers may observe stale data until the next
//! refresh. Every refresh takes a generation number when it starts; a
//! result is only stored if no later refresh has been stored already.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::ports::tasks::{FetchError, TaskFetcher, TaskRecord};

/// Contents of the cache.
#[derive(Debug, Clone, Default)]
pub enum CacheState {
    /// No fetch has succeeded yet.
    #[default]
    Unset,
    /// The newest successfully fetched collection.
    Populated {
        /// Tasks in store order.
        tasks: Arc<Vec<TaskRecord>>,
        /// Generation of the refresh that produced `tasks`.
        generation: u64,
    },
}

/// What a successful fetch did to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched collection is now served.
    Replaced {
        /// Number of tasks stored.
        count: usize,
    },
    /// A refresh started later had already been stored; this result was dropped.
    Superseded {
        /// Number of tasks fetched.
        count: usize,
    },
}

/// Shared handle to the cached task collection.
#[derive(Debug, Clone, Default)]
pub struct TaskCache {
    state: Arc<RwLock<CacheState>>,
    started: Arc<AtomicU64>,
}

impl TaskCache {
    /// Creates an unset cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> CacheState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the cached tasks, or an empty collection when unset.
    #[must_use]
    pub fn tasks(&self) -> Arc<Vec<TaskRecord>> {
        match self.state() {
            CacheState::Unset => Arc::default(),
            CacheState::Populated { tasks, .. } => tasks,
        }
    }

    fn next_generation(&self) -> u64 {
        self.started.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Stores `tasks` unless a later generation is already stored.
    fn replace(&self, tasks: Vec<TaskRecord>, generation: u64) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let CacheState::Populated { generation: stored, .. } = &*state {
            if *stored > generation {
                return false;
            }
        }
        *state = CacheState::Populated {
            tasks: Arc::new(tasks),
            generation,
        };
        true
    }

    async fn refresh_as(
        &self,
        generation: u64,
        fetcher: &dyn TaskFetcher,
        deadline: Duration,
    ) -> Result<RefreshOutcome, FetchError> {
        let tasks = tokio::time::timeout(deadline, fetcher.fetch())
            .await
            .map_err(|_| FetchError::TimedOut(deadline))??;
        let count = tasks.len();
        if self.replace(tasks, generation) {
            Ok(RefreshOutcome::Replaced { count })
        } else {
            Ok(RefreshOutcome::Superseded { count })
        }
    }

    /// Fetches the collection and, on success, replaces the cache with it.
    ///
    /// On failure or when `deadline` passes the cache is left as it was.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure, or [`FetchError::TimedOut`].
    pub async fn refresh(
        &self,
        fetcher: &dyn TaskFetcher,
        deadline: Duration,
    ) -> Result<RefreshOutcome, FetchError> {
        let generation = self.next_generation();
        self.refresh_as(generation, fetcher, deadline).await
    }

    /// Starts a refresh in the background and returns immediately.
    ///
    /// The generation is taken before spawning, so refreshes are ordered by
    /// when they were requested. The outcome is only logged.
    pub fn spawn_refresh(
        &self,
        fetcher: Arc<dyn TaskFetcher>,
        deadline: Duration,
    ) -> JoinHandle<()> {
        let cache = self.clone();
        let generation = self.next_generation();
        tokio::spawn(async move {
            match cache
                .refresh_as(generation, fetcher.as_ref(), deadline)
                .await
            {
                Ok(RefreshOutcome::Replaced { count }) => {
                    tracing::info!(count, generation, "task cache refreshed");
                }
                Ok(RefreshOutcome::Superseded { count }) => {
                    tracing::debug!(count, generation, "stale refresh result dropped");
                }
                Err(err) => {
                    tracing::error!(error = %err, generation, "task cache refresh failed");
                }
            }
        })
    }
}
