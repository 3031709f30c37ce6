//! Task store ports: fetching the collection and applying mutations.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::ports::shell::ShellError;

/// An opaque task as produced by the store. Key order is preserved.
pub type TaskRecord = serde_json::Value;

/// Boxed future returned by [`TaskFetcher::fetch`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<TaskRecord>, FetchError>> + Send + 'a>>;

/// Boxed future returned by [`TaskModifier`] operations.
pub type ModifyFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FailureKind>> + Send + 'a>>;

/// Closed set of failure kinds a modifier may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum FailureKind {
    /// The store failed for reasons unrelated to the request.
    #[error("internal")]
    Internal,
    /// The uuid is not a UUID or names no known task.
    #[error("bad uuid")]
    BadUuid,
    /// The payload is missing required fields or has the wrong shape.
    #[error("malformed data")]
    MalformedData,
}

/// Why a fetch of the task collection failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The store command could not be run.
    #[error(transparent)]
    Shell(#[from] ShellError),
    /// The store command ran but reported failure.
    #[error("task export exited with status {exit_code}: {stderr}")]
    Exit {
        /// Process exit code.
        exit_code: i32,
        /// Captured standard error.
        stderr: String,
    },
    /// The export was not a JSON array of tasks.
    #[error("failed to parse task export: {0}")]
    Parse(#[from] serde_json::Error),
    /// The fetch did not finish before the deadline.
    #[error("task fetch timed out after {0:?}")]
    TimedOut(Duration),
}

/// Retrieves the complete task collection.
pub trait TaskFetcher: Send + Sync {
    /// Fetches every task, in store order.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the store cannot be read.
    fn fetch(&self) -> FetchFuture<'_>;
}

/// Applies single mutations to the task store.
pub trait TaskModifier: Send + Sync {
    /// Marks a task completed.
    ///
    /// # Errors
    ///
    /// Returns the failure kind reported by the store.
    fn done(&self, uuid: String) -> ModifyFuture<'_, ()>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns the failure kind reported by the store.
    fn delete(&self, uuid: String) -> ModifyFuture<'_, ()>;

    /// Applies a task-shaped payload to the task named by its `uuid` field.
    ///
    /// # Errors
    ///
    /// Returns the failure kind reported by the store.
    fn modify(&self, payload: TaskRecord) -> ModifyFuture<'_, ()>;

    /// Adds an annotation to a task.
    ///
    /// # Errors
    ///
    /// Returns the failure kind reported by the store.
    fn annotate(&self, uuid: String, annotation: String) -> ModifyFuture<'_, ()>;

    /// Creates a task and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns the failure kind reported by the store.
    fn create(&self, payload: TaskRecord) -> ModifyFuture<'_, TaskRecord>;
}
