//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the HTTP core and an external
//! system (the task store, the shell it runs through, the filesystem).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod shell;
pub mod tasks;

pub use filesystem::FileSystem;
pub use shell::{Invocation, ShellError, ShellExecutor, ShellOutput};
pub use tasks::{FailureKind, FetchError, TaskFetcher, TaskModifier, TaskRecord};
