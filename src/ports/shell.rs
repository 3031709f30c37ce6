//! Shell executor port for running external commands.

use std::future::Future;
use std::pin::Pin;

/// Boxed future type alias used by [`ShellExecutor`] to keep the trait dyn-compatible.
pub type ShellFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ShellOutput, ShellError>> + Send + 'a>>;

/// A program invocation: no shell interpolation happens on `args`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
    /// Data written to the child's standard input, if any.
    pub stdin: Option<String>,
}

impl Invocation {
    /// Creates an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
        }
    }

    /// Appends arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the data piped to standard input.
    #[must_use]
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }
}

/// The output of a command execution.
#[derive(Debug, Clone)]
pub struct ShellOutput {
    /// The exit code of the process.
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl ShellOutput {
    /// Returns `true` when the process exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Failure to run a command at all (as opposed to a non-zero exit).
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// The process could not be spawned.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Writing stdin or collecting output failed.
    #[error("i/o error while running `{program}`: {source}")]
    Io {
        /// Program being run.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Executes external programs.
///
/// Abstracting execution lets the task store adapters be tested without
/// a real `task` binary on the path.
pub trait ShellExecutor: Send + Sync {
    /// Runs the invocation and returns its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or its I/O fails.
    fn run(&self, invocation: Invocation) -> ShellFuture<'_>;
}
