//! Core library entry for the `twui` server.
//!
//! `twui` puts a small JSON API and a static web client in front of a
//! Taskwarrior store:
//!
//! - **`server`**: routing, mutation handling and the static fallback.
//! - **`cache`**: the task snapshot served by `/tasks`.
//! - **`ports`** / **`adapters`**: the task store, shell and filesystem
//!   boundaries and their implementations.
//! - **`cli`** / **`commands`** / **`config`**: the `twui` binary.

pub mod adapters;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod ports;
pub mod server;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version are not failures.
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}
