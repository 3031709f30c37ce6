//! Command dispatch and handlers.

pub mod serve;
pub mod tasks;

use tokio::runtime::Runtime;

use crate::cli::{Command, ServeArgs, StoreArgs, StoreKind};
use crate::config::{ConfigError, ServerConfig};
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Tasks(args) => tasks::run(args),
    }
}

/// Loads the config file named by `args` and applies the store overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the result is invalid.
pub fn resolve_store_config(args: &StoreArgs) -> Result<ServerConfig, ConfigError> {
    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(program) = &args.task_program {
        config.task_program.clone_from(program);
    }
    if let Some(secs) = args.timeout_secs {
        config.collaborator_timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

/// Resolves the full server configuration for `twui serve`.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the result is invalid.
pub fn resolve_serve_config(args: &ServeArgs) -> Result<ServerConfig, ConfigError> {
    let mut config = resolve_store_config(&args.store)?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dir) = &args.public_dir {
        config.public_dir.clone_from(dir);
    }
    if let Some(index) = &args.index_file {
        config.index_file.clone_from(index);
    }
    if let Some(limit) = args.max_body_bytes {
        config.max_body_bytes = limit;
    }
    config.validate()?;
    Ok(config)
}

/// Builds the service context for the chosen store.
#[must_use]
pub fn build_context(store: StoreKind, config: &ServerConfig) -> ServiceContext {
    match store {
        StoreKind::Taskwarrior => ServiceContext::live(&config.task_program),
        StoreKind::Memory => ServiceContext::in_memory(),
    }
}

/// Single-threaded runtime: handlers interleave only at `.await` points.
fn runtime() -> Result<Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))
}
