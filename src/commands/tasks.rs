//! `twui tasks` command.

use super::{build_context, resolve_store_config, runtime};
use crate::cli::StoreArgs;

/// Execute the `tasks` command.
///
/// Fetches the collection once through the configured store and prints it
/// as pretty JSON, the same array `/tasks` would serve after a refresh.
///
/// # Errors
///
/// Returns an error string if the fetch fails or times out.
pub fn run(args: &StoreArgs) -> Result<(), String> {
    let config = resolve_store_config(args).map_err(|e| e.to_string())?;
    let ctx = build_context(args.store, &config);
    let deadline = config.collaborator_timeout();

    let tasks = runtime()?.block_on(async {
        tokio::time::timeout(deadline, ctx.fetcher.fetch())
            .await
            .map_err(|_| format!("Task fetch timed out after {deadline:?}"))?
            .map_err(|e| e.to_string())
    })?;

    let json = serde_json::to_string_pretty(&tasks)
        .map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
