//! CLI argument definitions.
//!
//! Every flag can also be set through its `TWUI_*` environment variable;
//! flags win over the environment, which wins over the config file.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI parser for `twui`.
#[derive(Debug, Parser)]
#[command(
    name = "twui",
    version,
    about = "Web front-end and JSON API for Taskwarrior"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Fetch the task list once and print it as JSON.
    Tasks(StoreArgs),
}

/// Which task store backs the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// The Taskwarrior `task` CLI.
    #[default]
    Taskwarrior,
    /// An empty in-process store, lost on exit.
    Memory,
}

/// Options shared by every command that talks to the store.
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Task store backend.
    #[arg(
        long,
        value_enum,
        default_value_t = StoreKind::Taskwarrior,
        env = "TWUI_STORE"
    )]
    pub store: StoreKind,
    /// YAML config file.
    #[arg(long, env = "TWUI_CONFIG")]
    pub config: Option<PathBuf>,
    /// Taskwarrior program to run.
    #[arg(long, env = "TWUI_TASK_PROGRAM")]
    pub task_program: Option<String>,
    /// Seconds to wait for any single store call.
    #[arg(long, env = "TWUI_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

/// Options for `twui serve`.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Store options.
    #[command(flatten)]
    pub store: StoreArgs,
    /// Address to bind.
    #[arg(long, env = "TWUI_BIND")]
    pub bind: Option<IpAddr>,
    /// Port to listen on.
    #[arg(long, short, env = "TWUI_PORT")]
    pub port: Option<u16>,
    /// Directory holding the browser client.
    #[arg(long, env = "TWUI_PUBLIC_DIR")]
    pub public_dir: Option<PathBuf>,
    /// Document served for `/`.
    #[arg(long, env = "TWUI_INDEX_FILE")]
    pub index_file: Option<String>,
    /// Largest accepted request body, in bytes.
    #[arg(long, env = "TWUI_MAX_BODY_BYTES")]
    pub max_body_bytes: Option<usize>,
}
