//! Live shell executor using `tokio::process::Command`.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::ports::shell::{Invocation, ShellError, ShellExecutor, ShellFuture, ShellOutput};

/// Live executor that spawns real child processes.
///
/// Children are killed when the returned future is dropped, so a caller
/// enforcing a deadline does not leak processes.
pub struct LiveShellExecutor;

impl ShellExecutor for LiveShellExecutor {
    fn run(&self, invocation: Invocation) -> ShellFuture<'_> {
        Box::pin(async move {
            let Invocation { program, args, stdin } = invocation;
            let input_mode = if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            };
            let mut child = Command::new(&program)
                .args(&args)
                .stdin(input_mode)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| ShellError::Spawn {
                    program: program.clone(),
                    source,
                })?;

            if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
                pipe.write_all(input.as_bytes())
                    .await
                    .map_err(|source| ShellError::Io {
                        program: program.clone(),
                        source,
                    })?;
                // Closing the pipe signals EOF to the child.
                drop(pipe);
            }

            let output = child
                .wait_with_output()
                .await
                .map_err(|source| ShellError::Io {
                    program: program.clone(),
                    source,
                })?;
            Ok(ShellOutput {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}
