//! Live task store adapter driving the Taskwarrior `task` CLI.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::adapters::payload;
use crate::ports::shell::{Invocation, ShellExecutor};
use crate::ports::tasks::{
    FailureKind, FetchError, FetchFuture, ModifyFuture, TaskFetcher, TaskModifier, TaskRecord,
};

/// Overrides passed on every invocation so the CLI never prompts and
/// always exports a JSON array.
const RC_OVERRIDES: [&str; 3] = [
    "rc.confirmation=off",
    "rc.verbose=nothing",
    "rc.json.array=on",
];

/// Task store backed by the `task` program.
pub struct TaskwarriorCli {
    shell: Arc<dyn ShellExecutor>,
    program: String,
}

impl TaskwarriorCli {
    /// Creates an adapter running `program` through `shell`.
    pub fn new(shell: Arc<dyn ShellExecutor>, program: impl Into<String>) -> Self {
        Self {
            shell,
            program: program.into(),
        }
    }

    fn invocation<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new(self.program.as_str())
            .args(RC_OVERRIDES)
            .args(args)
    }

    async fn export(&self, filter: Option<&Uuid>) -> Result<Vec<TaskRecord>, FetchError> {
        let mut args = Vec::new();
        if let Some(uuid) = filter {
            args.push(uuid.to_string());
        }
        args.push("export".to_string());

        let output = self.shell.run(self.invocation(args)).await?;
        if !output.success() {
            return Err(FetchError::Exit {
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }
        let body = output.stdout.trim();
        if body.is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(body)?)
    }

    /// Returns the stored record for `uuid`, or `bad uuid` if there is none.
    async fn lookup(&self, uuid: &Uuid) -> Result<TaskRecord, FailureKind> {
        let mut tasks = self.export(Some(uuid)).await.map_err(|err| {
            tracing::warn!(%uuid, error = %err, "task lookup failed");
            FailureKind::Internal
        })?;
        if tasks.is_empty() {
            return Err(FailureKind::BadUuid);
        }
        Ok(tasks.swap_remove(0))
    }

    async fn execute(&self, invocation: Invocation) -> Result<(), FailureKind> {
        match self.shell.run(invocation).await {
            Ok(output) if output.success() => Ok(()),
            Ok(output) => {
                tracing::warn!(
                    exit_code = output.exit_code,
                    stderr = %output.stderr.trim(),
                    "task command failed"
                );
                Err(FailureKind::Internal)
            }
            Err(err) => {
                tracing::warn!(error = %err, "task command could not run");
                Err(FailureKind::Internal)
            }
        }
    }

    /// Runs `task <uuid> <command>`, moving the task to `status`.
    ///
    /// The export behind `lookup` includes deleted and completed tasks, so
    /// the stored status decides whether the uuid still names a task that
    /// can make the move.
    async fn close(&self, raw_uuid: &str, command: &str, status: &str) -> Result<(), FailureKind> {
        let uuid = payload::parse_uuid(raw_uuid)?;
        let record = self.lookup(&uuid).await?;
        payload::check_transition(record.get("status").and_then(Value::as_str), status)?;
        let invocation = self.invocation([uuid.to_string(), command.to_string()]);
        self.execute(invocation).await
    }

    async fn import(&self, record: &Value) -> Result<(), FailureKind> {
        let json = serde_json::to_string(record)
            .map_err(|_| FailureKind::MalformedData)?;
        self.execute(self.invocation(["import"]).stdin(json)).await
    }
}

impl TaskFetcher for TaskwarriorCli {
    fn fetch(&self) -> FetchFuture<'_> {
        Box::pin(self.export(None))
    }
}

impl TaskModifier for TaskwarriorCli {
    fn done(&self, uuid: String) -> ModifyFuture<'_, ()> {
        Box::pin(async move { self.close(&uuid, "done", payload::COMPLETED).await })
    }

    fn delete(&self, uuid: String) -> ModifyFuture<'_, ()> {
        Box::pin(async move { self.close(&uuid, "delete", payload::DELETED).await })
    }

    fn modify(&self, patch: TaskRecord) -> ModifyFuture<'_, ()> {
        Box::pin(async move {
            let uuid = payload::modify_target(&patch)?;
            let mut record = self.lookup(&uuid).await?;
            payload::merge_fields(&mut record, patch)?;
            self.import(&record).await
        })
    }

    fn annotate(&self, uuid: String, annotation: String) -> ModifyFuture<'_, ()> {
        Box::pin(async move {
            payload::check_annotation(&annotation)?;
            let uuid = payload::parse_uuid(&uuid)?;
            self.lookup(&uuid).await?;
            // After `--` the CLI stops looking for `rc.*` overrides and
            // `attr:value` modifications.
            let args = [
                uuid.to_string(),
                "annotate".to_string(),
                "--".to_string(),
                annotation,
            ];
            self.execute(self.invocation(args)).await
        })
    }

    fn create(&self, draft: TaskRecord) -> ModifyFuture<'_, TaskRecord> {
        Box::pin(async move {
            let (uuid, fields) = payload::prepare_new_task(draft, Utc::now())?;
            self.import(&Value::Object(fields)).await?;
            // The import succeeded, so a missing record means the store misbehaved.
            self.lookup(&uuid).await.map_err(|_| FailureKind::Internal)
        })
    }
}
