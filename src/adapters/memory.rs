//! In-process task store, used by `--store memory` and in tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::adapters::payload;
use crate::ports::tasks::{
    FailureKind, FetchFuture, ModifyFuture, TaskFetcher, TaskModifier, TaskRecord,
};

/// Ordered list of task records held in memory.
///
/// Validation and failure kinds match the Taskwarrior adapter.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: Mutex<Vec<TaskRecord>>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `tasks`.
    #[must_use]
    pub fn with_tasks(tasks: Vec<TaskRecord>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TaskRecord>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `change` to the task named by `uuid`.
    fn update<F>(&self, uuid: &Uuid, change: F) -> Result<(), FailureKind>
    where
        F: FnOnce(&mut Map<String, Value>) -> Result<(), FailureKind>,
    {
        let wanted = uuid.to_string();
        let mut tasks = self.lock();
        let fields = tasks
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|fields| fields.get("uuid").and_then(Value::as_str) == Some(wanted.as_str()))
            .ok_or(FailureKind::BadUuid)?;
        change(fields)?;
        let modified = payload::task_date(Utc::now());
        fields.insert("modified".to_string(), json!(modified));
        Ok(())
    }

    fn close(&self, raw_uuid: &str, status: &str) -> Result<(), FailureKind> {
        let uuid = payload::parse_uuid(raw_uuid)?;
        self.update(&uuid, |fields| {
            payload::check_transition(fields.get("status").and_then(Value::as_str), status)?;
            let now = payload::task_date(Utc::now());
            fields.insert("status".to_string(), json!(status));
            fields.insert("end".to_string(), json!(now));
            Ok(())
        })
    }
}

impl TaskFetcher for InMemoryTaskStore {
    fn fetch(&self) -> FetchFuture<'_> {
        let tasks = self.lock().clone();
        Box::pin(async move { Ok(tasks) })
    }
}

impl TaskModifier for InMemoryTaskStore {
    fn done(&self, uuid: String) -> ModifyFuture<'_, ()> {
        let result = self.close(&uuid, payload::COMPLETED);
        Box::pin(async move { result })
    }

    fn delete(&self, uuid: String) -> ModifyFuture<'_, ()> {
        let result = self.close(&uuid, payload::DELETED);
        Box::pin(async move { result })
    }

    fn modify(&self, patch: TaskRecord) -> ModifyFuture<'_, ()> {
        let result = payload::modify_target(&patch).and_then(|uuid| {
            self.update(&uuid, |fields| {
                let mut current = Value::Object(std::mem::take(fields));
                let merged = payload::merge_fields(&mut current, patch);
                if let Value::Object(restored) = current {
                    *fields = restored;
                }
                merged
            })
        });
        Box::pin(async move { result })
    }

    fn annotate(&self, uuid: String, annotation: String) -> ModifyFuture<'_, ()> {
        let result = payload::check_annotation(&annotation)
            .and_then(|()| payload::parse_uuid(&uuid))
            .and_then(|uuid| {
                self.update(&uuid, |fields| {
                    let entry = json!({
                        "entry": payload::task_date(Utc::now()),
                        "description": annotation,
                    });
                    match fields.entry("annotations").or_insert_with(|| json!([])) {
                        Value::Array(notes) => {
                            notes.push(entry);
                            Ok(())
                        }
                        _ => Err(FailureKind::Internal),
                    }
                })
            });
        Box::pin(async move { result })
    }

    fn create(&self, draft: TaskRecord) -> ModifyFuture<'_, TaskRecord> {
        let result = payload::prepare_new_task(draft, Utc::now()).map(|(_, fields)| {
            let record = Value::Object(fields);
            self.lock().push(record.clone());
            record
        });
        Box::pin(async move { result })
    }
}
