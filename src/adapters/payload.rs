//! Payload validation shared by the task store adapters.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::ports::tasks::{FailureKind, TaskRecord};

/// Timestamp layout Taskwarrior uses for `entry`, `modified` and annotations.
pub const TASK_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Status of a task that has been marked done.
pub const COMPLETED: &str = "completed";

/// Status of a task that has been deleted.
pub const DELETED: &str = "deleted";

/// Formats a timestamp the way the store writes dates.
#[must_use]
pub fn task_date(at: DateTime<Utc>) -> String {
    at.format(TASK_DATE_FORMAT).to_string()
}

/// Parses a task identifier.
///
/// # Errors
///
/// Returns [`FailureKind::BadUuid`] when `raw` is not a UUID.
pub fn parse_uuid(raw: &str) -> Result<Uuid, FailureKind> {
    let raw = raw.trim();
    Uuid::parse_str(raw).map_err(|_| FailureKind::BadUuid)
}

/// Checks that a task whose status is `current` can be moved to `target`.
///
/// Deleted tasks accept no further transitions, and a task cannot be moved
/// to the status it already has.
///
/// # Errors
///
/// Returns [`FailureKind::BadUuid`] when the uuid no longer names a task
/// that can make the transition.
pub fn check_transition(current: Option<&str>, target: &str) -> Result<(), FailureKind> {
    match current {
        Some(DELETED) => Err(FailureKind::BadUuid),
        Some(status) if status == target => Err(FailureKind::BadUuid),
        _ => Ok(()),
    }
}

/// Extracts the target of a modify payload.
///
/// # Errors
///
/// [`FailureKind::MalformedData`] when the payload is not an object with a
/// string `uuid`; [`FailureKind::BadUuid`] when that string is not a UUID.
pub fn modify_target(payload: &TaskRecord) -> Result<Uuid, FailureKind> {
    let raw = payload
        .as_object()
        .and_then(|fields| fields.get("uuid"))
        .and_then(Value::as_str)
        .ok_or(FailureKind::MalformedData)?;
    parse_uuid(raw)
}

/// Rejects blank annotations.
///
/// # Errors
///
/// Returns [`FailureKind::MalformedData`] for empty or whitespace-only text.
pub fn check_annotation(annotation: &str) -> Result<(), FailureKind> {
    if annotation.trim().is_empty() {
        return Err(FailureKind::MalformedData);
    }
    Ok(())
}

/// Validates a create payload and fills in the fields the store requires.
///
/// The caller-supplied object must carry a non-empty `description` and must
/// not carry a `uuid`. A fresh v4 uuid is assigned; `status` defaults to
/// `pending` and `entry` to `now`.
///
/// # Errors
///
/// Returns [`FailureKind::MalformedData`] when the payload has the wrong shape.
pub fn prepare_new_task(
    payload: TaskRecord,
    now: DateTime<Utc>,
) -> Result<(Uuid, Map<String, Value>), FailureKind> {
    let Value::Object(mut fields) = payload else {
        return Err(FailureKind::MalformedData);
    };
    let has_description = fields
        .get("description")
        .and_then(Value::as_str)
        .is_some_and(|description| !description.trim().is_empty());
    if !has_description || fields.contains_key("uuid") {
        return Err(FailureKind::MalformedData);
    }

    let uuid = Uuid::new_v4();
    fields.insert("uuid".to_string(), Value::String(uuid.to_string()));
    fields
        .entry("status")
        .or_insert_with(|| Value::String("pending".to_string()));
    fields
        .entry("entry")
        .or_insert_with(|| Value::String(task_date(now)));
    Ok((uuid, fields))
}

/// Overlays `patch` onto `base`, field by field.
///
/// # Errors
///
/// Returns [`FailureKind::MalformedData`] unless both values are objects.
pub fn merge_fields(base: &mut TaskRecord, patch: TaskRecord) -> Result<(), FailureKind> {
    let (Some(target), Value::Object(patch)) = (base.as_object_mut(), patch) else {
        return Err(FailureKind::MalformedData);
    };
    for (key, value) in patch {
        target.insert(key, value);
    }
    Ok(())
}
