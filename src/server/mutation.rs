//! The PUT mutation routes.
//!
//! All five routes share one pipeline: method check, bounded body
//! buffering, payload parsing, one modifier call under a deadline, then
//! outcome-to-status mapping.

use axum::body::Bytes;
use axum::extract::Request;
use axum::http::header::CONTENT_LENGTH;
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use http_body_util::LengthLimitError;
use serde::Deserialize;

use super::{response, AppState};
use crate::ports::tasks::{FailureKind, TaskModifier, TaskRecord};

/// The mutation routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationRoute {
    /// `/done`
    Done,
    /// `/delete`
    Delete,
    /// `/modify`
    Modify,
    /// `/annotate`
    Annotate,
    /// `/add`
    Add,
}

/// A parsed mutation request.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Complete the task.
    Done {
        /// Target task.
        uuid: String,
    },
    /// Delete the task.
    Delete {
        /// Target task.
        uuid: String,
    },
    /// Apply a task-shaped payload.
    Modify {
        /// Fields to apply, including the target `uuid`.
        payload: TaskRecord,
    },
    /// Annotate the task.
    Annotate {
        /// Target task.
        uuid: String,
        /// Annotation text.
        annotation: String,
    },
    /// Create a task.
    Create {
        /// Fields of the new task.
        payload: TaskRecord,
    },
}

/// What a successful mutation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The change was applied; nothing to return.
    Applied,
    /// A task was created.
    Created(TaskRecord),
}

#[derive(Deserialize)]
struct UuidBody {
    uuid: String,
}

#[derive(Deserialize)]
struct AnnotationBody {
    uuid: String,
    annotation: String,
}

impl Mutation {
    /// Parses the body for `route`.
    ///
    /// # Errors
    ///
    /// Fails when the body is not JSON or lacks the route's required fields.
    pub fn parse(route: MutationRoute, body: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(match route {
            MutationRoute::Done => {
                let UuidBody { uuid } = serde_json::from_slice(body)?;
                Mutation::Done { uuid }
            }
            MutationRoute::Delete => {
                let UuidBody { uuid } = serde_json::from_slice(body)?;
                Mutation::Delete { uuid }
            }
            MutationRoute::Modify => Mutation::Modify {
                payload: serde_json::from_slice(body)?,
            },
            MutationRoute::Annotate => {
                let AnnotationBody { uuid, annotation } = serde_json::from_slice(body)?;
                Mutation::Annotate { uuid, annotation }
            }
            MutationRoute::Add => Mutation::Create {
                payload: serde_json::from_slice(body)?,
            },
        })
    }

    /// Hands the mutation to `modifier`.
    ///
    /// # Errors
    ///
    /// Returns the failure kind reported by the modifier.
    pub async fn apply(self, modifier: &dyn TaskModifier) -> Result<Outcome, FailureKind> {
        let applied = |result: Result<(), FailureKind>| result.map(|()| Outcome::Applied);
        match self {
            Mutation::Done { uuid } => applied(modifier.done(uuid).await),
            Mutation::Delete { uuid } => applied(modifier.delete(uuid).await),
            Mutation::Modify { payload } => applied(modifier.modify(payload).await),
            Mutation::Annotate { uuid, annotation } => {
                applied(modifier.annotate(uuid, annotation).await)
            }
            Mutation::Create { payload } => modifier.create(payload).await.map(Outcome::Created),
        }
    }
}

#[derive(Debug)]
enum BodyError {
    TooLarge,
    Read(axum::BoxError),
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Buffers the request body, refusing anything over `limit` bytes.
async fn read_body(request: Request, limit: usize) -> Result<Bytes, BodyError> {
    let declared = declared_length(request.headers());
    if declared.is_some_and(|length| length > limit) {
        return Err(BodyError::TooLarge);
    }
    let buffered = axum::body::to_bytes(request.into_body(), limit).await;
    buffered.map_err(|err| {
        let inner = err.into_inner();
        if inner.is::<LengthLimitError>() {
            BodyError::TooLarge
        } else {
            BodyError::Read(inner)
        }
    })
}

/// Runs the mutation pipeline for one request.
pub async fn handle(state: &AppState, route: MutationRoute, request: Request) -> Response {
    if request.method() != Method::PUT {
        tracing::debug!(?route, method = %request.method(), "rejected: mutation routes take PUT");
        return response::bad_request();
    }

    let limit = state.config().max_body_bytes;
    let body = match read_body(request, limit).await {
        Ok(body) => body,
        Err(BodyError::TooLarge) => {
            tracing::debug!(?route, limit, "rejected: body too large");
            return response::payload_too_large();
        }
        Err(BodyError::Read(err)) => {
            tracing::debug!(?route, error = %err, "rejected: body could not be read");
            return response::bad_request();
        }
    };

    let mutation = match Mutation::parse(route, &body) {
        Ok(mutation) => mutation,
        Err(err) => {
            tracing::debug!(?route, error = %err, "rejected: malformed body");
            return response::bad_request();
        }
    };

    let deadline = state.config().collaborator_timeout();
    let modifier = state.context().modifier.as_ref();
    let pending = mutation.apply(modifier);
    match tokio::time::timeout(deadline, pending).await {
        Ok(Ok(Outcome::Applied)) => response::no_content(),
        Ok(Ok(Outcome::Created(record))) => response::created(&record),
        Ok(Err(kind)) => {
            if kind == FailureKind::Internal {
                tracing::warn!(?route, "task store reported an internal failure");
            } else {
                tracing::debug!(?route, %kind, "task store rejected the request");
            }
            response::failure(kind)
        }
        Err(_) => {
            tracing::warn!(?route, ?deadline, "task store did not answer in time");
            response::failure(FailureKind::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::adapters::memory::InMemoryTaskStore;

    const ROUTES: [MutationRoute; 5] = [
        MutationRoute::Done,
        MutationRoute::Delete,
        MutationRoute::Modify,
        MutationRoute::Annotate,
        MutationRoute::Add,
    ];

    #[test]
    fn parses_uuid_routes() {
        let body = br#"{"uuid":"abc"}"#;
        let uuid = "abc".to_string();
        assert_eq!(
            Mutation::parse(MutationRoute::Done, body).unwrap(),
            Mutation::Done { uuid: uuid.clone() }
        );
        assert_eq!(
            Mutation::parse(MutationRoute::Delete, body).unwrap(),
            Mutation::Delete { uuid }
        );
    }

    #[test]
    fn parses_annotation() {
        let body = br#"{"uuid":"abc","annotation":"note"}"#;
        let expected = Mutation::Annotate {
            uuid: "abc".to_string(),
            annotation: "note".to_string(),
        };
        assert_eq!(
            Mutation::parse(MutationRoute::Annotate, body).unwrap(),
            expected
        );
    }

    #[test]
    fn free_form_routes_keep_payload() {
        let body = br#"{"uuid":"abc","project":"home"}"#;
        let payload = json!({"uuid": "abc", "project": "home"});
        assert_eq!(
            Mutation::parse(MutationRoute::Modify, body).unwrap(),
            Mutation::Modify { payload }
        );

        let payload = json!({"description": "x"});
        assert_eq!(
            Mutation::parse(MutationRoute::Add, br#"{"description":"x"}"#).unwrap(),
            Mutation::Create { payload }
        );
    }

    #[test]
    fn rejects_invalid_json_on_every_route() {
        for route in ROUTES {
            assert!(Mutation::parse(route, b"{not json").is_err(), "{route:?}");
            assert!(Mutation::parse(route, b"").is_err(), "{route:?}");
        }
    }

    #[test]
    fn rejects_missing_fields() {
        let cases: [(MutationRoute, &[u8]); 3] = [
            (MutationRoute::Done, br#"{"id":"abc"}"#),
            (MutationRoute::Delete, br#"{"uuid":42}"#),
            (MutationRoute::Annotate, br#"{"uuid":"abc"}"#),
        ];
        for (route, body) in cases {
            assert!(Mutation::parse(route, body).is_err(), "{route:?}");
        }
    }

    #[test]
    fn declared_length_reads_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(declared_length(&headers), None);
        headers.insert(CONTENT_LENGTH, "17".parse().unwrap());
        assert_eq!(declared_length(&headers), Some(17));
    }

    #[tokio::test]
    async fn apply_create_returns_record() {
        let store = InMemoryTaskStore::new();
        let mutation = Mutation::Create {
            payload: json!({"description": "buy milk"}),
        };
        let outcome = mutation.apply(&store).await.unwrap();

        let Outcome::Created(record) = outcome else {
            panic!("expected a created record")
        };
        assert_eq!(record["description"], "buy milk");
    }

    #[tokio::test]
    async fn apply_surfaces_failure_kind() {
        let store = InMemoryTaskStore::new();
        let mutation = Mutation::Done {
            uuid: "not-a-uuid".to_string(),
        };
        let result = mutation.apply(&store).await;
        assert_eq!(result, Err(FailureKind::BadUuid));
    }
}
