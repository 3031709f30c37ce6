//! Shared test doubles and request helpers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use twui::config::ServerConfig;
use twui::context::ServiceContext;
use twui::ports::filesystem::{FileSystem, ReadFuture};
use twui::ports::tasks::{
    FailureKind, FetchError, FetchFuture, ModifyFuture, TaskFetcher, TaskModifier, TaskRecord,
};
use twui::server::AppState;

/// A store call, as seen by [`ScriptedStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch,
    Done(String),
    Delete(String),
    Modify(TaskRecord),
    Annotate(String, String),
    Create(TaskRecord),
}

/// How [`ScriptedStore::fetch`] answers.
#[derive(Debug, Clone)]
pub enum FetchReply {
    Tasks(Vec<TaskRecord>),
    Fail,
    Stall,
}

/// Task store double that records every call and answers from a script.
#[derive(Debug)]
pub struct ScriptedStore {
    fetch: FetchReply,
    failure: Option<FailureKind>,
    created: Option<TaskRecord>,
    stall_mutations: bool,
    calls: Mutex<Vec<Call>>,
}

impl Default for ScriptedStore {
    fn default() -> Self {
        Self {
            fetch: FetchReply::Tasks(Vec::new()),
            failure: None,
            created: None,
            stall_mutations: false,
            calls: Mutex::default(),
        }
    }
}

impl ScriptedStore {
    pub fn with_tasks(tasks: Vec<TaskRecord>) -> Self {
        Self {
            fetch: FetchReply::Tasks(tasks),
            ..Self::default()
        }
    }

    pub fn fetch_reply(mut self, reply: FetchReply) -> Self {
        self.fetch = reply;
        self
    }

    pub fn failing_with(mut self, kind: FailureKind) -> Self {
        self.failure = Some(kind);
        self
    }

    pub fn creating(mut self, record: TaskRecord) -> Self {
        self.created = Some(record);
        self
    }

    pub fn stalling_mutations(mut self) -> Self {
        self.stall_mutations = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| *call != Call::Fetch)
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn reply<T: Send + 'static>(&self, value: T) -> ModifyFuture<'_, T> {
        if self.stall_mutations {
            return Box::pin(std::future::pending());
        }
        let result = match self.failure {
            Some(kind) => Err(kind),
            None => Ok(value),
        };
        Box::pin(async move { result })
    }
}

impl TaskFetcher for ScriptedStore {
    fn fetch(&self) -> FetchFuture<'_> {
        self.record(Call::Fetch);
        match self.fetch.clone() {
            FetchReply::Tasks(tasks) => Box::pin(async move { Ok(tasks) }),
            FetchReply::Fail => Box::pin(async {
                Err(FetchError::Exit {
                    exit_code: 1,
                    stderr: "store unavailable".to_string(),
                })
            }),
            FetchReply::Stall => Box::pin(std::future::pending()),
        }
    }
}

impl TaskModifier for ScriptedStore {
    fn done(&self, uuid: String) -> ModifyFuture<'_, ()> {
        self.record(Call::Done(uuid));
        self.reply(())
    }

    fn delete(&self, uuid: String) -> ModifyFuture<'_, ()> {
        self.record(Call::Delete(uuid));
        self.reply(())
    }

    fn modify(&self, payload: TaskRecord) -> ModifyFuture<'_, ()> {
        self.record(Call::Modify(payload));
        self.reply(())
    }

    fn annotate(&self, uuid: String, annotation: String) -> ModifyFuture<'_, ()> {
        self.record(Call::Annotate(uuid, annotation));
        self.reply(())
    }

    fn create(&self, payload: TaskRecord) -> ModifyFuture<'_, TaskRecord> {
        self.record(Call::Create(payload.clone()));
        let record = self.created.clone().unwrap_or(payload);
        self.reply(record)
    }
}

/// Files held in memory, keyed by path.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryFileSystem {
    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        let bytes = contents.as_bytes().to_vec();
        self.files.insert(PathBuf::from(path), bytes);
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: PathBuf) -> ReadFuture<'_> {
        let result = self
            .files
            .get(&path)
            .cloned()
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound));
        Box::pin(async move { result })
    }
}

pub const INDEX_HTML: &str = "<html><body>twui</body></html>";
pub const STYLE_CSS: &str = "body { margin: 0; }";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        max_body_bytes: 1024,
        collaborator_timeout_secs: 5,
        ..ServerConfig::default()
    }
}

/// App state over `store`, with `public/index.html` and `public/style.css`.
pub fn state_with(store: &Arc<ScriptedStore>) -> AppState {
    let fs = MemoryFileSystem::default()
        .with_file("public/index.html", INDEX_HTML)
        .with_file("public/style.css", STYLE_CSS);
    let ctx = ServiceContext::with_store(store.clone());
    let ctx = ctx.with_fs(Arc::new(fs));
    AppState::new(ctx, test_config())
}

pub fn request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn put(uri: &str, body: &str) -> Request<Body> {
    request("PUT", uri, body)
}

pub fn get(uri: &str) -> Request<Body> {
    request("GET", uri, "")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get("content-type")
            .map_or("", |value| value.to_str().unwrap())
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body,
    }
}
