//! Static file fallback for the browser client.

use std::path::{Component, Path, PathBuf};

use axum::response::Response;

use super::{response, AppState};

/// Maps a request path to a file under `root`.
///
/// `/` maps to `index`. Paths that would leave `root` resolve to nothing.
#[must_use]
pub fn resolve(root: &Path, index: &Path, request_path: &str) -> Option<PathBuf> {
    if request_path == "/" {
        return Some(index.to_path_buf());
    }
    let relative = Path::new(request_path.trim_start_matches('/'));
    let mut components = relative.components().peekable();
    components.peek()?;
    if !components.all(|component| matches!(component, Component::Normal(_))) {
        return None;
    }
    Some(root.join(relative))
}

/// Serves the file for `request_path`, or a 404.
pub async fn serve(state: &AppState, request_path: &str) -> Response {
    let config = state.config();
    let index = config.index_path();
    let Some(path) = resolve(&config.public_dir, &index, request_path) else {
        tracing::debug!(request_path, "rejected: path escapes the public root");
        return response::not_found();
    };
    match state.context().fs.read(path.clone()).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            response::asset(bytes, mime.as_ref())
        }
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "static asset unavailable");
            response::not_found()
        }
    }
}
