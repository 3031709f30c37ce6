//! Path classification and dispatch.

use axum::extract::{Request, State};
use axum::response::Response;

use super::mutation::{self, MutationRoute};
use super::{assets, response, AppState};

/// Where a request is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/tasks*`: the cached collection.
    Tasks,
    /// One of the PUT mutation routes.
    Mutation(MutationRoute),
    /// Exactly `/refresh`.
    Refresh,
    /// Everything else.
    Asset,
}

/// Mutation prefixes in match order.
const MUTATION_PREFIXES: [(&str, MutationRoute); 5] = [
    ("/done", MutationRoute::Done),
    ("/delete", MutationRoute::Delete),
    ("/modify", MutationRoute::Modify),
    ("/annotate", MutationRoute::Annotate),
    ("/add", MutationRoute::Add),
];

/// Classifies a request path. The first matching prefix wins.
#[must_use]
pub fn classify(path: &str) -> Route {
    if path.starts_with("/tasks") {
        return Route::Tasks;
    }
    let mutation = MUTATION_PREFIXES
        .iter()
        .find(|(prefix, _)| path.starts_with(prefix));
    if let Some((_, route)) = mutation {
        return Route::Mutation(*route);
    }
    if path == "/refresh" {
        return Route::Refresh;
    }
    Route::Asset
}

/// Handles every request.
pub async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let path = request.uri().path().to_owned();
    match classify(&path) {
        Route::Tasks => response::tasks(&state.cache().tasks()),
        Route::Mutation(route) => mutation::handle(&state, route, request).await,
        Route::Refresh => {
            state.refresh_in_background();
            response::accepted()
        }
        Route::Asset => assets::serve(&state, &path).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_match_with_suffixes() {
        assert_eq!(classify("/tasks"), Route::Tasks);
        assert_eq!(classify("/tasks/pending"), Route::Tasks);
        assert_eq!(classify("/tasks.json"), Route::Tasks);
        assert_eq!(classify("/done"), Route::Mutation(MutationRoute::Done));
        assert_eq!(classify("/done/now"), Route::Mutation(MutationRoute::Done));
        assert_eq!(classify("/delete"), Route::Mutation(MutationRoute::Delete));
        assert_eq!(classify("/modify"), Route::Mutation(MutationRoute::Modify));
        assert_eq!(
            classify("/annotate"),
            Route::Mutation(MutationRoute::Annotate)
        );
        assert_eq!(classify("/add"), Route::Mutation(MutationRoute::Add));
        assert_eq!(classify("/additional"), Route::Mutation(MutationRoute::Add));
    }

    #[test]
    fn refresh_is_exact() {
        assert_eq!(classify("/refresh"), Route::Refresh);
        assert_eq!(classify("/refresh/"), Route::Asset);
        assert_eq!(classify("/refreshed"), Route::Asset);
    }

    #[test]
    fn other_paths_fall_through_to_assets() {
        assert_eq!(classify("/"), Route::Asset);
        assert_eq!(classify("/style.css"), Route::Asset);
        assert_eq!(classify("/js/app.js"), Route::Asset);
        assert_eq!(classify("/task"), Route::Asset);
    }
}
