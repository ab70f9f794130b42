pub mod auth;
pub mod crud;
pub mod entries;
pub mod error;
pub mod flash;
pub mod guard;
pub mod session;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;

use crate::domain::ResourceRepository;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::SessionKeys;
use crud::Resource;

pub use error::ApiError;

/// Screens of every resource plus login and entry promotion
pub fn router(state: AppState) -> Router {
    let keys = state.keys.clone();

    let mut router = Router::new();
    for repo in state.resources() {
        router = router.merge(resource_routes(repo, keys.clone()));
    }

    let promote = Router::new()
        .route("/entries/:id/promote/", post(entries::promote))
        .route_layer(from_fn_with_state(keys, guard::require_login));

    router.merge(
        Router::new()
            .route(guard::LOGIN_PATH, get(auth::login_form).post(auth::login))
            .route("/accounts/logout/", post(auth::logout))
            .merge(promote)
            .with_state(state),
    )
}

/// List and detail are public; new and edit require a session.
fn resource_routes(repo: Arc<dyn ResourceRepository>, keys: SessionKeys) -> Router {
    let descriptor = repo.descriptor();
    let base = descriptor.base_path;

    let guarded = Router::new()
        .route(&format!("{}/new/", base), get(crud::new_form).post(crud::create))
        .route(
            &format!("{}/:id/edit/", base),
            get(crud::edit_form).post(crud::update),
        )
        .route_layer(from_fn_with_state(keys, guard::require_login));

    Router::new()
        .route(&format!("{}/", base), get(crud::list))
        .route(&format!("{}/:id/", base), get(crud::detail))
        .merge(guarded)
        .with_state(Resource(repo))
}
