//! Login requirement for mutating routes

use axum::{
    extract::{Request, State},
    http::Uri,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::session;
use crate::infrastructure::auth::SessionKeys;

pub const LOGIN_PATH: &str = "/accounts/login/";

/// Forward requests carrying a valid session, with their claims in the
/// request extensions; send everyone else to the login page.
pub async fn require_login(
    State(keys): State<SessionKeys>,
    mut req: Request,
    next: Next,
) -> Response {
    match session::claims(req.headers(), &keys) {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => {
            tracing::warn!("Unauthenticated {} {}", req.method(), req.uri().path());
            Redirect::to(&login_redirect(req.uri())).into_response()
        }
    }
}

/// Login URL that returns to `uri` afterwards
pub fn login_redirect(uri: &Uri) -> String {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    format!("{}?next={}", LOGIN_PATH, urlencoding::encode(target))
}
