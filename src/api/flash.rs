//! One-shot notifications carried between a redirect and the next page

use axum::{
    Json, async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::Value;
use std::convert::Infallible;

use super::session;

/// Pending flash message of the incoming request, if any
#[derive(Debug, Clone, Default)]
pub struct Flash(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let message = session::cookie(&parts.headers, session::FLASH_COOKIE)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| urlencoding::decode(&raw).ok().map(|m| m.into_owned()));
        Ok(Flash(message))
    }
}

impl Flash {
    /// Render a page context, showing the pending message once.
    pub fn render(self, mut context: Value) -> Response {
        let shown = self.0.is_some();
        if let Some(obj) = context.as_object_mut() {
            obj.insert(
                "messages".to_string(),
                Value::Array(self.0.into_iter().map(Value::String).collect()),
            );
        }

        let mut response = Json(context).into_response();
        if shown {
            response
                .headers_mut()
                .append(header::SET_COOKIE, session::clear_flash());
        }
        response
    }
}

/// 303 to `location`, leaving `message` for the page it lands on.
pub fn redirect_with(location: &str, message: &str) -> Response {
    let mut response = Redirect::to(location).into_response();
    if let Some(cookie) = session::set_flash(message) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}
