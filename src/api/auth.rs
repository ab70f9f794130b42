use axum::{
    Form, Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::session;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::verify_password;
use crate::models::user;

pub const MSG_INVALID_LOGIN: &str =
    "Por favor, entre com um usuário e senha corretos. Note que ambos os campos diferenciam maiúsculas e minúsculas.";

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    username: String,
    password: String,
    next: Option<String>,
}

pub async fn login_form(Query(query): Query<NextQuery>) -> Json<serde_json::Value> {
    Json(login_context(query.next.as_deref(), "", None))
}

#[utoipa::path(
    post,
    path = "/accounts/login/",
    request_body(content = String, content_type = "application/x-www-form-urlencoded",
        description = "username, password and optional next"),
    responses(
        (status = 303, description = "Logged in; session cookie set"),
        (status = 200, description = "Login form with an error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    tracing::info!("Login attempt for user: {}", form.username);

    let user = user::Entity::find()
        .filter(user::Column::Username.eq(&form.username))
        .one(state.db())
        .await?;

    let verified = match &user {
        Some(u) => verify_password(&form.password, &u.password_hash).unwrap_or(false),
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        tracing::warn!("Rejected login for user: {}", form.username);
        return Ok(Json(login_context(
            form.next.as_deref(),
            &form.username,
            Some(MSG_INVALID_LOGIN),
        ))
        .into_response());
    };

    let token = state
        .keys
        .create_token(&user.username, &user.role)
        .map_err(DomainError::Internal)?;
    let cookie = session::set_session(&token)
        .ok_or_else(|| DomainError::Internal("session token is not a valid cookie".to_string()))?;

    let target = form
        .next
        .as_deref()
        .filter(|next| session::is_local_path(next))
        .unwrap_or("/");

    tracing::info!("User {} logged in", user.username);

    let mut response = Redirect::to(target).into_response();
    response.headers_mut().append(header::SET_COOKIE, cookie);
    Ok(response)
}

#[utoipa::path(
    post,
    path = "/accounts/logout/",
    responses(
        (status = 303, description = "Session cookie cleared")
    )
)]
pub async fn logout() -> Response {
    let mut response = Redirect::to("/").into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, session::clear_session());
    response
}

fn login_context(next: Option<&str>, username: &str, error: Option<&str>) -> serde_json::Value {
    json!({
        "action": super::guard::LOGIN_PATH,
        "next": next,
        "values": { "username": username },
        "non_field_errors": error.into_iter().collect::<Vec<_>>(),
    })
}
