use axum::{
    Extension,
    extract::{Path, State},
    response::Response,
};

use super::error::ApiError;
use super::flash;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::infrastructure::repositories::proposal_repository::PROPOSAL;
use crate::services;

#[utoipa::path(
    post,
    path = "/entries/{id}/promote/",
    params(
        ("id" = i32, Path, description = "Entry id")
    ),
    responses(
        (status = 303, description = "Proposal created, or login required"),
        (status = 403, description = "User has no employee record"),
        (status = 404, description = "No such entry"),
        (status = 409, description = "Entry already promoted")
    )
)]
pub async fn promote(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let proposal = services::promote_entry(state.db(), id, &claims.sub).await?;

    Ok(flash::redirect_with(
        &PROPOSAL.detail_path(proposal.id),
        &format!("Proposta {} criada!", proposal.num_prop),
    ))
}
