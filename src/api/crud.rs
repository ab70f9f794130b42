//! Generic list/detail/create/update screens
//!
//! Every handler is bound to one resource through its router state; the
//! resource decides the query, the form schema and the messages.

use axum::{
    Form, Json,
    extract::{Path, RawQuery, State},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;

use super::error::ApiError;
use super::flash::{self, Flash};
use crate::domain::{
    Choices, DomainError, FieldErrors, FormValues, ListParams, ResourceDescriptor,
    ResourceRepository,
};

/// Router state of one resource's screens
#[derive(Clone)]
pub struct Resource(pub Arc<dyn ResourceRepository>);

#[utoipa::path(
    get,
    path = "/{resource}/",
    params(
        ("resource" = String, Path, description = "people, customers, works, entries, proposals or contracts"),
        ("search_box" = Option<String>, Query, description = "Free-text filter"),
        ("page" = Option<u64>, Query, description = "1-based page number"),
    ),
    responses(
        (status = 200, description = "One page of the filtered list")
    )
)]
pub async fn list(
    State(Resource(repo)): State<Resource>,
    flash: Flash,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let params = ListParams::from_query(query.as_deref());
    let page = repo.list(&params).await?;
    let descriptor = repo.descriptor();

    let mut context = serde_json::to_value(&page)?;
    if let Some(obj) = context.as_object_mut() {
        obj.insert("resource".to_string(), json!(descriptor.name));
        obj.insert("new_url".to_string(), json!(descriptor.new_path()));
    }

    Ok(flash.render(context))
}

#[utoipa::path(
    get,
    path = "/{resource}/{id}/",
    params(
        ("resource" = String, Path, description = "people, customers, works, entries, proposals or contracts"),
        ("id" = i32, Path, description = "Record id"),
    ),
    responses(
        (status = 200, description = "The record with its related display fields"),
        (status = 404, description = "No such record")
    )
)]
pub async fn detail(
    State(Resource(repo)): State<Resource>,
    flash: Flash,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let object = repo.find(id).await?.ok_or(DomainError::NotFound)?;
    let descriptor = repo.descriptor();

    Ok(flash.render(json!({
        "resource": descriptor.name,
        "object": object,
        "edit_url": descriptor.edit_path(id),
        "list_url": descriptor.list_path(),
    })))
}

pub async fn new_form(State(Resource(repo)): State<Resource>) -> Result<Response, ApiError> {
    let descriptor = repo.descriptor();
    let choices = repo.choices().await?;

    Ok(Json(form_context(
        descriptor,
        descriptor.new_path(),
        None,
        &FormValues::new(),
        &FieldErrors::new(),
        &choices,
    ))
    .into_response())
}

pub async fn create(
    State(Resource(repo)): State<Resource>,
    Form(values): Form<FormValues>,
) -> Result<Response, ApiError> {
    let descriptor = repo.descriptor();

    match repo.create(&values).await {
        Ok(_) => Ok(flash::redirect_with(
            &descriptor.list_path(),
            descriptor.created_message,
        )),
        Err(DomainError::Validation(errors)) => {
            let choices = repo.choices().await?;
            Ok(Json(form_context(
                descriptor,
                descriptor.new_path(),
                None,
                &values,
                &errors,
                &choices,
            ))
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_form(
    State(Resource(repo)): State<Resource>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let descriptor = repo.descriptor();
    let values = repo.form_values(id).await?.ok_or(DomainError::NotFound)?;
    let choices = repo.choices().await?;

    Ok(Json(form_context(
        descriptor,
        descriptor.edit_path(id),
        Some(id),
        &values,
        &FieldErrors::new(),
        &choices,
    ))
    .into_response())
}

pub async fn update(
    State(Resource(repo)): State<Resource>,
    Path(id): Path<i32>,
    Form(values): Form<FormValues>,
) -> Result<Response, ApiError> {
    let descriptor = repo.descriptor();

    match repo.update(id, &values).await {
        Ok(()) => Ok(flash::redirect_with(
            &descriptor.list_path(),
            descriptor.updated_message,
        )),
        Err(DomainError::Validation(errors)) => {
            let choices = repo.choices().await?;
            Ok(Json(form_context(
                descriptor,
                descriptor.edit_path(id),
                Some(id),
                &values,
                &errors,
                &choices,
            ))
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

fn form_context(
    descriptor: &ResourceDescriptor,
    action: String,
    object_id: Option<i32>,
    values: &FormValues,
    errors: &FieldErrors,
    choices: &Choices,
) -> Value {
    json!({
        "resource": descriptor.name,
        "action": action,
        "object_id": object_id,
        "fields": descriptor.fields,
        "values": values,
        "errors": errors,
        "choices": choices,
    })
}
