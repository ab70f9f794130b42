use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::crud::list,
        api::crud::detail,
        api::auth::login,
        api::auth::logout,
        api::entries::promote,
    ),
    tags(
        (name = "bizdesk", description = "bizdesk screens")
    )
)]
pub struct ApiDoc;
