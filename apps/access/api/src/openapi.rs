use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Access API",
        version = "0.1.0",
        description = "Store named face/voice embeddings and match new ones against them"
    ),
    nest(
        (path = "/api", api = domain_embeddings::ApiDoc)
    )
)]
pub struct ApiDoc;
