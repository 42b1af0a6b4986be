use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, InternalServerErrorResponse, NoMatchResponse, NotFoundResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::EmbeddingResult;
use crate::models::{
    AddEmbeddingRequest, DeleteEmbeddingRequest, Embedding, EmbeddingMatch,
    UpdateEmbeddingRequest, ValidateEmbeddingRequest,
};
use crate::repository::EmbeddingRepository;
use crate::service::EmbeddingService;

const TAG: &str = "embeddings";
const ADMIN_TAG: &str = "embeddings-admin";

/// OpenAPI documentation for the embeddings API
#[derive(OpenApi)]
#[openapi(
    paths(
        add_embedding,
        validate_embedding,
        delete_embedding,
        admin_add_embedding,
        admin_get_embedding,
        admin_list_embeddings,
        admin_update_embedding,
        admin_delete_embedding,
    ),
    components(
        schemas(
            Embedding,
            EmbeddingMatch,
            AddEmbeddingRequest,
            ValidateEmbeddingRequest,
            UpdateEmbeddingRequest,
            DeleteEmbeddingRequest
        ),
        responses(
            BadRequestResponse,
            NotFoundResponse,
            NoMatchResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Register and match embeddings"),
        (name = ADMIN_TAG, description = "Manage stored embeddings")
    )
)]
pub struct ApiDoc;

/// Routes for the public and admin endpoints, relative to `/api`.
pub fn router<R: EmbeddingRepository + 'static>(service: EmbeddingService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/v1/embedding", post(add_embedding).delete(delete_embedding))
        .route("/v1/embedding/validate", post(validate_embedding))
        .route(
            "/v1/admin/embedding",
            post(admin_add_embedding)
                .put(admin_update_embedding)
                .delete(admin_delete_embedding),
        )
        .route("/v1/admin/embedding/{id}", get(admin_get_embedding))
        .route("/v1/admin/embeddings", get(admin_list_embeddings))
        .with_state(shared_service)
}

fn audit(headers: &HeaderMap, action: &str, id: Option<i64>, result: &EmbeddingResult<()>) {
    let outcome = match result {
        Ok(()) => AuditOutcome::Success,
        Err(_) => AuditOutcome::Failure,
    };
    let mut event = AuditEvent::new(action, id.map(|id| format!("embedding:{id}")), outcome)
        .with_request_headers(headers);
    if let Err(e) = result {
        event = event.with_details(json!({ "error": e.to_string() }));
    }
    event.log();
}

/// Register a reference embedding
#[utoipa::path(
    post,
    path = "/v1/embedding",
    tag = TAG,
    request_body = AddEmbeddingRequest,
    responses(
        (status = 201, description = "Embedding stored"),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_embedding<R: EmbeddingRepository>(
    State(service): State<Arc<EmbeddingService<R>>>,
    ValidatedJson(input): ValidatedJson<AddEmbeddingRequest>,
) -> EmbeddingResult<StatusCode> {
    service.add(&input.name, input.vector).await?;
    Ok(StatusCode::CREATED)
}

/// Find the closest stored embedding above the similarity threshold
#[utoipa::path(
    post,
    path = "/v1/embedding/validate",
    tag = TAG,
    request_body = ValidateEmbeddingRequest,
    responses(
        (status = 200, description = "Closest match", body = EmbeddingMatch),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NoMatchResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn validate_embedding<R: EmbeddingRepository>(
    State(service): State<Arc<EmbeddingService<R>>>,
    ValidatedJson(input): ValidatedJson<ValidateEmbeddingRequest>,
) -> EmbeddingResult<Json<EmbeddingMatch>> {
    let found = service.validate(input.vector).await?;
    Ok(Json(found))
}

/// Remove an embedding; absent ids succeed
#[utoipa::path(
    delete,
    path = "/v1/embedding",
    tag = TAG,
    request_body = DeleteEmbeddingRequest,
    responses(
        (status = 200, description = "Embedding removed"),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_embedding<R: EmbeddingRepository>(
    State(service): State<Arc<EmbeddingService<R>>>,
    ValidatedJson(input): ValidatedJson<DeleteEmbeddingRequest>,
) -> EmbeddingResult<StatusCode> {
    service.delete(input.id).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/v1/admin/embedding",
    tag = ADMIN_TAG,
    request_body = AddEmbeddingRequest,
    responses(
        (status = 201, description = "Embedding stored"),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn admin_add_embedding<R: EmbeddingRepository>(
    State(service): State<Arc<EmbeddingService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<AddEmbeddingRequest>,
) -> EmbeddingResult<StatusCode> {
    let result = service.add(&input.name, input.vector).await;
    let id = result.as_ref().ok().map(|e| e.id);
    let result = result.map(|_| ());

    audit(&headers, "embedding.create", id, &result);
    result.map(|()| StatusCode::CREATED)
}

#[utoipa::path(
    get,
    path = "/v1/admin/embedding/{id}",
    tag = ADMIN_TAG,
    params(
        ("id" = i64, Path, description = "Embedding ID")
    ),
    responses(
        (status = 200, description = "Embedding found", body = Embedding),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn admin_get_embedding<R: EmbeddingRepository>(
    State(service): State<Arc<EmbeddingService<R>>>,
    IdPath(id): IdPath,
) -> EmbeddingResult<Json<Embedding>> {
    let embedding = service.get(id).await?;
    Ok(Json(embedding))
}

#[utoipa::path(
    get,
    path = "/v1/admin/embeddings",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "All stored embeddings", body = Vec<Embedding>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn admin_list_embeddings<R: EmbeddingRepository>(
    State(service): State<Arc<EmbeddingService<R>>>,
) -> EmbeddingResult<Json<Vec<Embedding>>> {
    let embeddings = service.list().await?;
    Ok(Json(embeddings))
}

/// Overwrite name and vector of an existing embedding
#[utoipa::path(
    put,
    path = "/v1/admin/embedding",
    tag = ADMIN_TAG,
    request_body = UpdateEmbeddingRequest,
    responses(
        (status = 200, description = "Embedding updated"),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn admin_update_embedding<R: EmbeddingRepository>(
    State(service): State<Arc<EmbeddingService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<UpdateEmbeddingRequest>,
) -> EmbeddingResult<StatusCode> {
    let result = service.update(input.id, &input.name, input.vector).await;

    audit(&headers, "embedding.update", Some(input.id), &result);
    result.map(|()| StatusCode::OK)
}

#[utoipa::path(
    delete,
    path = "/v1/admin/embedding",
    tag = ADMIN_TAG,
    request_body = DeleteEmbeddingRequest,
    responses(
        (status = 200, description = "Embedding removed"),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn admin_delete_embedding<R: EmbeddingRepository>(
    State(service): State<Arc<EmbeddingService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<DeleteEmbeddingRequest>,
) -> EmbeddingResult<StatusCode> {
    let result = service.delete(input.id).await;

    audit(&headers, "embedding.delete", Some(input.id), &result);
    result.map(|()| StatusCode::OK)
}

