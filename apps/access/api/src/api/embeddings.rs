use axum::Router;
use domain_embeddings::{EmbeddingService, PgEmbeddingRepository, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let settings = state.config.embeddings;
    let repository = PgEmbeddingRepository::new(state.db.clone(), settings.similarity_threshold);
    let service = EmbeddingService::with_timeout(repository, settings.request_timeout);
    handlers::router(service)
}
