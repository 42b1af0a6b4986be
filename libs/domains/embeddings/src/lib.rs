//! Embeddings Domain
//!
//! Stores named 512-component embeddings and finds the closest stored one to
//! a query vector.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /v1 and /v1/admin endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Dimension checks, outcome mapping, timeouts
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + PostgreSQL/pgvector and in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Records, request bodies, entity
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_embeddings::{
//!     handlers,
//!     repository::InMemoryEmbeddingRepository,
//!     service::EmbeddingService,
//! };
//!
//! let repository = InMemoryEmbeddingRepository::new(0.58);
//! let service = EmbeddingService::new(repository);
//!
//! let router = handlers::router(service);
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use config::EmbeddingSettings;
pub use error::{EmbeddingError, EmbeddingResult};
pub use handlers::ApiDoc;
pub use models::{
    AddEmbeddingRequest, DeleteEmbeddingRequest, EMBEDDING_DIMENSION, Embedding, EmbeddingMatch,
    EmbeddingUpdate, NewEmbedding, UpdateEmbeddingRequest, ValidateEmbeddingRequest,
};
pub use postgres::PgEmbeddingRepository;
pub use repository::{EmbeddingRepository, InMemoryEmbeddingRepository};
pub use service::EmbeddingService;
