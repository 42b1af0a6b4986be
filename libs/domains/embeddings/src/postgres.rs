use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::prelude::PgVector;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, Statement, Value,
};

use crate::{
    entity,
    error::{EmbeddingError, EmbeddingResult},
    models::{Embedding, EmbeddingMatch, EmbeddingUpdate, NewEmbedding},
    repository::EmbeddingRepository,
};

/// `$1` is the query vector, `$2` the largest accepted cosine distance
/// (`1 - threshold`). `<=>` is pgvector's cosine distance, served by the HNSW
/// index on `vector`. A zero-norm vector has NaN distance, and NaN is never
/// `<` a number in PostgreSQL, so such rows are never returned.
const NEAREST_SQL: &str = r#"
SELECT id, name, vector, (1 - (vector <=> $1))::float8 AS accuracy
FROM embeddings
WHERE (vector <=> $1) < $2
ORDER BY vector <=> $1 ASC
LIMIT 1
"#;

#[derive(Debug, FromQueryResult)]
struct NearestRow {
    id: i64,
    name: String,
    vector: PgVector,
    accuracy: f64,
}

impl From<NearestRow> for EmbeddingMatch {
    fn from(row: NearestRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            vector: row.vector.to_vec(),
            accuracy: row.accuracy as f32,
        }
    }
}

pub struct PgEmbeddingRepository {
    db: DatabaseConnection,
    similarity_threshold: f64,
}

impl PgEmbeddingRepository {
    pub fn new(db: DatabaseConnection, similarity_threshold: f64) -> Self {
        Self {
            db,
            similarity_threshold,
        }
    }

    async fn ping(&self) -> EmbeddingResult<()> {
        self.db.ping().await.map_err(|e| {
            tracing::warn!(error = %e, "Embedding store ping failed");
            EmbeddingError::Unavailable(e.to_string())
        })
    }
}

#[async_trait]
impl EmbeddingRepository for PgEmbeddingRepository {
    async fn create(&self, input: NewEmbedding) -> EmbeddingResult<Embedding> {
        self.ping().await?;

        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(embedding_id = model.id, "Created embedding");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> EmbeddingResult<Option<Embedding>> {
        self.ping().await?;

        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self) -> EmbeddingResult<Vec<Embedding>> {
        self.ping().await?;

        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_nearest(&self, vector: Vec<f32>) -> EmbeddingResult<Option<EmbeddingMatch>> {
        self.ping().await?;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            NEAREST_SQL,
            [
                Value::from(PgVector::from(vector)),
                Value::from(1.0 - self.similarity_threshold),
            ],
        );
        let row = NearestRow::find_by_statement(stmt).one(&self.db).await?;

        Ok(row.map(Into::into))
    }

    async fn update(&self, input: EmbeddingUpdate) -> EmbeddingResult<bool> {
        self.ping().await?;

        let changes = entity::ActiveModel {
            name: Set(input.name),
            vector: Set(PgVector::from(input.vector)),
            ..Default::default()
        };
        let result = entity::Entity::update_many()
            .set(changes)
            .filter(entity::Column::Id.eq(input.id))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(embedding_id = input.id, "Updated embedding");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete_by_id(&self, id: i64) -> EmbeddingResult<bool> {
        self.ping().await?;

        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(embedding_id = id, "Deleted embedding");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
