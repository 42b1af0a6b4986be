use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // `vector(512)` is a pgvector type, written as raw SQL.
        db.execute_unprepared(
            r#"
            CREATE TABLE IF NOT EXISTS embeddings (
                id     BIGSERIAL PRIMARY KEY,
                name   TEXT NOT NULL,
                vector vector(512) NOT NULL
            )
            "#,
        )
        .await?;

        // Cosine-distance HNSW index backing the `<=>` nearest-match query
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS embeddings_vector_hnsw_idx \
             ON embeddings USING hnsw (vector vector_cosine_ops)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Embeddings::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Embeddings {
    Table,
}
