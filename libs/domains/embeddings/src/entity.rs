use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

/// Sea-ORM entity for the `embeddings` table.
///
/// `vector` is a pgvector `vector(512)` column.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "embeddings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    pub vector: PgVector,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Embedding {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            vector: model.vector.to_vec(),
        }
    }
}

impl From<crate::models::NewEmbedding> for ActiveModel {
    fn from(input: crate::models::NewEmbedding) -> Self {
        Self {
            name: Set(input.name),
            vector: Set(PgVector::from(input.vector)),
            ..Default::default()
        }
    }
}
