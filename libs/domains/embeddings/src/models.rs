use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Number of components every stored or queried vector must have.
pub const EMBEDDING_DIMENSION: usize = 512;

/// A stored embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Embedding {
    /// Assigned by the database on insert
    pub id: i64,
    pub name: String,
    /// Exactly 512 components
    pub vector: Vec<f32>,
}

/// Result of a nearest-match search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmbeddingMatch {
    pub id: i64,
    pub name: String,
    pub vector: Vec<f32>,
    /// Cosine similarity (`1 - cosine distance`) between query and match
    pub accuracy: f32,
}

/// Checked input for inserting an embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmbedding {
    pub name: String,
    pub vector: Vec<f32>,
}

/// Checked input for overwriting name and vector of an existing embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingUpdate {
    pub id: i64,
    pub name: String,
    pub vector: Vec<f32>,
}

// Request bodies. Shape rules live here; the 512-component rule lives in the service.

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddEmbeddingRequest {
    #[validate(length(min = 1, message = "name is required"))]
    #[schema(example = "alice")]
    pub name: String,

    #[validate(length(min = 1, message = "vector is required"))]
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ValidateEmbeddingRequest {
    #[validate(length(min = 1, message = "vector is required"))]
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateEmbeddingRequest {
    #[validate(range(min = 1, message = "id is required"))]
    pub id: i64,

    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "vector is required"))]
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteEmbeddingRequest {
    #[validate(range(min = 1, message = "id is required"))]
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_request_requires_name_and_vector() {
        let req: AddEmbeddingRequest =
            serde_json::from_value(json!({"name": "", "vector": []})).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("vector"));
    }

    #[test]
    fn test_delete_request_rejects_zero_id() {
        let req: DeleteEmbeddingRequest = serde_json::from_value(json!({"id": 0})).unwrap();
        assert!(req.validate().is_err());

        let req: DeleteEmbeddingRequest = serde_json::from_value(json!({"id": 3})).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_missing_id_fails_to_decode() {
        let result: Result<UpdateEmbeddingRequest, _> =
            serde_json::from_value(json!({"name": "bob", "vector": [1.0]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_match_serializes_accuracy() {
        let m = EmbeddingMatch {
            id: 1,
            name: "alice".into(),
            vector: vec![1.0, 0.0],
            accuracy: 0.75,
        };
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value, json!({"id": 1, "name": "alice", "vector": [1.0, 0.0], "accuracy": 0.75}));
    }
}
