use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::error::{EmbeddingError, EmbeddingResult};
use crate::models::{Embedding, EmbeddingMatch, EmbeddingUpdate, NewEmbedding, EMBEDDING_DIMENSION};
use crate::repository::EmbeddingRepository;

/// Reject anything that is not a non-zero 512-component vector of finite
/// numbers. A zero vector has no direction, so cosine similarity is undefined.
pub fn ensure_dimension(vector: &[f32]) -> EmbeddingResult<()> {
    if vector.len() != EMBEDDING_DIMENSION {
        return Err(EmbeddingError::InvalidInput(format!(
            "vector must have {} components, got {}",
            EMBEDDING_DIMENSION,
            vector.len()
        )));
    }
    if let Some(index) = vector.iter().position(|v| !v.is_finite()) {
        return Err(EmbeddingError::InvalidInput(format!(
            "vector component {} is not a finite number",
            index
        )));
    }
    if vector.iter().all(|v| *v == 0.0) {
        return Err(EmbeddingError::InvalidInput(
            "vector must not be all zeros".to_string(),
        ));
    }
    Ok(())
}

fn ensure_name(name: &str) -> EmbeddingResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EmbeddingError::InvalidInput("name must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Business rules for embeddings: shape checks, outcome mapping and a time
/// budget on every store call.
pub struct EmbeddingService<R: EmbeddingRepository> {
    repository: Arc<R>,
    timeout: Duration,
}

impl<R: EmbeddingRepository> Clone for EmbeddingService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            timeout: self.timeout,
        }
    }
}

impl<R: EmbeddingRepository> EmbeddingService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_timeout(repository, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(repository: R, timeout: Duration) -> Self {
        Self {
            repository: Arc::new(repository),
            timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> EmbeddingResult<T>
    where
        F: Future<Output = EmbeddingResult<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, budget = ?self.timeout, "Embedding store call timed out");
                Err(EmbeddingError::Timeout {
                    operation,
                    budget: self.timeout,
                })
            }
        }
    }

    /// Store a new reference embedding.
    pub async fn add(&self, name: &str, vector: Vec<f32>) -> EmbeddingResult<Embedding> {
        ensure_dimension(&vector)?;
        let name = ensure_name(name)?;

        self.bounded("add", self.repository.create(NewEmbedding { name, vector }))
            .await
    }

    pub async fn get(&self, id: i64) -> EmbeddingResult<Embedding> {
        self.bounded("get", self.repository.get_by_id(id))
            .await?
            .ok_or(EmbeddingError::NotFound(id))
    }

    pub async fn list(&self) -> EmbeddingResult<Vec<Embedding>> {
        self.bounded("list", self.repository.list()).await
    }

    /// Find the stored embedding closest to `vector`.
    ///
    /// Nothing above the similarity threshold is [`EmbeddingError::NoMatch`],
    /// which callers can tell apart from a store failure.
    pub async fn validate(&self, vector: Vec<f32>) -> EmbeddingResult<EmbeddingMatch> {
        ensure_dimension(&vector)?;

        match self.bounded("validate", self.repository.find_nearest(vector)).await? {
            Some(found) => {
                tracing::info!(embedding_id = found.id, accuracy = found.accuracy, "Embedding matched");
                Ok(found)
            }
            None => {
                tracing::info!("No embedding above the similarity threshold");
                Err(EmbeddingError::NoMatch)
            }
        }
    }

    pub async fn update(&self, id: i64, name: &str, vector: Vec<f32>) -> EmbeddingResult<()> {
        ensure_dimension(&vector)?;
        let name = ensure_name(name)?;

        let updated = self
            .bounded("update", self.repository.update(EmbeddingUpdate { id, name, vector }))
            .await?;

        if !updated {
            return Err(EmbeddingError::NotFound(id));
        }
        Ok(())
    }

    /// Deleting an id that does not exist succeeds.
    pub async fn delete(&self, id: i64) -> EmbeddingResult<()> {
        let deleted = self.bounded("delete", self.repository.delete_by_id(id)).await?;
        if !deleted {
            tracing::debug!(embedding_id = id, "Delete of absent embedding");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryEmbeddingRepository, MockEmbeddingRepository};
    use async_trait::async_trait;
    use mockall::predicate::eq;

    fn one_hot(index: usize) -> Vec<f32> {
        let mut v = vec![0.0; EMBEDDING_DIMENSION];
        v[index] = 1.0;
        v
    }

    #[test]
    fn test_ensure_dimension() {
        assert!(ensure_dimension(&one_hot(0)).is_ok());
        assert!(ensure_dimension(&[1.0; 511]).is_err());
        assert!(ensure_dimension(&[1.0; 513]).is_err());
        assert!(ensure_dimension(&[]).is_err());

        let mut v = one_hot(0);
        v[7] = f32::NAN;
        let err = ensure_dimension(&v).unwrap_err();
        assert!(err.to_string().contains("component 7"));

        let err = ensure_dimension(&[0.0; EMBEDDING_DIMENSION]).unwrap_err();
        assert!(err.to_string().contains("all zeros"));
        assert!(ensure_dimension(&[-0.0; EMBEDDING_DIMENSION]).is_err());
    }

    #[tokio::test]
    async fn test_zero_vector_never_reaches_the_store() {
        let service = EmbeddingService::new(MockEmbeddingRepository::new());
        let zeros = || vec![0.0; EMBEDDING_DIMENSION];

        let err = service.add("alice", zeros()).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidInput(_)));

        let err = service.validate(zeros()).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidInput(_)));
        assert!(!err.is_not_found());

        let err = service.update(1, "alice", zeros()).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_wrong_length_never_reaches_the_store() {
        // No expectations: any repository call would panic.
        let service = EmbeddingService::new(MockEmbeddingRepository::new());

        for len in [0, 1, 511, 513, 1024] {
            let err = service.add("alice", vec![0.5; len]).await.unwrap_err();
            assert!(matches!(err, EmbeddingError::InvalidInput(_)), "add len {len}");

            let err = service.validate(vec![0.5; len]).await.unwrap_err();
            assert!(matches!(err, EmbeddingError::InvalidInput(_)), "validate len {len}");

            let err = service.update(1, "alice", vec![0.5; len]).await.unwrap_err();
            assert!(matches!(err, EmbeddingError::InvalidInput(_)), "update len {len}");
        }
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let service = EmbeddingService::new(MockEmbeddingRepository::new());
        let err = service.add("   ", one_hot(0)).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_add_trims_name() {
        let mut repo = MockEmbeddingRepository::new();
        repo.expect_create()
            .withf(|input| input.name == "alice")
            .times(1)
            .returning(|input| {
                Ok(Embedding {
                    id: 1,
                    name: input.name,
                    vector: input.vector,
                })
            });

        let service = EmbeddingService::new(repo);
        let created = service.add("  alice ", one_hot(0)).await.unwrap();
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut repo = MockEmbeddingRepository::new();
        repo.expect_get_by_id().with(eq(9)).returning(|_| Ok(None));

        let service = EmbeddingService::new(repo);
        let err = service.get(9).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::NotFound(9)));
    }

    #[tokio::test]
    async fn test_validate_without_match_is_no_match() {
        let mut repo = MockEmbeddingRepository::new();
        repo.expect_find_nearest().times(1).returning(|_| Ok(None));

        let service = EmbeddingService::new(repo);
        let err = service.validate(one_hot(1)).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::NoMatch));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_validate_store_failure_is_not_a_miss() {
        let mut repo = MockEmbeddingRepository::new();
        repo.expect_find_nearest()
            .returning(|_| Err(EmbeddingError::Unavailable("connection refused".into())));

        let service = EmbeddingService::new(repo);
        let err = service.validate(one_hot(1)).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Unavailable(_)));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_of_absent_id_is_not_found() {
        let mut repo = MockEmbeddingRepository::new();
        repo.expect_update().returning(|_| Ok(false));

        let service = EmbeddingService::new(repo);
        let err = service.update(77, "bob", one_hot(2)).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::NotFound(77)));
    }

    #[tokio::test]
    async fn test_delete_of_absent_id_succeeds() {
        let mut repo = MockEmbeddingRepository::new();
        repo.expect_delete_by_id().with(eq(5)).returning(|_| Ok(false));

        let service = EmbeddingService::new(repo);
        assert!(service.delete(5).await.is_ok());
    }

    #[tokio::test]
    async fn test_in_memory_lifecycle() {
        let service = EmbeddingService::new(InMemoryEmbeddingRepository::default());

        let alice = service.add("alice", one_hot(0)).await.unwrap();
        let found = service.validate(one_hot(0)).await.unwrap();
        assert_eq!(found.id, alice.id);
        assert!((found.accuracy - 1.0).abs() < 1e-5);

        // An orthogonal vector clears no threshold.
        assert!(matches!(
            service.validate(one_hot(1)).await.unwrap_err(),
            EmbeddingError::NoMatch
        ));

        service.update(alice.id, "alice", one_hot(1)).await.unwrap();
        assert_eq!(service.validate(one_hot(1)).await.unwrap().id, alice.id);
        assert!(service.validate(one_hot(0)).await.is_err());

        service.delete(alice.id).await.unwrap();
        assert!(matches!(
            service.get(alice.id).await.unwrap_err(),
            EmbeddingError::NotFound(_)
        ));
    }

    struct SlowRepository;

    #[async_trait]
    impl EmbeddingRepository for SlowRepository {
        async fn create(&self, _: NewEmbedding) -> EmbeddingResult<Embedding> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(EmbeddingError::Internal("unreachable".into()))
        }
        async fn get_by_id(&self, _: i64) -> EmbeddingResult<Option<Embedding>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }
        async fn list(&self) -> EmbeddingResult<Vec<Embedding>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![])
        }
        async fn find_nearest(&self, _: Vec<f32>) -> EmbeddingResult<Option<EmbeddingMatch>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }
        async fn update(&self, _: EmbeddingUpdate) -> EmbeddingResult<bool> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(false)
        }
        async fn delete_by_id(&self, _: i64) -> EmbeddingResult<bool> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(false)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_store_times_out() {
        let service = EmbeddingService::with_timeout(SlowRepository, Duration::from_secs(5));

        let err = service.validate(one_hot(0)).await.unwrap_err();
        match err {
            EmbeddingError::Timeout { operation, budget } => {
                assert_eq!(operation, "validate");
                assert_eq!(budget, Duration::from_secs(5));
            }
            other => panic!("expected timeout, got {other:?}"),
        }

        assert!(matches!(
            service.list().await.unwrap_err(),
            EmbeddingError::Timeout { operation: "list", .. }
        ));
    }
}
