use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::models::{Embedding, EmbeddingMatch, EmbeddingUpdate, NewEmbedding};

/// Data access for embeddings.
///
/// Implementations check that the store is reachable before every call and
/// report an unreachable store as [`EmbeddingError::Unavailable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingRepository: Send + Sync {
    /// Insert and return the stored record with its new id
    async fn create(&self, input: NewEmbedding) -> EmbeddingResult<Embedding>;

    async fn get_by_id(&self, id: i64) -> EmbeddingResult<Option<Embedding>>;

    async fn list(&self) -> EmbeddingResult<Vec<Embedding>>;

    /// Closest record whose cosine similarity to `vector` is strictly above
    /// the configured threshold, or `None`
    async fn find_nearest(&self, vector: Vec<f32>) -> EmbeddingResult<Option<EmbeddingMatch>>;

    /// Overwrite name and vector; `false` when no row has that id
    async fn update(&self, input: EmbeddingUpdate) -> EmbeddingResult<bool>;

    /// `false` when no row has that id
    async fn delete_by_id(&self, id: i64) -> EmbeddingResult<bool>;
}

#[derive(Default)]
struct Store {
    next_id: i64,
    rows: BTreeMap<i64, Embedding>,
}

/// In-process repository for development and tests.
///
/// Matching uses the same cosine similarity and strict threshold as the
/// PostgreSQL query.
pub struct InMemoryEmbeddingRepository {
    store: RwLock<Store>,
    similarity_threshold: f64,
    available: AtomicBool,
}

impl InMemoryEmbeddingRepository {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            similarity_threshold,
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the store going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> EmbeddingResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(EmbeddingError::Unavailable("in-memory store is offline".to_string()))
        }
    }
}

impl Default for InMemoryEmbeddingRepository {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SIMILARITY_THRESHOLD)
    }
}

/// `None` when either vector has zero length (pgvector yields NaN there,
/// which never clears a threshold either).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

#[async_trait]
impl EmbeddingRepository for InMemoryEmbeddingRepository {
    async fn create(&self, input: NewEmbedding) -> EmbeddingResult<Embedding> {
        self.ensure_available()?;

        let mut store = self.store.write().await;
        store.next_id += 1;
        let embedding = Embedding {
            id: store.next_id,
            name: input.name,
            vector: input.vector,
        };
        store.rows.insert(embedding.id, embedding.clone());

        tracing::info!(embedding_id = embedding.id, "Created embedding");
        Ok(embedding)
    }

    async fn get_by_id(&self, id: i64) -> EmbeddingResult<Option<Embedding>> {
        self.ensure_available()?;
        Ok(self.store.read().await.rows.get(&id).cloned())
    }

    async fn list(&self) -> EmbeddingResult<Vec<Embedding>> {
        self.ensure_available()?;
        Ok(self.store.read().await.rows.values().cloned().collect())
    }

    async fn find_nearest(&self, vector: Vec<f32>) -> EmbeddingResult<Option<EmbeddingMatch>> {
        self.ensure_available()?;

        let store = self.store.read().await;
        let best = store
            .rows
            .values()
            .filter_map(|e| cosine_similarity(&vector, &e.vector).map(|s| (s, e)))
            .filter(|(similarity, _)| *similarity > self.similarity_threshold)
            // Keep the lowest id on ties.
            .fold(None::<(f64, &Embedding)>, |best, candidate| match best {
                Some(b) if b.0 >= candidate.0 => Some(b),
                _ => Some(candidate),
            });

        Ok(best.map(|(similarity, e)| EmbeddingMatch {
            id: e.id,
            name: e.name.clone(),
            vector: e.vector.clone(),
            accuracy: similarity as f32,
        }))
    }

    async fn update(&self, input: EmbeddingUpdate) -> EmbeddingResult<bool> {
        self.ensure_available()?;

        let mut store = self.store.write().await;
        match store.rows.get_mut(&input.id) {
            Some(existing) => {
                existing.name = input.name;
                existing.vector = input.vector;
                tracing::info!(embedding_id = input.id, "Updated embedding");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: i64) -> EmbeddingResult<bool> {
        self.ensure_available()?;

        let removed = self.store.write().await.rows.remove(&id).is_some();
        if removed {
            tracing::info!(embedding_id = id, "Deleted embedding");
        }
        Ok(removed)
    }
}
