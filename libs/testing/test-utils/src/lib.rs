//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL + pgvector container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic names and vectors derived from the test name
//! - `assertions`: assertion helpers with readable failure messages
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let name = builder.name("embedding", "alice");
//!     let vector = builder.vector(512);
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// The same seed always yields the same names and vectors, so failures reproduce.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_add_embedding");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// `test-{prefix}-{seed}-{suffix}`
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("embedding", "alice"), "test-embedding-7-alice");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A seeded vector with components in `[-1, 1)`.
    pub fn vector(&self, dimension: usize) -> Vec<f32> {
        self.vector_with_salt(dimension, 0)
    }

    /// Another seeded vector; different salts give unrelated vectors.
    pub fn vector_with_salt(&self, dimension: usize, salt: u64) -> Vec<f32> {
        // xorshift64; state must be non-zero
        let mut state = (self.seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15)) | 1;
        (0..dimension)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                ((state >> 40) as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
            })
            .collect()
    }

    /// All zeros except `1.0` at `index`. Two different indexes are orthogonal.
    pub fn basis_vector(dimension: usize, index: usize) -> Vec<f32> {
        let mut v = vec![0.0; dimension];
        v[index] = 1.0;
        v
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert two vectors are equal component-wise within `tolerance`.
    pub fn assert_vectors_close(actual: &[f32], expected: &[f32], tolerance: f32, context: &str) {
        assert_eq!(
            actual.len(),
            expected.len(),
            "{}: length {} != {}",
            context,
            actual.len(),
            expected.len()
        );
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a - e).abs() <= tolerance,
                "{}: component {} differs ({} vs {})",
                context,
                i,
                a,
                e
            );
        }
    }
}
