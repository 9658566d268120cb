//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for all domain crates:
//! - `TestDatabase`: in-memory SQLite database with migrations applied
//! - `TestDataBuilder`: Deterministic test data generation
//! - `assertions`: Custom assertion helpers
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_repository_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let nickname = builder.nickname("a");
//!     let repo = MyRepository::new(db.connection());
//! }
//! ```

mod sqlite;

pub use sqlite::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_user");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a nickname that fits the 2-10 character limit.
    ///
    /// The same builder and suffix always produce the same nickname; different
    /// suffixes produce different ones.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let nickname = builder.nickname("a");
    /// assert!((2..=10).contains(&nickname.chars().count()));
    /// ```
    pub fn nickname(&self, suffix: &str) -> String {
        let suffix: String = suffix.chars().take(3).collect();
        format!("u{:05}{}", self.seed % 100_000, suffix)
    }

    /// Generate a unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(12345);
    /// assert_eq!(builder.name("movie", "main"), "test-movie-12345-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a string is a 21-character id
    pub fn assert_id_format(id: &str, context: &str) {
        assert_eq!(
            id.chars().count(),
            21,
            "{}: expected a 21-character id, got {:?}",
            context,
            id
        );
    }
}
