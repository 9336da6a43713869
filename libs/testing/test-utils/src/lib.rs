//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic test data
//! - `assertions`: assertion helpers
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let event_name = builder.name("event", "main");
//!     let nickname = builder.nickname(1);
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

const VOCATIONS: [&str; 4] = ["knight", "druid", "paladin", "sorcerer"];

/// Builder for test data with deterministic randomization
///
/// The same seed always yields the same names, so failures reproduce.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_register_overflow");
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
    /// assert_eq!(builder.name("event", "main"), "test-event-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Nickname for the `n`th registrant of a test
    pub fn nickname(&self, n: usize) -> String {
        format!("player-{}-{}", self.seed % 10_000, n)
    }

    /// Vocation picked from a fixed list by seed and `n`
    pub fn vocation(&self, n: usize) -> String {
        let index = (self.seed as usize).wrapping_add(n) % VOCATIONS.len();
        VOCATIONS[index].to_string()
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a roster has exactly `expected` entries
    pub fn assert_len<T>(items: &[T], expected: usize, context: &str) {
        assert_eq!(
            items.len(),
            expected,
            "{}: expected {} entries, got {}",
            context,
            expected,
            items.len()
        );
    }
}
