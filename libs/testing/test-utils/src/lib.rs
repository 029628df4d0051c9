//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongodb")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! ```rust,no_run
//! use test_utils::{TestMongo, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let db = mongo.database("my_mongo_test");
//!     let builder = TestDataBuilder::from_test_name("my_mongo_test");
//!
//!     let name = builder.name("sweet", "main");
//! }
//! ```

#[cfg(feature = "mongodb")]
mod mongo;

#[cfg(feature = "mongodb")]
pub use mongo::TestMongo;

/// Builder for test data with deterministic randomization
///
/// The same seed always yields the same names and numbers, so failures reproduce.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed derived from the test name. Preferred over [`TestDataBuilder::new`].
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_purchase_sweet");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Unique name for a test record
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("sweet", "main"), "test-sweet-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Price in `[0.50, 100.49]` with two decimals, derived from the seed and `n`.
    pub fn price(&self, n: u64) -> f64 {
        let cents = self.mix(n) % 10_000 + 50;
        cents as f64 / 100.0
    }

    /// Stock quantity in `[1, 500]`, derived from the seed and `n`.
    pub fn quantity(&self, n: u64) -> i64 {
        (self.mix(n) % 500 + 1) as i64
    }

    fn mix(&self, n: u64) -> u64 {
        // splitmix64 step
        let mut z = self.seed.wrapping_add(n.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that two prices are equal to the cent
    pub fn assert_price_eq(actual: f64, expected: f64, context: &str) {
        assert!(
            (actual - expected).abs() < 0.005,
            "{}: expected price {}, got {}",
            context,
            expected,
            actual
        );
    }

    /// Assert that `items` is ordered by `key`, newest (largest) first
    pub fn assert_sorted_desc<T, K: PartialOrd + std::fmt::Debug>(
        items: &[T],
        key: impl Fn(&T) -> K,
        context: &str,
    ) {
        for pair in items.windows(2) {
            let (a, b) = (key(&pair[0]), key(&pair[1]));
            assert!(a >= b, "{}: {:?} sorted before {:?}", context, a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.name("sweet", "test"), builder2.name("sweet", "test"));
        assert_eq!(builder1.price(3), builder2.price(3));
        assert_eq!(builder1.quantity(3), builder2.quantity(3));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.name("sweet", "a"), builder2.name("sweet", "a"));
    }

    #[test]
    fn test_generated_values_in_range() {
        let builder = TestDataBuilder::from_test_name("ranges");
        for n in 0..100 {
            let price = builder.price(n);
            assert!((0.5..=100.49).contains(&price), "price {}", price);

            let quantity = builder.quantity(n);
            assert!((1..=500).contains(&quantity), "quantity {}", quantity);
        }
    }

    #[test]
    fn test_assert_sorted_desc() {
        assertions::assert_sorted_desc(&[5, 3, 3, 1], |x| *x, "numbers");
    }

    #[test]
    #[should_panic(expected = "numbers")]
    fn test_assert_sorted_desc_panics_on_ascending() {
        assertions::assert_sorted_desc(&[1, 2], |x| *x, "numbers");
    }
}
