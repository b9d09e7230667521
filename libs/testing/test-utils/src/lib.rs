//! Shared test infrastructure for the TAM crates.
//!
//! - [`TestDatabase`]: migrated PostgreSQL container, removed on drop
//! - [`TestDataBuilder`]: deterministic identifiers derived from the test name
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_warehouse_test() {
//!     let db = TestDatabase::new().await;
//!     let data = TestDataBuilder::from_test_name("my_warehouse_test");
//!     let project = data.project_id();
//! }
//! ```

mod postgres;

pub use postgres::TestDatabase;

use chrono::NaiveDate;

/// Seeded identifiers so parallel tests sharing a database never collide.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn project_id(&self) -> String {
        format!("test-project-{}", self.seed)
    }

    pub fn customer_account_id(&self) -> String {
        format!("test-account-{}", self.seed)
    }

    /// Builds a date, panicking on an invalid calendar day.
    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap_or_else(|| panic!("invalid test date {year}-{month}-{day}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_is_deterministic_per_name() {
        let a = TestDataBuilder::from_test_name("warehouse");
        let b = TestDataBuilder::from_test_name("warehouse");
        assert_eq!(a.project_id(), b.project_id());
        assert_eq!(a.customer_account_id(), b.customer_account_id());
    }

    #[test]
    fn test_builder_differs_between_names() {
        let a = TestDataBuilder::from_test_name("one");
        let b = TestDataBuilder::from_test_name("two");
        assert_ne!(a.project_id(), b.project_id());
    }

    #[test]
    fn test_date_helper() {
        assert_eq!(
            TestDataBuilder::date(2025, 3, 31).to_string(),
            "2025-03-31"
        );
    }
}
