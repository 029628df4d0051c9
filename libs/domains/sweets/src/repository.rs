use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::SweetResult;
use crate::models::{NewSweet, Sweet};
use crate::query::SweetQuery;

/// Persistence interface for sweets
///
/// Stock mutations are single atomic operations so that concurrent purchases
/// cannot drive the quantity below zero.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SweetRepository: Send + Sync {
    /// Insert a new sweet
    async fn create(&self, input: NewSweet) -> SweetResult<Sweet>;

    async fn get_by_id(&self, id: ObjectId) -> SweetResult<Option<Sweet>>;

    /// Sweets matching `query`, newest first
    async fn list(&self, query: SweetQuery) -> SweetResult<Vec<Sweet>>;

    /// Remove a sweet and return it, or `None` if it did not exist
    async fn delete(&self, id: ObjectId) -> SweetResult<Option<Sweet>>;

    /// Subtract `quantity` if at least that much is in stock.
    ///
    /// Returns the updated sweet, or `None` when the sweet is missing or the
    /// guard failed.
    async fn decrement_stock(&self, id: ObjectId, quantity: i64) -> SweetResult<Option<Sweet>>;

    /// Add `quantity` to stock. Returns the updated sweet, or `None` if missing.
    async fn increment_stock(&self, id: ObjectId, quantity: i64) -> SweetResult<Option<Sweet>>;
}
