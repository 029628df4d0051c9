//! Sweet Service - Business logic layer

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{SweetError, SweetResult};
use crate::models::{CreateSweet, PurchaseDetails, RestockDetails, StockRequest, Sweet};
use crate::query::SweetQuery;
use crate::repository::SweetRepository;

/// A guarded decrement can fail while a concurrent restock makes the re-read
/// look sufficient. Retry that a few times before giving up.
const MAX_PURCHASE_ATTEMPTS: usize = 3;

/// Sweet service providing inventory operations
pub struct SweetService<R: SweetRepository> {
    repository: Arc<R>,
}

impl<R: SweetRepository> SweetService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate and store a new sweet
    #[instrument(skip(self, input))]
    pub async fn create_sweet(&self, input: CreateSweet) -> SweetResult<Sweet> {
        let new_sweet = input.into_new_sweet()?;
        self.repository.create(new_sweet).await
    }

    /// All sweets, newest first
    #[instrument(skip(self))]
    pub async fn list_sweets(&self) -> SweetResult<Vec<Sweet>> {
        self.repository.list(SweetQuery::default()).await
    }

    #[instrument(skip(self))]
    pub async fn search_sweets(&self, query: SweetQuery) -> SweetResult<Vec<Sweet>> {
        self.repository.list(query).await
    }

    #[instrument(skip(self))]
    pub async fn get_sweet(&self, id: ObjectId) -> SweetResult<Sweet> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(SweetError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_sweet(&self, id: ObjectId) -> SweetResult<Sweet> {
        self.repository
            .delete(id)
            .await?
            .ok_or(SweetError::NotFound(id))
    }

    /// Take `request.quantity` units out of stock.
    ///
    /// The decrement is conditional on enough stock at the store, so the
    /// quantity never goes negative even under concurrent purchases.
    #[instrument(skip(self, request))]
    pub async fn purchase_sweet(
        &self,
        id: ObjectId,
        request: StockRequest,
    ) -> SweetResult<(Sweet, PurchaseDetails)> {
        let quantity = request.positive_quantity()?;

        for attempt in 1..=MAX_PURCHASE_ATTEMPTS {
            if let Some(sweet) = self.repository.decrement_stock(id, quantity).await? {
                let details = PurchaseDetails {
                    purchased_quantity: quantity,
                    total_cost: sweet.price * quantity as f64,
                    remaining_stock: sweet.quantity,
                };
                tracing::info!(
                    sweet_id = %id,
                    quantity,
                    remaining = sweet.quantity,
                    "Purchase recorded"
                );
                return Ok((sweet, details));
            }

            let current = self
                .repository
                .get_by_id(id)
                .await?
                .ok_or(SweetError::NotFound(id))?;

            if current.quantity < quantity {
                return Err(SweetError::InsufficientStock {
                    available: current.quantity,
                    requested: quantity,
                });
            }

            tracing::warn!(sweet_id = %id, attempt, "Stock changed during purchase, retrying");
        }

        Err(SweetError::Internal(format!(
            "stock for {} kept changing during purchase",
            id
        )))
    }

    /// Add `request.quantity` units to stock. There is no upper bound.
    #[instrument(skip(self, request))]
    pub async fn restock_sweet(
        &self,
        id: ObjectId,
        request: StockRequest,
    ) -> SweetResult<(Sweet, RestockDetails)> {
        let quantity = request.positive_quantity()?;

        let sweet = self
            .repository
            .increment_stock(id, quantity)
            .await?
            .ok_or(SweetError::NotFound(id))?;

        let details = RestockDetails {
            restocked_quantity: quantity,
            previous_stock: sweet.quantity - quantity,
            new_stock: sweet.quantity,
        };
        tracing::info!(sweet_id = %id, quantity, new_stock = sweet.quantity, "Restock recorded");

        Ok((sweet, details))
    }
}

impl<R: SweetRepository> Clone for SweetService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
