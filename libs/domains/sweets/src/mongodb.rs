//! MongoDB implementation of SweetRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc, oid::ObjectId},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::SweetResult;
use crate::models::{NewSweet, Sweet, SweetDocument};
use crate::query::SweetQuery;
use crate::repository::SweetRepository;

pub const COLLECTION_NAME: &str = "sweets";

pub struct MongoSweetRepository {
    collection: Collection<SweetDocument>,
}

impl MongoSweetRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION_NAME)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<SweetDocument>(collection_name);
        Self { collection }
    }

    /// Create the listing and search indexes. Safe to call on every startup.
    pub async fn init_indexes(&self) -> SweetResult<()> {
        let indexes = vec![
            // Listing order
            IndexModel::builder()
                .keys(doc! { "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "category": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category_created_at".to_string())
                        .build(),
                )
                .build(),
            // Price range queries
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(IndexOptions::builder().name("idx_price".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!(collection = %self.collection.name(), "Sweet indexes created successfully");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<SweetDocument> {
        &self.collection
    }

    /// Newest first; `_id` breaks ties between equal timestamps.
    fn sort_order() -> Document {
        doc! { "createdAt": -1, "_id": -1 }
    }

    fn by_id(id: ObjectId) -> Document {
        doc! { "_id": id }
    }

    /// Matches only when at least `quantity` is in stock
    fn stock_guard(id: ObjectId, quantity: i64) -> Document {
        doc! { "_id": id, "quantity": { "$gte": quantity } }
    }

    fn stock_change(delta: i64) -> Document {
        doc! {
            "$inc": { "quantity": delta },
            "$set": { "updatedAt": bson::DateTime::now() }
        }
    }

    fn return_updated() -> FindOneAndUpdateOptions {
        FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build()
    }
}

#[async_trait]
impl SweetRepository for MongoSweetRepository {
    #[instrument(skip(self, input), fields(sweet_name = %input.name))]
    async fn create(&self, input: NewSweet) -> SweetResult<Sweet> {
        let document = SweetDocument::new(input);

        self.collection.insert_one(&document).await?;

        tracing::info!(sweet_id = %document.id, "Sweet created successfully");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> SweetResult<Option<Sweet>> {
        let document = self.collection.find_one(Self::by_id(id)).await?;
        Ok(document.map(Sweet::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: SweetQuery) -> SweetResult<Vec<Sweet>> {
        let options = FindOptions::builder().sort(Self::sort_order()).build();

        let cursor = self
            .collection
            .find(query.to_filter())
            .with_options(options)
            .await?;
        let documents: Vec<SweetDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(Sweet::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> SweetResult<Option<Sweet>> {
        let deleted = self.collection.find_one_and_delete(Self::by_id(id)).await?;

        if deleted.is_some() {
            tracing::info!(sweet_id = %id, "Sweet deleted successfully");
        }
        Ok(deleted.map(Sweet::from))
    }

    #[instrument(skip(self))]
    async fn decrement_stock(&self, id: ObjectId, quantity: i64) -> SweetResult<Option<Sweet>> {
        let updated = self
            .collection
            .find_one_and_update(Self::stock_guard(id, quantity), Self::stock_change(-quantity))
            .with_options(Self::return_updated())
            .await?;

        Ok(updated.map(Sweet::from))
    }

    #[instrument(skip(self))]
    async fn increment_stock(&self, id: ObjectId, quantity: i64) -> SweetResult<Option<Sweet>> {
        let updated = self
            .collection
            .find_one_and_update(Self::by_id(id), Self::stock_change(quantity))
            .with_options(Self::return_updated())
            .await?;

        Ok(updated.map(Sweet::from))
    }
}
