//! Sweets Domain
//!
//! Inventory management for a sweet shop, stored in MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, purchase/restock rules
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, search query
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_sweets::{handlers, MongoSweetRepository, SweetService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("sweet_shop");
//!
//! let repository = MongoSweetRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let router = handlers::router(SweetService::new(repository));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod query;
pub mod repository;
pub mod service;

pub use error::{SweetError, SweetResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateSweet, DeleteSweetResponse, NewSweet, PurchaseDetails, PurchaseResponse,
    RestockDetails, RestockResponse, StockRequest, Sweet, SweetDocument,
};
pub use mongodb::MongoSweetRepository;
pub use query::SweetQuery;
pub use repository::SweetRepository;
pub use service::SweetService;
