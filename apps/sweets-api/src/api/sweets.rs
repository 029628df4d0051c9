//! Sweets API routes

use axum::Router;
use domain_sweets::{MongoSweetRepository, SweetService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoSweetRepository::new(&state.db);
    let service = SweetService::new(repository);
    handlers::router(service)
}

pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let repository = MongoSweetRepository::new(&state.db);
    repository.init_indexes().await?;
    Ok(())
}
