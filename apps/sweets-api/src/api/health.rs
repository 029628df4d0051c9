//! Readiness endpoint backed by a MongoDB ping

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::mongodb::check_health_detailed;
use mongodb::Database;
use serde_json::Value;

/// `GET /ready`: 200 while MongoDB answers, 503 otherwise.
pub fn router(db: Database) -> Router {
    Router::new().route("/ready", get(ready)).with_state(db)
}

async fn ready(
    State(db): State<Database>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let mongo_check: HealthCheckFuture = Box::pin(async move {
        let status = check_health_detailed(&db).await;
        if status.healthy {
            Ok(())
        } else {
            Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
        }
    });

    run_health_checks(vec![("mongodb", mongo_check)]).await
}
