//! HTTP handlers for the Sweets API

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AppError, ObjectIdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::SweetResult;
use crate::models::{
    CreateSweet, DeleteSweetResponse, PurchaseDetails, PurchaseResponse, RestockDetails,
    RestockResponse, StockRequest, Sweet,
};
use crate::query::SweetQuery;
use crate::repository::SweetRepository;
use crate::service::SweetService;

pub const DELETED_MESSAGE: &str = "Sweet deleted successfully";
pub const PURCHASED_MESSAGE: &str = "Purchase successful";
pub const RESTOCKED_MESSAGE: &str = "Restock successful";

/// OpenAPI documentation for Sweets API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_sweets,
        create_sweet,
        search_sweets,
        get_sweet,
        delete_sweet,
        purchase_sweet,
        restock_sweet,
    ),
    components(
        schemas(
            Sweet, CreateSweet, StockRequest, PurchaseDetails, RestockDetails,
            DeleteSweetResponse, PurchaseResponse, RestockResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Sweets", description = "Sweet shop inventory endpoints")
    )
)]
pub struct ApiDoc;

/// Create the sweets router with all HTTP endpoints
pub fn router<R: SweetRepository + 'static>(service: SweetService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_sweets).post(create_sweet))
        .route("/search", get(search_sweets))
        .route("/{id}", get(get_sweet).delete(delete_sweet))
        .route("/{id}/purchase", post(purchase_sweet))
        .route("/{id}/restock", post(restock_sweet))
        .with_state(shared_service)
}

/// List all sweets, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Sweets",
    responses(
        (status = 200, description = "All sweets sorted by creation time, newest first", body = Vec<Sweet>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_sweets<R: SweetRepository>(
    State(service): State<Arc<SweetService<R>>>,
) -> SweetResult<Json<Vec<Sweet>>> {
    let sweets = service.list_sweets().await?;
    Ok(Json(sweets))
}

/// Add a new sweet
#[utoipa::path(
    post,
    path = "",
    tag = "Sweets",
    request_body = CreateSweet,
    responses(
        (status = 201, description = "Sweet created successfully", body = Sweet),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_sweet<R: SweetRepository>(
    State(service): State<Arc<SweetService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateSweet>,
) -> SweetResult<impl IntoResponse> {
    let sweet = service.create_sweet(input).await?;
    Ok((StatusCode::CREATED, Json(sweet)))
}

/// Search sweets by name, category and price range
#[utoipa::path(
    get,
    path = "/search",
    tag = "Sweets",
    params(SweetQuery),
    responses(
        (status = 200, description = "Sweets matching every given filter, newest first", body = Vec<Sweet>),
        (status = 400, description = "Unparsable price bound"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_sweets<R: SweetRepository>(
    State(service): State<Arc<SweetService<R>>>,
    query: Result<Query<SweetQuery>, QueryRejection>,
) -> Result<Json<Vec<Sweet>>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let sweets = service.search_sweets(query).await?;
    Ok(Json(sweets))
}

/// Get a sweet by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Sweets",
    params(
        ("id" = String, Path, description = "Sweet ObjectId")
    ),
    responses(
        (status = 200, description = "Sweet found", body = Sweet),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_sweet<R: SweetRepository>(
    State(service): State<Arc<SweetService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> SweetResult<Json<Sweet>> {
    let sweet = service.get_sweet(id).await?;
    Ok(Json(sweet))
}

/// Delete a sweet
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Sweets",
    params(
        ("id" = String, Path, description = "Sweet ObjectId")
    ),
    responses(
        (status = 200, description = "Sweet deleted", body = DeleteSweetResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_sweet<R: SweetRepository>(
    State(service): State<Arc<SweetService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> SweetResult<Json<DeleteSweetResponse>> {
    let sweet = service.delete_sweet(id).await?;
    Ok(Json(DeleteSweetResponse {
        message: DELETED_MESSAGE.to_string(),
        sweet,
    }))
}

/// Purchase a quantity of a sweet
#[utoipa::path(
    post,
    path = "/{id}/purchase",
    tag = "Sweets",
    params(
        ("id" = String, Path, description = "Sweet ObjectId")
    ),
    request_body = StockRequest,
    responses(
        (status = 200, description = "Stock decremented", body = PurchaseResponse),
        (status = 400, description = "Invalid ID, invalid quantity or not enough stock"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn purchase_sweet<R: SweetRepository>(
    State(service): State<Arc<SweetService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(request): ValidatedJson<StockRequest>,
) -> SweetResult<Json<PurchaseResponse>> {
    let (sweet, purchase_details) = service.purchase_sweet(id, request).await?;
    Ok(Json(PurchaseResponse {
        message: PURCHASED_MESSAGE.to_string(),
        sweet,
        purchase_details,
    }))
}

/// Restock a sweet
#[utoipa::path(
    post,
    path = "/{id}/restock",
    tag = "Sweets",
    params(
        ("id" = String, Path, description = "Sweet ObjectId")
    ),
    request_body = StockRequest,
    responses(
        (status = 200, description = "Stock incremented", body = RestockResponse),
        (status = 400, description = "Invalid ID or invalid quantity"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn restock_sweet<R: SweetRepository>(
    State(service): State<Arc<SweetService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(request): ValidatedJson<StockRequest>,
) -> SweetResult<Json<RestockResponse>> {
    let (sweet, restock_details) = service.restock_sweet(id, request).await?;
    Ok(Json(RestockResponse {
        message: RESTOCKED_MESSAGE.to_string(),
        sweet,
        restock_details,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewSweet, SweetDocument};
    use crate::repository::MockSweetRepository;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use mongodb::bson::oid::ObjectId;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn stored(price: f64, quantity: i64) -> Sweet {
        SweetDocument::new(NewSweet {
            name: "Rasgulla".to_string(),
            category: "Bengali".to_string(),
            price,
            quantity,
        })
        .into()
    }

    fn app(mock_repo: MockSweetRepository) -> Router {
        router(SweetService::new(mock_repo))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_returns_201() {
        let mut mock_repo = MockSweetRepository::new();
        mock_repo
            .expect_create()
            .returning(|input| Ok(SweetDocument::new(input).into()));

        let response = app(mock_repo)
            .oneshot(json_request(
                "POST",
                "/",
                json!({"name": "Ladoo", "category": "Indian", "price": 3.5, "quantity": 12}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["name"], "Ladoo");
        assert_eq!(body["quantity"], 12);
        assert_eq!(body["_id"].as_str().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn test_create_negative_price_is_400() {
        let response = app(MockSweetRepository::new())
            .oneshot(json_request(
                "POST",
                "/",
                json!({"name": "Ladoo", "category": "Indian", "price": -10, "quantity": 12}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("price"));
    }

    #[tokio::test]
    async fn test_create_missing_fields_is_400() {
        let response = app(MockSweetRepository::new())
            .oneshot(json_request("POST", "/", json!({"name": "Ladoo"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        let details = body["details"].as_object().unwrap();
        assert!(details.contains_key("category"));
        assert!(details.contains_key("price"));
        assert!(details.contains_key("quantity"));
    }

    #[tokio::test]
    async fn test_create_mistyped_price_is_invalid_json() {
        let response = app(MockSweetRepository::new())
            .oneshot(json_request(
                "POST",
                "/",
                json!({"name": "Ladoo", "category": "Indian", "price": "abc", "quantity": 1}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn test_list_returns_repository_order() {
        let newer = stored(1.0, 1);
        let older = stored(2.0, 2);
        let expected = vec![newer.id.to_hex(), older.id.to_hex()];

        let mut mock_repo = MockSweetRepository::new();
        mock_repo
            .expect_list()
            .returning(move |_| Ok(vec![newer.clone(), older.clone()]));

        let response = app(mock_repo).oneshot(empty_request("GET", "/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_search_passes_query_to_repository() {
        let mut mock_repo = MockSweetRepository::new();
        mock_repo
            .expect_list()
            .withf(|query| {
                query.name() == Some("jamun")
                    && query.category() == Some("Indian")
                    && query.min_price == Some(10.0)
                    && query.max_price == Some(20.0)
            })
            .returning(|_| Ok(vec![]));

        let response = app(mock_repo)
            .oneshot(empty_request(
                "GET",
                "/search?name=jamun&category=Indian&minPrice=10&maxPrice=20",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_search_bad_price_is_400() {
        let response = app(MockSweetRepository::new())
            .oneshot(empty_request("GET", "/search?minPrice=cheap"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_get_malformed_id_is_400() {
        let response = app(MockSweetRepository::new())
            .oneshot(empty_request("GET", "/not-an-id"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "INVALID_ID");
    }

    #[tokio::test]
    async fn test_get_missing_is_404() {
        let mut mock_repo = MockSweetRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));

        let uri = format!("/{}", ObjectId::new().to_hex());
        let response = app(mock_repo).oneshot(empty_request("GET", &uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "Sweet not found");
    }

    #[tokio::test]
    async fn test_delete_returns_deleted_sweet() {
        let sweet = stored(4.0, 8);
        let id = sweet.id;

        let mut mock_repo = MockSweetRepository::new();
        mock_repo
            .expect_delete()
            .withf(move |candidate| *candidate == id)
            .returning(move |_| Ok(Some(sweet.clone())));

        let uri = format!("/{}", id.to_hex());
        let response = app(mock_repo).oneshot(empty_request("DELETE", &uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Sweet deleted successfully");
        assert_eq!(body["sweet"]["_id"], id.to_hex());
    }

    #[tokio::test]
    async fn test_delete_missing_is_404() {
        let mut mock_repo = MockSweetRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(None));

        let uri = format!("/{}", ObjectId::new().to_hex());
        let response = app(mock_repo).oneshot(empty_request("DELETE", &uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_purchase_success_payload() {
        let sweet = stored(50.0, 20);
        let id = sweet.id;
        let after = Sweet {
            quantity: 15,
            ..sweet
        };

        let mut mock_repo = MockSweetRepository::new();
        mock_repo
            .expect_decrement_stock()
            .returning(move |_, _| Ok(Some(after.clone())));

        let uri = format!("/{}/purchase", id.to_hex());
        let response = app(mock_repo)
            .oneshot(json_request("POST", &uri, json!({"quantity": 5})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Purchase successful");
        assert_eq!(body["sweet"]["quantity"], 15);
        assert_eq!(
            body["purchaseDetails"],
            json!({"purchasedQuantity": 5, "totalCost": 250.0, "remainingStock": 15})
        );
    }

    #[tokio::test]
    async fn test_purchase_insufficient_stock_is_400() {
        let sweet = stored(1.0, 5);
        let id = sweet.id;

        let mut mock_repo = MockSweetRepository::new();
        mock_repo.expect_decrement_stock().returning(|_, _| Ok(None));
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(sweet.clone())));

        let uri = format!("/{}/purchase", id.to_hex());
        let response = app(mock_repo)
            .oneshot(json_request("POST", &uri, json!({"quantity": 10})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["message"],
            "Not enough stock available. Available: 5, Requested: 10"
        );
    }

    #[tokio::test]
    async fn test_purchase_invalid_quantities_are_400() {
        let uri = format!("/{}/purchase", ObjectId::new().to_hex());

        for body in [
            json!({"quantity": 0}),
            json!({"quantity": -3}),
            json!({"quantity": 2.5}),
            json!({"quantity": "5"}),
            json!({}),
        ] {
            let response = app(MockSweetRepository::new())
                .oneshot(json_request("POST", &uri, body.clone()))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
            assert_eq!(
                json_body(response).await["message"],
                "Quantity must be a positive number"
            );
        }
    }

    #[tokio::test]
    async fn test_restock_success_payload() {
        let sweet = stored(5.0, 1100);
        let id = sweet.id;

        let mut mock_repo = MockSweetRepository::new();
        mock_repo
            .expect_increment_stock()
            .returning(move |_, _| Ok(Some(sweet.clone())));

        let uri = format!("/{}/restock", id.to_hex());
        let response = app(mock_repo)
            .oneshot(json_request("POST", &uri, json!({"quantity": 1000})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Restock successful");
        assert_eq!(
            body["restockDetails"],
            json!({"restockedQuantity": 1000, "previousStock": 100, "newStock": 1100})
        );
    }

    #[tokio::test]
    async fn test_restock_malformed_id_is_400() {
        let response = app(MockSweetRepository::new())
            .oneshot(json_request("POST", "/123/restock", json!({"quantity": 1})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "INVALID_ID");
    }

    #[tokio::test]
    async fn test_database_failure_is_generic_500() {
        let mut mock_repo = MockSweetRepository::new();
        mock_repo
            .expect_list()
            .returning(|_| Err(crate::error::SweetError::Database("connection reset".into())));

        let response = app(mock_repo).oneshot(empty_request("GET", "/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(!body["message"].as_str().unwrap().contains("connection reset"));
    }
}
