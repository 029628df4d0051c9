//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Sweets API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sweet Shop API",
        version = "0.1.0",
        description = "Inventory management for a sweet shop: add, search, purchase and restock sweets",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/api/sweets", api = domain_sweets::ApiDoc)
    ),
    tags(
        (name = "Sweets", description = "Sweet shop inventory endpoints")
    )
)]
pub struct ApiDoc;
