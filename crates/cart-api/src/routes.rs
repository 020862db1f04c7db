//! # Routes
//!
//! Axum router configuration for catalog browsing and the session cart.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Catalog:
///   - GET  /api/v1/products[?category=] - List products
///   - GET  /api/v1/products/{item_id} - Get product by ID
///   - GET  /api/v1/categories - List categories
///
/// - Cart:
///   - GET    /api/v1/cart - Cart snapshot
///   - DELETE /api/v1/cart - Empty the cart
///   - POST   /api/v1/cart/items - Add item (`{"item_id": ".."}`)
///   - POST   /api/v1/cart/items/{item_id}/increment
///   - POST   /api/v1/cart/items/{item_id}/decrement
///   - DELETE /api/v1/cart/items/{item_id}
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog_routes = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/{item_id}", get(handlers::get_product))
        .route("/categories", get(handlers::list_categories));

    let cart_routes = Router::new()
        .route("/", get(handlers::get_cart).delete(handlers::clear_cart))
        .route("/items", post(handlers::add_to_cart))
        .route("/items/{item_id}", delete(handlers::delete_item))
        .route("/items/{item_id}/increment", post(handlers::increment_item))
        .route("/items/{item_id}/decrement", post(handlers::decrement_item));

    let api_routes = Router::new()
        .merge(catalog_routes)
        .nest("/cart", cart_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use cart_core::{Catalog, Item, Price};
    use serde_json::{json, Value};

    fn test_state() -> AppState {
        let catalog = Catalog::from_items([
            Item::new("1", "Espresso Cup", Price::new(10.0), "kitchen"),
            Item::new("2", "Desk Lamp", Price::new(15.0), "office"),
            Item::new("3", "Teapot", Price::new(24.5), "kitchen"),
        ])
        .unwrap();
        AppState::with_catalog(AppConfig::default(), catalog)
    }

    fn server() -> TestServer {
        TestServer::new(create_router(test_state())).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = server().get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_products_by_category() {
        let server = server();

        let all = server.get("/api/v1/products").await.json::<Value>();
        assert_eq!(all["count"], 3);

        let kitchen = server
            .get("/api/v1/products")
            .add_query_param("category", "kitchen")
            .await
            .json::<Value>();
        assert_eq!(kitchen["count"], 2);
        assert_eq!(kitchen["products"][0]["id"], "1");
        assert_eq!(kitchen["products"][1]["id"], "3");

        let categories = server.get("/api/v1/categories").await.json::<Value>();
        assert_eq!(categories["categories"], json!(["kitchen", "office"]));
    }

    #[tokio::test]
    async fn test_get_product() {
        let server = server();
        let lamp = server.get("/api/v1/products/2").await.json::<Value>();
        assert_eq!(lamp["name"], "Desk Lamp");
        assert_eq!(lamp["price"], 1500);

        server
            .get("/api/v1/products/99")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cart_walkthrough() {
        let server = server();

        let cart = server
            .post("/api/v1/cart/items")
            .json(&json!({ "item_id": "1" }))
            .await
            .json::<Value>();
        assert_eq!(cart["lines"]["1"]["quantity"], 1);
        assert_eq!(cart["total_items"], 1);
        assert_eq!(cart["total_price"], 1000);

        let cart = server
            .post("/api/v1/cart/items/1/increment")
            .await
            .json::<Value>();
        assert_eq!(cart["lines"]["1"]["quantity"], 2);
        assert_eq!(cart["total_price"], 2000);

        let cart = server
            .post("/api/v1/cart/items/1/decrement")
            .await
            .json::<Value>();
        assert_eq!(cart["total_items"], 1);
        assert_eq!(cart["total_price"], 1000);

        let cart = server.delete("/api/v1/cart/items/1").await.json::<Value>();
        assert_eq!(cart["lines"], json!({}));
        assert_eq!(cart["total_items"], 0);
        assert_eq!(cart["total_price"], 0);
    }

    #[tokio::test]
    async fn test_add_twice_and_clear() {
        let server = server();
        for id in ["1", "2", "1"] {
            server
                .post("/api/v1/cart/items")
                .json(&json!({ "item_id": id }))
                .await
                .assert_status_ok();
        }

        let cart = server.get("/api/v1/cart").await.json::<Value>();
        assert_eq!(cart["total_items"], 2);
        assert_eq!(cart["total_price"], 2500);

        let cart = server.delete("/api/v1/cart").await.json::<Value>();
        assert_eq!(cart["total_items"], 0);
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let server = server();

        server
            .post("/api/v1/cart/items")
            .json(&json!({ "item_id": "99" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        for response in [
            server.post("/api/v1/cart/items/2/increment").await,
            server.post("/api/v1/cart/items/2/decrement").await,
            server.delete("/api/v1/cart/items/2").await,
        ] {
            response.assert_status(StatusCode::NOT_FOUND);
            assert_eq!(response.json::<Value>()["error"], "Item not in cart: 2");
        }

        let cart = server.get("/api/v1/cart").await.json::<Value>();
        assert_eq!(cart["total_items"], 0);
    }
}
