//! # Request Handlers
//!
//! Axum request handlers for catalog browsing and the session cart.
//! Every cart mutation answers with the resulting cart snapshot.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cart_core::{CartError, CartState, Item};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Catalog listing filter
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Only list items in this category
    #[serde(default)]
    pub category: Option<String>,
}

/// Add-to-cart request
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Catalog item ID
    pub item_id: String,
}

/// Cart snapshot response
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub session_id: Uuid,
    pub opened_at: DateTime<Utc>,
    #[serde(flatten)]
    pub cart: CartState,
}

impl CartResponse {
    /// Response carrying a snapshot a mutation handed back
    fn new(state: &AppState, cart: CartState) -> Self {
        Self {
            session_id: state.cart.session_id(),
            opened_at: state.cart.opened_at(),
            cart,
        }
    }

    fn current(state: &AppState) -> Self {
        Self::new(state, state.cart.state())
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn cart_error_to_response(err: CartError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn product_not_found(item_id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            format!("Product not found: {}", item_id),
            404,
        )),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "shop-cart",
        "version": env!("CARGO_PKG_VERSION"),
        "session_id": state.cart.session_id(),
    }))
}

/// List catalog items, optionally limited to one category
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> impl IntoResponse {
    let products: Vec<&Item> = match query.category.as_deref() {
        Some(category) => state.catalog.by_category(category).collect(),
        None => state.catalog.items().iter().collect(),
    };
    Json(serde_json::json!({
        "category": query.category,
        "products": products,
        "count": products.len()
    }))
}

/// Get single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let item = state
        .catalog
        .get(&item_id)
        .ok_or_else(|| product_not_found(&item_id))?;

    Ok(Json(item.clone()))
}

/// Distinct catalog categories
pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    let categories = state.catalog.categories();
    Json(serde_json::json!({
        "categories": categories,
        "count": categories.len()
    }))
}

/// Current cart snapshot
pub async fn get_cart(State(state): State<AppState>) -> Json<CartResponse> {
    Json(CartResponse::current(&state))
}

/// Put a catalog item in the cart (no-op if it is already there)
#[instrument(skip(state, request), fields(item_id = %request.item_id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let item = state
        .catalog
        .get(&request.item_id)
        .ok_or_else(|| product_not_found(&request.item_id))?;

    let update = state.cart.add_item(item.clone());
    if update.changed {
        info!("Added {} to cart", item.id);
    }

    Ok(Json(CartResponse::new(&state, update.state)))
}

#[instrument(skip(state))]
pub async fn increment_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .cart
        .increment_item(&item_id)
        .map_err(cart_error_to_response)?;
    Ok(Json(CartResponse::new(&state, cart)))
}

#[instrument(skip(state))]
pub async fn decrement_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .cart
        .decrement_item(&item_id)
        .map_err(cart_error_to_response)?;
    Ok(Json(CartResponse::new(&state, cart)))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .cart
        .delete_item(&item_id)
        .map_err(cart_error_to_response)?;
    info!("Removed {} from cart", item_id);
    Ok(Json(CartResponse::new(&state, cart)))
}

/// Empty the cart
#[instrument(skip(state))]
pub async fn clear_cart(State(state): State<AppState>) -> Json<CartResponse> {
    let cart = state.cart.clear();
    Json(CartResponse::new(&state, cart))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use cart_core::{Catalog, Price};
    use std::collections::BTreeSet;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_cart_error_conversion() {
        let (status, Json(body)) = cart_error_to_response(CartError::not_found("x"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Item not in cart: x");
        assert_eq!(body.code, 404);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_increment_responses_carry_their_own_snapshot() {
        let catalog =
            Catalog::from_items([Item::new("1", "Cup", Price::new(10.0), "kitchen")]).unwrap();
        let state = AppState::with_catalog(AppConfig::default(), catalog);
        state.cart.add_item(state.catalog.items()[0].clone());

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let state = state.clone();
                tokio::spawn(async move {
                    let mut quantities = Vec::new();
                    for _ in 0..50 {
                        let Json(response) =
                            increment_item(State(state.clone()), Path("1".to_string()))
                                .await
                                .unwrap();
                        quantities.push(response.cart.line("1").unwrap().quantity);
                    }
                    quantities
                })
            })
            .collect();

        let mut seen = BTreeSet::new();
        for task in tasks {
            seen.extend(task.await.unwrap());
        }
        assert_eq!(seen, (2..=201).collect::<BTreeSet<u32>>());
    }
}
