//! # cart-api
//!
//! HTTP presentation layer for shop-cart-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Catalog browsing endpoints with category filtering
//! - Cart endpoints that read the session cart and dispatch cart intents
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/products` | List products (`?category=`) |
//! | GET | `/api/v1/products/{id}` | Get product |
//! | GET | `/api/v1/categories` | List categories |
//! | GET | `/api/v1/cart` | Cart snapshot |
//! | DELETE | `/api/v1/cart` | Empty cart |
//! | POST | `/api/v1/cart/items` | Add item |
//! | POST | `/api/v1/cart/items/{id}/increment` | Increment quantity |
//! | POST | `/api/v1/cart/items/{id}/decrement` | Decrement quantity |
//! | DELETE | `/api/v1/cart/items/{id}` | Remove line |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
