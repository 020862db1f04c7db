//! # cart-core
//!
//! Cart state container and catalog types for shop-cart.
//!
//! This crate provides:
//! - `Item`, `Price` and `Catalog` for the read-only product catalog
//! - `CartState`, `CartLine` and `CartIntent` with a pure reducer
//! - `CartStore`, the single-writer session container with change subscription
//! - `CartError` / `CatalogError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use cart_core::{CartStore, Item, Price};
//!
//! let store = CartStore::new();
//! store.add_item(Item::new("1", "Espresso Cup", Price::new(10.0), "kitchen"));
//! store.increment_item("1").unwrap();
//!
//! let state = store.state();
//! assert_eq!(state.total_items(), 2);
//! assert_eq!(state.total_price(), Price::new(20.0));
//! ```

pub mod cart;
pub mod error;
pub mod product;
pub mod store;

// Re-exports for convenience
pub use cart::{CartIntent, CartLine, CartState, MAX_QUANTITY};
pub use error::{CartError, CartResult, CatalogError};
pub use product::{Catalog, Item, Price};
pub use store::{CartStore, CartUpdate};
