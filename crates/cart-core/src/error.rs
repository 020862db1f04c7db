//! # Cart Error Types
//!
//! Typed error handling for the cart state container and the catalog loader.
//! Cart operations return `Result<T, CartError>`.

use thiserror::Error;

/// Error raised by a cart mutation.
///
/// A failed mutation never leaves the cart partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// No line exists for the requested item
    #[error("Item not in cart: {item_id}")]
    NotFound { item_id: String },
}

impl CartError {
    pub fn not_found(item_id: impl Into<String>) -> Self {
        CartError::NotFound {
            item_id: item_id.into(),
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CartError::NotFound { .. } => 404,
        }
    }
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;

/// Errors raised while loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file is not valid TOML or does not match the item schema
    #[error("Catalog parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Two catalog entries share the same id
    #[error("Duplicate item id in catalog: {item_id}")]
    DuplicateId { item_id: String },

    /// Unit price above `Price::MAX`
    #[error("Price out of range for {item_id}: {cents} cents")]
    PriceOutOfRange { item_id: String, cents: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = CartError::not_found("sku-42");
        assert_eq!(err.to_string(), "Item not in cart: sku-42");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_duplicate_id_message() {
        let err = CatalogError::DuplicateId {
            item_id: "a".into(),
        };
        assert_eq!(err.to_string(), "Duplicate item id in catalog: a");
    }
}
