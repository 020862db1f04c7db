//! # Catalog Types
//!
//! Item and catalog types for shop-cart.
//! The catalog is loaded from `config/products.toml` and is read-only to the cart.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// Unit price in the smallest currency unit (cents).
///
/// Integer minor units keep cart totals exact; no rounding drift accumulates
/// across increments and decrements. Operators saturate instead of wrapping;
/// code that must stay exact uses the `checked_*` methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    /// Amount in smallest currency unit
    amount: u64,
}

impl Price {
    pub const ZERO: Price = Price { amount: 0 };

    /// Largest unit price a catalog accepts (10 billion in major units)
    pub const MAX: Price = Price {
        amount: 1_000_000_000_000,
    };

    /// Create a price from a decimal amount (e.g. `10.99`).
    /// Negative and non-finite inputs become zero; larger amounts clamp to [`Price::MAX`].
    pub fn new(amount: f64) -> Self {
        let cents = (amount * 100.0).round();
        if cents.is_finite() && cents > 0.0 {
            Self {
                amount: (cents as u64).min(Self::MAX.amount),
            }
        } else {
            Self::ZERO
        }
    }

    /// Create a price from smallest unit (cents)
    pub const fn from_cents(amount: u64) -> Self {
        Self { amount }
    }

    /// Amount in cents
    pub const fn cents(&self) -> u64 {
        self.amount
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.amount as f64 / 100.0
    }

    pub fn checked_add(self, rhs: Price) -> Option<Price> {
        self.amount.checked_add(rhs.amount).map(Price::from_cents)
    }

    pub fn checked_sub(self, rhs: Price) -> Option<Price> {
        self.amount.checked_sub(rhs.amount).map(Price::from_cents)
    }

    pub fn checked_mul(self, quantity: u32) -> Option<Price> {
        self.amount
            .checked_mul(u64::from(quantity))
            .map(Price::from_cents)
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price::from_cents(self.amount.saturating_add(rhs.amount))
    }
}

impl Sub for Price {
    type Output = Price;

    fn sub(self, rhs: Price) -> Price {
        Price::from_cents(self.amount.saturating_sub(rhs.amount))
    }
}

impl Mul<u32> for Price {
    type Output = Price;

    fn mul(self, quantity: u32) -> Price {
        Price::from_cents(self.amount.saturating_mul(u64::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

/// A purchasable catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item identifier, stable for the lifetime of the catalog
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Unit price
    pub price: Price,

    /// Classification label (used for browsing only)
    pub category: String,

    /// Optional image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Price,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            category: category.into(),
            image_url: None,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// On-disk catalog layout: a list of `[[items]]` tables
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<Item>,
}

/// Immutable, ordered catalog of items
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a catalog, keeping declaration order.
    /// Ids must be unique and no price may exceed [`Price::MAX`].
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Result<Self, CatalogError> {
        let items: Vec<Item> = items.into_iter().collect();
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.price > Price::MAX {
                return Err(CatalogError::PriceOutOfRange {
                    item_id: item.id.clone(),
                    cents: item.price.cents(),
                });
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    item_id: item.id.clone(),
                });
            }
        }
        Ok(Self { items })
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(toml_str)?;
        Self::from_items(file.items)
    }

    /// Find an item by ID
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// All items in declaration order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Items in the given category, in declaration order
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |item| item.category == category)
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for item in &self.items {
            if !categories.contains(&item.category.as_str()) {
                categories.push(&item.category);
            }
        }
        categories
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
