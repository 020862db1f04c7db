//! # Cart State
//!
//! Cart lines, aggregate totals, and the reducer that applies cart intents.
//!
//! ```text
//! CartState ──reduce(CartIntent)──→ CartResult<CartState>
//! ```
//!
//! `reduce` never touches `self`; it hands back a fresh state or an error.

use crate::error::{CartError, CartResult};
use crate::product::{Item, Price};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest quantity a single line can reach; further increments are no-ops
pub const MAX_QUANTITY: u32 = 10_000;

/// A catalog item together with the quantity selected for purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: Item,

    /// Always at least 1
    pub quantity: u32,
}

impl CartLine {
    fn new(item: Item) -> Self {
        Self { item, quantity: 1 }
    }

    /// Unit price times quantity
    pub fn subtotal(&self) -> Price {
        self.item.price * self.quantity
    }
}

/// A cart mutation expressed as data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartIntent {
    /// Put an item in the cart with quantity 1. No-op if already present.
    Add(Item),
    /// Raise a line's quantity by one
    Increment(String),
    /// Lower a line's quantity by one, never below 1
    Decrement(String),
    /// Drop a line and all its units
    Delete(String),
}

impl CartIntent {
    /// Id of the item this intent targets
    pub fn item_id(&self) -> &str {
        match self {
            CartIntent::Add(item) => &item.id,
            CartIntent::Increment(id) | CartIntent::Decrement(id) | CartIntent::Delete(id) => id,
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            CartIntent::Add(_) => "add",
            CartIntent::Increment(_) => "increment",
            CartIntent::Decrement(_) => "decrement",
            CartIntent::Delete(_) => "delete",
        }
    }
}

/// Snapshot of a cart: its lines plus running totals.
///
/// Fields are private; a `CartState` is only ever produced by `default()`,
/// [`CartState::reduce`] or [`CartState::with_item`], so `total_items` and `total_price` always match
/// the lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartState {
    lines: BTreeMap<String, CartLine>,
    total_items: u32,
    total_price: Price,
}

impl CartState {
    /// Empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an intent, returning the resulting state.
    ///
    /// Fails with [`CartError::NotFound`] when increment, decrement or delete
    /// names an item that has no line. An add or increment that would push a
    /// line past [`MAX_QUANTITY`] or overflow the totals leaves the state as is.
    pub fn reduce(&self, intent: CartIntent) -> CartResult<CartState> {
        match intent {
            CartIntent::Add(item) => Ok(self.with_item(item)),
            other => {
                let mut next = self.clone();
                next.apply(other)?;
                Ok(next)
            }
        }
    }

    /// State with `item` added at quantity 1; unchanged if a line already exists.
    pub fn with_item(&self, item: Item) -> CartState {
        let mut next = self.clone();
        if next.lines.contains_key(&item.id) {
            return next;
        }
        if let (Some(total_items), Some(total_price)) = (
            next.total_items.checked_add(1),
            next.total_price.checked_add(item.price),
        ) {
            next.total_items = total_items;
            next.total_price = total_price;
            next.lines.insert(item.id.clone(), CartLine::new(item));
        }
        next
    }

    // Every lookup happens before the first write, so an Err leaves `self` as it was.
    fn apply(&mut self, intent: CartIntent) -> CartResult<()> {
        match intent {
            CartIntent::Add(item) => *self = self.with_item(item),
            CartIntent::Increment(id) => {
                let line = self.lines.get_mut(&id).ok_or_else(|| CartError::not_found(&id))?;
                if line.quantity >= MAX_QUANTITY {
                    return Ok(());
                }
                if let (Some(total_items), Some(total_price)) = (
                    self.total_items.checked_add(1),
                    self.total_price.checked_add(line.item.price),
                ) {
                    line.quantity += 1;
                    self.total_items = total_items;
                    self.total_price = total_price;
                }
            }
            CartIntent::Decrement(id) => {
                let line = self.lines.get_mut(&id).ok_or_else(|| CartError::not_found(&id))?;
                if line.quantity > 1 {
                    line.quantity -= 1;
                    self.total_items -= 1;
                    self.total_price = self.total_price - line.item.price;
                }
            }
            CartIntent::Delete(id) => {
                let line = self.lines.remove(&id).ok_or_else(|| CartError::not_found(&id))?;
                self.total_items -= line.quantity;
                self.total_price = self.total_price - line.subtotal();
            }
        }
        Ok(())
    }

    /// Line for an item, if present
    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.get(id)
    }

    /// Lines ordered by item id
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lines.contains_key(id)
    }

    /// Sum of all line quantities
    pub fn total_items(&self) -> u32 {
        self.total_items
    }

    /// Sum of all line subtotals
    pub fn total_price(&self) -> Price {
        self.total_price
    }

    /// Number of distinct lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Recompute both totals from the lines and compare with the running ones.
    /// Also checks that no line has quantity 0 and every key matches its item id.
    pub fn is_consistent(&self) -> bool {
        let items: u64 = self.lines.values().map(|l| u64::from(l.quantity)).sum();
        let price: Price = self.lines.values().map(CartLine::subtotal).sum();
        items == u64::from(self.total_items)
            && price == self.total_price
            && self
                .lines
                .iter()
                .all(|(id, line)| line.quantity >= 1 && *id == line.item.id)
    }
}
