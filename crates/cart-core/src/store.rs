//! # Cart Store
//!
//! Owns the cart state for one shopping session and serializes every mutation.
//!
//! The state lives inside a `tokio::sync::watch` channel. Each mutation runs
//! inside `send_if_modified`, which holds the channel's write lock for the
//! whole read-reduce-replace step, so concurrent callers are applied one at a
//! time and readers only ever see states between two operations.
//!
//! ```text
//!  presentation ──dispatch(intent)──→ CartStore ──watch──→ subscribers
//!       ▲                                 │
//!       └──────────── state() ────────────┘
//! ```

use crate::cart::{CartIntent, CartState};
use crate::error::CartResult;
use crate::product::Item;
use chrono::{DateTime, Utc};
use std::convert::Infallible;
use std::fmt::Display;
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

/// Result of one applied mutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartUpdate {
    /// False for the duplicate-add and decrement-at-one no-ops
    pub changed: bool,
    /// The state this mutation produced, taken while the write lock was held
    pub state: CartState,
}

/// Cart state container for a single session.
///
/// Construct one at session start and hand it (usually behind `Arc`) to the
/// presentation layer; dropping it ends the session.
#[derive(Debug)]
pub struct CartStore {
    session_id: Uuid,
    opened_at: DateTime<Utc>,
    state: watch::Sender<CartState>,
}

impl CartStore {
    /// Open a new session with an empty cart
    pub fn new() -> Self {
        let (state, _) = watch::channel(CartState::new());
        let store = Self {
            session_id: Uuid::new_v4(),
            opened_at: Utc::now(),
            state,
        };
        debug!(session = %store.session_id, "cart session opened");
        store
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Owned snapshot of the current state
    pub fn state(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified after every mutation that changes the cart
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// Apply an intent atomically.
    ///
    /// On error the cart is left exactly as it was.
    pub fn dispatch(&self, intent: CartIntent) -> CartResult<CartUpdate> {
        let name = intent.name();
        let item_id = intent.item_id().to_owned();
        self.commit(name, &item_id, |state| state.reduce(intent))
    }

    /// Put an item in the cart. No-op when a line for it already exists.
    pub fn add_item(&self, item: Item) -> CartUpdate {
        let item_id = item.id.clone();
        match self.commit("add", &item_id, |state| {
            Ok::<_, Infallible>(state.with_item(item))
        }) {
            Ok(update) => update,
            Err(never) => match never {},
        }
    }

    /// Raise a line's quantity by one and return the resulting state
    pub fn increment_item(&self, id: &str) -> CartResult<CartState> {
        self.dispatch(CartIntent::Increment(id.to_owned()))
            .map(|update| update.state)
    }

    /// Lowers the quantity by one. A line at quantity 1 stays at 1; use
    /// [`CartStore::delete_item`] to remove it.
    pub fn decrement_item(&self, id: &str) -> CartResult<CartState> {
        self.dispatch(CartIntent::Decrement(id.to_owned()))
            .map(|update| update.state)
    }

    pub fn delete_item(&self, id: &str) -> CartResult<CartState> {
        self.dispatch(CartIntent::Delete(id.to_owned()))
            .map(|update| update.state)
    }

    /// Empty the cart
    pub fn clear(&self) -> CartState {
        let cleared = self.state.send_if_modified(|state| {
            if state.is_empty() {
                false
            } else {
                *state = CartState::new();
                true
            }
        });
        debug!(session = %self.session_id, cleared, "cart cleared");
        CartState::new()
    }

    fn commit<E: Display>(
        &self,
        intent: &'static str,
        item_id: &str,
        reduce: impl FnOnce(&CartState) -> Result<CartState, E>,
    ) -> Result<CartUpdate, E> {
        // Overwritten by the closure, which send_if_modified always runs.
        let mut outcome = Ok(CartUpdate::default());
        self.state.send_if_modified(|state| match reduce(state) {
            Ok(next) => {
                let changed = next != *state;
                *state = next;
                outcome = Ok(CartUpdate {
                    changed,
                    state: state.clone(),
                });
                changed
            }
            Err(err) => {
                outcome = Err(err);
                false
            }
        });

        match &outcome {
            Ok(update) => {
                debug_assert!(update.state.is_consistent());
                debug!(
                    session = %self.session_id,
                    intent,
                    item_id,
                    changed = update.changed,
                    total_items = update.state.total_items(),
                    total_cents = update.state.total_price().cents(),
                    "cart intent applied"
                );
            }
            Err(err) => {
                warn!(session = %self.session_id, intent, item_id, "cart intent rejected: {}", err);
            }
        }

        outcome
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}
