//! Output records: one Session per simulated occasion and the
//! CartEvents it produced.
//!
//! RULE: Records are built only by the emitter and never mutated after.
//! Callers receive them behind shared references.

use crate::types::{
    DietaryToggle, EventId, ItemId, MealPeriod, Price, RestaurantId, SessionId, UserId,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Text layout of every timestamp written to storage.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub start_time: NaiveDateTime,
    pub meal_period: MealPeriod,
    pub zone: String,
    pub dietary_toggle: DietaryToggle,
    pub order_completed: bool,
    pub final_order_value: Price,
    pub num_cart_items: u32,
}

/// One cart interaction.
///
/// Organic adds carry a cart position and no recommendation fields.
/// Recommendation events always carry `was_accepted` and
/// `position_shown`; only accepted ones carry a cart position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartEvent {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub item_id: ItemId,
    pub timestamp: NaiveDateTime,
    pub cart_position: Option<u32>,
    pub was_recommendation: bool,
    pub was_accepted: Option<bool>,
    pub position_shown: Option<u32>,
}

impl CartEvent {
    /// True for events that put an item in the cart.
    pub fn entered_cart(&self) -> bool {
        self.cart_position.is_some()
    }
}
