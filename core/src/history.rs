//! Past-order history: completed and abandoned orders that precede the
//! simulated sessions, used as training data for the recommender.
//!
//! RULE: History draws only from RngBank::for_history(), so changing the
//! number of orders never shifts any session stream.

use crate::{
    catalog::Catalog,
    config::SimConfig,
    context::{draw_start_time, pick_restaurant},
    rng::SessionRng,
    types::{ItemId, MealPeriod, Price, RestaurantId, UserId},
};
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderRecord {
    pub order_id: String,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub order_time: NaiveDateTime,
    pub meal_period: MealPeriod,
    pub items_ordered: Vec<ItemId>,
    pub order_value: Price,
    pub was_completed: bool,
}

pub fn order_id(index: u64) -> String {
    format!("O{:06}", index + 1)
}

/// Which slice of the window an order falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySplit {
    Train,
    Validation,
    Test,
}

impl HistorySplit {
    pub fn of(order_time: NaiveDateTime, config: &SimConfig) -> Self {
        let start = config.window_start.and_time(NaiveTime::MIN);
        let train_end = start + Duration::weeks(config.history.train_weeks);
        let validation_end = train_end + Duration::weeks(config.history.validation_weeks);
        if order_time < train_end {
            Self::Train
        } else if order_time < validation_end {
            Self::Validation
        } else {
            Self::Test
        }
    }
}

/// Generate `config.history.num_orders` past orders.
///
/// Draw order per order: user, restaurant, item count, items, time,
/// completion. Orders at restaurants with an empty menu are skipped and
/// leave a gap in the order ids. Items come from the whole menu,
/// available or not.
pub fn generate_order_history(
    catalog: &Catalog,
    config: &SimConfig,
    rng: &mut SessionRng,
) -> Vec<OrderRecord> {
    let history = &config.history;
    let users = catalog.users();
    let mut orders = Vec::with_capacity(history.num_orders as usize);
    let mut skipped = 0u64;

    for index in 0..history.num_orders {
        let user = &users[rng.next_u64_below(users.len() as u64) as usize];
        let restaurant =
            pick_restaurant(catalog, user, history.favourite_cuisine_probability, rng);
        let menu = catalog.menu_for(&restaurant.restaurant_id);
        if menu.is_empty() {
            skipped += 1;
            continue;
        }

        let range = history.items_for(user.segment);
        let k = rng.range_inclusive(range.min, range.max) as usize;
        let items: Vec<_> = rng
            .sample_indices(menu.len(), k)
            .into_iter()
            .map(|i| catalog.item(menu[i]))
            .collect();
        let order_time = draw_start_time(config, rng);

        orders.push(OrderRecord {
            order_id: order_id(index),
            user_id: user.user_id.clone(),
            restaurant_id: restaurant.restaurant_id.clone(),
            order_time,
            meal_period: MealPeriod::from_hour(order_time.hour()),
            items_ordered: items.iter().map(|i| i.item_id.clone()).collect(),
            order_value: items.iter().map(|i| i.price).sum(),
            was_completed: rng.chance(history.completion_probability),
        });
    }

    if skipped > 0 {
        log::debug!("history: skipped {skipped} orders at restaurants with no menu");
    }
    log::info!("history: generated {} past orders", orders.len());
    orders
}
