//! Session completion model.
//!
//! One Bernoulli draw per session. Abandoned carts keep their item
//! count but report a zero order value.

use crate::{
    cart::Cart,
    config::CompletionConfig,
    rng::SessionRng,
    types::{Price, Segment},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub order_completed: bool,
    pub final_order_value: Price,
}

pub fn completion_probability(
    config: &CompletionConfig,
    segment: Segment,
    distinct_items: usize,
) -> f64 {
    let mut p = config.base_for(segment);
    if distinct_items >= config.multi_item_threshold {
        p += config.multi_item_bonus;
    }
    p.min(config.cap)
}

pub fn decide_completion(
    config: &CompletionConfig,
    segment: Segment,
    cart: &Cart,
    rng: &mut SessionRng,
) -> Completion {
    let p = completion_probability(config, segment, cart.len());
    let order_completed = rng.chance(p);
    Completion {
        order_completed,
        final_order_value: if order_completed { cart.total_price() } else { 0 },
    }
}
