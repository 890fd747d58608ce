//! Session context: who orders, from where, when, and from which items.
//!
//! Draw order is fixed: user, restaurant, start time, dietary toggle.
//! Changing it changes every session's stream.

use crate::{
    catalog::{Catalog, ItemRef, Restaurant, User},
    config::SimConfig,
    error::SessionAbort,
    rng::SessionRng,
    types::{DietaryPreference, DietaryToggle, MealPeriod},
};
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike};

#[derive(Debug, Clone)]
pub struct SessionContext<'c> {
    pub user: &'c User,
    pub restaurant: &'c Restaurant,
    pub start_time: NaiveDateTime,
    pub meal_period: MealPeriod,
    pub dietary_toggle: DietaryToggle,
    /// Available, diet-compatible menu items in catalog order.
    pub eligible: Vec<ItemRef>,
}

pub fn build_context<'c>(
    catalog: &'c Catalog,
    config: &SimConfig,
    rng: &mut SessionRng,
) -> Result<SessionContext<'c>, SessionAbort> {
    let users = catalog.users();
    let user = &users[rng.next_u64_below(users.len() as u64) as usize];
    let restaurant = pick_restaurant(catalog, user, config.favourite_cuisine_probability, rng);

    let menu = catalog.menu_for(&restaurant.restaurant_id);
    if menu.is_empty() {
        return Err(SessionAbort::EmptyRestaurantMenu);
    }

    let start_time = draw_start_time(config, rng);
    let weekday = start_time.weekday().num_days_from_monday() as u8;
    let dietary_toggle = draw_dietary_toggle(config, user, weekday, rng);

    let eligible: Vec<ItemRef> = menu
        .iter()
        .copied()
        .filter(|&i| {
            let item = catalog.item(i);
            item.availability && (!dietary_toggle.requires_veg() || item.veg_flag)
        })
        .collect();
    if eligible.len() < config.min_eligible_items {
        return Err(SessionAbort::InsufficientCandidates {
            eligible: eligible.len(),
        });
    }

    Ok(SessionContext {
        user,
        restaurant,
        start_time,
        meal_period: MealPeriod::from_hour(start_time.hour()),
        dietary_toggle,
        eligible,
    })
}

/// Favourite-cuisine restaurants with probability `favourite_probability`,
/// falling back to the full pool when none match.
pub(crate) fn pick_restaurant<'c>(
    catalog: &'c Catalog,
    user: &User,
    favourite_probability: f64,
    rng: &mut SessionRng,
) -> &'c Restaurant {
    let restaurants = catalog.restaurants();
    if rng.chance(favourite_probability) {
        let matching = catalog.restaurants_with_cuisines(&user.favourite_cuisines);
        if let Some(&i) = rng.pick(&matching) {
            return &restaurants[i];
        }
    }
    &restaurants[rng.next_u64_below(restaurants.len() as u64) as usize]
}

pub fn draw_start_time(config: &SimConfig, rng: &mut SessionRng) -> NaiveDateTime {
    let day = rng.next_u64_below(config.window_days().max(1) as u64) as i64;
    let weights: Vec<f64> = config.hour_weights.iter().map(|(_, w)| *w).collect();
    let hour = config.hour_weights[rng.weighted_index(&weights)].0 as i64;
    let minute = rng.next_u64_below(60) as i64;

    config.window_start.and_time(NaiveTime::MIN)
        + Duration::days(day)
        + Duration::hours(hour)
        + Duration::minutes(minute)
}

/// Random switch first, then the weekday rule, which always wins.
pub fn draw_dietary_toggle(
    config: &SimConfig,
    user: &User,
    weekday: u8,
    rng: &mut SessionRng,
) -> DietaryToggle {
    let mut toggle = DietaryToggle::None;
    if rng.chance(config.diet_switch_probability) {
        toggle = match user.dietary_preference {
            DietaryPreference::Veg => DietaryToggle::Veg,
            DietaryPreference::Vegan => DietaryToggle::Vegan,
            _ if rng.chance(config.diet_switch_veg_weight) => DietaryToggle::Veg,
            _ => DietaryToggle::NonVeg,
        };
    }
    if user.is_veg_day(weekday) {
        toggle = DietaryToggle::Veg;
    }
    toggle
}
