//! Acceptance probability model.
//!
//! Multipliers applied in order on the base probability:
//!   1. Position decay     1 / (1 + decay * (position - 1))
//!   2. Price sensitivity  Budget over threshold, Premium under threshold
//!   3. Category novelty   add-on category not yet in the cart
//!   4. Bestseller boost

use crate::{
    cart::Cart,
    catalog::MenuItem,
    config::AcceptanceConfig,
    types::Segment,
};

pub fn position_factor(config: &AcceptanceConfig, position_shown: u32) -> f64 {
    let offset = position_shown.saturating_sub(1) as f64;
    1.0 / (1.0 + config.position_decay * offset)
}

pub fn price_factor(config: &AcceptanceConfig, segment: Segment, item: &MenuItem) -> f64 {
    match segment {
        Segment::Budget if item.price > config.budget_price_threshold => {
            config.budget_price_factor
        }
        Segment::Premium if item.price < config.premium_price_threshold => {
            config.premium_price_factor
        }
        _ => 1.0,
    }
}

pub fn novelty_factor(config: &AcceptanceConfig, item: &MenuItem, cart: &Cart) -> f64 {
    if item.category.is_novelty() && !cart.has_category(item.category) {
        config.novelty_factor
    } else {
        1.0
    }
}

pub fn bestseller_factor(config: &AcceptanceConfig, item: &MenuItem) -> f64 {
    if item.bestseller_flag {
        config.bestseller_factor
    } else {
        1.0
    }
}

/// Bernoulli parameter for `item` shown at `position_shown` (1-based).
pub fn acceptance_probability(
    config: &AcceptanceConfig,
    segment: Segment,
    item: &MenuItem,
    position_shown: u32,
    cart: &Cart,
) -> f64 {
    let p = config.base_probability
        * position_factor(config, position_shown)
        * price_factor(config, segment, item)
        * novelty_factor(config, item, cart)
        * bestseller_factor(config, item);

    if config.clamp_probability {
        p.clamp(0.0, 1.0)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn item(category: Category, price: i64, bestseller: bool) -> MenuItem {
        MenuItem {
            item_id: "I00001".into(),
            restaurant_id: "R0001".into(),
            name: String::new(),
            category,
            subcategory: String::new(),
            price,
            veg_flag: true,
            availability: true,
            bestseller_flag: bestseller,
        }
    }

    #[test]
    fn budget_user_expensive_main_at_top() {
        let config = AcceptanceConfig::default();
        let p = acceptance_probability(
            &config,
            Segment::Budget,
            &item(Category::Main, 250, false),
            1,
            &Cart::new(),
        );
        assert!((p - 0.06).abs() < 1e-12, "got {p}");
    }

    #[test]
    fn premium_user_cheap_bestseller_beverage_third() {
        let config = AcceptanceConfig::default();
        let p = acceptance_probability(
            &config,
            Segment::Premium,
            &item(Category::Beverage, 60, true),
            3,
            &Cart::new(),
        );
        let expected = 0.12 * (1.0 / 1.30) * 0.70 * 1.50 * 1.30;
        assert!((p - expected).abs() < 1e-12, "got {p}");
        assert!((p - 0.126).abs() < 1e-9, "got {p}");
    }

    #[test]
    fn novelty_only_applies_to_first_of_category() {
        let config = AcceptanceConfig::default();
        let drink = item(Category::Beverage, 60, false);
        let mut cart = Cart::new();
        assert_eq!(novelty_factor(&config, &drink, &cart), 1.50);
        cart.add(0, &drink);
        assert_eq!(novelty_factor(&config, &drink, &cart), 1.0);
        assert_eq!(novelty_factor(&config, &item(Category::Rice, 120, false), &Cart::new()), 1.0);
    }

    #[test]
    fn price_thresholds_are_strict() {
        let config = AcceptanceConfig::default();
        assert_eq!(price_factor(&config, Segment::Budget, &item(Category::Main, 200, false)), 1.0);
        assert_eq!(price_factor(&config, Segment::Budget, &item(Category::Main, 201, false)), 0.50);
        assert_eq!(price_factor(&config, Segment::Premium, &item(Category::Main, 80, false)), 1.0);
        assert_eq!(price_factor(&config, Segment::Premium, &item(Category::Main, 79, false)), 0.70);
        assert_eq!(price_factor(&config, Segment::Family, &item(Category::Main, 20, false)), 1.0);
    }

    #[test]
    fn clamp_caps_inflated_base() {
        let mut config = AcceptanceConfig {
            base_probability: 0.9,
            ..AcceptanceConfig::default()
        };
        let drink = item(Category::Beverage, 120, true);
        let clamped = acceptance_probability(&config, Segment::Family, &drink, 1, &Cart::new());
        assert_eq!(clamped, 1.0);

        config.clamp_probability = false;
        let raw = acceptance_probability(&config, Segment::Family, &drink, 1, &Cart::new());
        assert!((raw - 0.9 * 1.5 * 1.3).abs() < 1e-12);
    }
}
