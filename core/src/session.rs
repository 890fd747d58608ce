//! Cart simulation for a single session.
//!
//! The session moves through a fixed phase sequence:
//!
//!   Start → FirstAdd → RecommendRound (1..=N) → Complete
//!
//! with an optional organic insert after each round. Every random
//! decision draws from the session's own stream, so a session's output
//! depends only on (catalog, config, master seed, index).

use crate::{
    acceptance::acceptance_probability,
    cart::Cart,
    catalog::{Catalog, ItemRef},
    clock::SessionClock,
    completion::decide_completion,
    config::SimConfig,
    context::{build_context, SessionContext},
    emitter::{session_id, SessionEmitter, SessionOutcome},
    error::SessionAbort,
    rng::SessionRng,
};
use log::trace;

/// Where a session currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Start,
    FirstAdd,
    RecommendRound { round: u32, of: u32 },
    Complete,
}

/// Mutable state threaded through the phases of one session.
struct CartSimulation<'c, 'r> {
    catalog: &'c Catalog,
    config: &'c SimConfig,
    context: SessionContext<'c>,
    rng: &'r mut SessionRng,
    clock: SessionClock,
    cart: Cart,
    emitter: SessionEmitter,
    phase: SessionPhase,
}

/// Simulate session `index` end to end.
///
/// Returns `Err` only for sessions that abort before emitting anything.
/// A short recommendation slate ends the round loop but still completes
/// the session.
pub fn simulate_session(
    catalog: &Catalog,
    config: &SimConfig,
    index: u64,
    rng: &mut SessionRng,
) -> Result<SessionOutcome, SessionAbort> {
    let context = build_context(catalog, config, rng)?;
    let mut sim = CartSimulation {
        catalog,
        config,
        clock: SessionClock::starting_at(context.start_time),
        context,
        rng,
        cart: Cart::new(),
        emitter: SessionEmitter::new(session_id(index)),
        phase: SessionPhase::Start,
    };

    sim.first_add();

    let rounds = sim.rng.range_inclusive(config.rounds.min, config.rounds.max) as u32;
    for round in 1..=rounds {
        sim.phase = SessionPhase::RecommendRound { round, of: rounds };
        if let Err(abort) = sim.recommend_round() {
            trace!(
                "{}: round {round}/{rounds} stopped early ({})",
                sim.emitter.session_id(),
                abort.as_str()
            );
            break;
        }
        sim.maybe_organic_insert();
    }

    Ok(sim.complete(index))
}

impl<'c, 'r> CartSimulation<'c, 'r> {
    fn first_add(&mut self) {
        debug_assert_eq!(self.phase, SessionPhase::Start);
        self.phase = SessionPhase::FirstAdd;

        let anchors: Vec<ItemRef> = self
            .context
            .eligible
            .iter()
            .copied()
            .filter(|&i| self.catalog.item(i).category.is_anchor())
            .collect();
        let pool = if anchors.is_empty() {
            &self.context.eligible
        } else {
            &anchors
        };
        // The context guarantees at least `min_eligible_items` entries.
        let Some(&first) = self.rng.pick(pool) else {
            return;
        };

        let item = self.catalog.item(first);
        if let Some(position) = self.cart.add(first, item) {
            let at = self
                .clock
                .advance_random(self.config.first_add_delay_secs, self.rng);
            self.emitter.organic_add(item, at, position);
        }
    }

    /// Eligible items not yet in the cart, in catalog order.
    fn remaining(&self) -> Vec<ItemRef> {
        self.context
            .eligible
            .iter()
            .copied()
            .filter(|&i| !self.cart.contains(i))
            .collect()
    }

    fn recommend_round(&mut self) -> Result<(), SessionAbort> {
        let at = self
            .clock
            .advance_random(self.config.round_delay_secs, self.rng);

        let candidates = self.remaining();
        if candidates.len() < self.config.min_slate_candidates {
            return Err(SessionAbort::InsufficientRecommendationSlate {
                remaining: candidates.len(),
            });
        }

        let wanted = self
            .rng
            .range_inclusive(self.config.slate_size.min, self.config.slate_size.max)
            as usize;
        let slate = self
            .rng
            .sample_indices(candidates.len(), wanted.min(candidates.len()));

        for (shown, &slot) in slate.iter().enumerate() {
            let item_ref = candidates[slot];
            let item = self.catalog.item(item_ref);
            let position_shown = shown as u32 + 1;
            let p = acceptance_probability(
                &self.config.acceptance,
                self.context.user.segment,
                item,
                position_shown,
                &self.cart,
            );
            let cart_position = if self.rng.chance(p) {
                self.cart.add(item_ref, item)
            } else {
                None
            };
            self.emitter
                .recommendation(item, at, position_shown, cart_position);
        }
        Ok(())
    }

    fn maybe_organic_insert(&mut self) {
        if !self.rng.chance(self.config.organic_insert_probability) {
            return;
        }
        let remaining = self.remaining();
        let Some(&pick) = self.rng.pick(&remaining) else {
            return;
        };
        let item = self.catalog.item(pick);
        if let Some(position) = self.cart.add(pick, item) {
            let at = self
                .clock
                .advance_random(self.config.organic_insert_delay_secs, self.rng);
            self.emitter.organic_add(item, at, position);
        }
    }

    fn complete(mut self, index: u64) -> SessionOutcome {
        debug_assert_ne!(self.phase, SessionPhase::Start);
        self.phase = SessionPhase::Complete;
        let completion = decide_completion(
            &self.config.completion,
            self.context.user.segment,
            &self.cart,
            self.rng,
        );
        self.emitter
            .finish(index, &self.context, completion, self.cart.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{MenuItem, PriceTier, Restaurant, User},
        rng::RngBank,
        types::{Category, DietaryPreference, Segment},
    };
    use std::collections::{BTreeSet, HashSet};

    fn item(n: usize, category: Category) -> MenuItem {
        MenuItem {
            item_id: format!("I{n:05}"),
            restaurant_id: "R0001".into(),
            name: format!("dish {n}"),
            category,
            subcategory: String::new(),
            price: 100 + n as i64,
            veg_flag: true,
            availability: true,
            bestseller_flag: n % 3 == 0,
        }
    }

    fn one_restaurant(items: Vec<MenuItem>) -> Catalog {
        Catalog::new(
            vec![User {
                user_id: "U00001".into(),
                segment: Segment::Family,
                dietary_preference: DietaryPreference::None,
                veg_days: BTreeSet::new(),
                favourite_cuisines: BTreeSet::new(),
            }],
            vec![Restaurant {
                restaurant_id: "R0001".into(),
                name: String::new(),
                zone: "North".into(),
                primary_cuisine: "Italian".into(),
                price_tier: PriceTier::Mid,
            }],
            items,
        )
        .unwrap()
    }

    #[test]
    fn first_add_prefers_anchor_categories() {
        let mut items: Vec<MenuItem> = (1..=6).map(|n| item(n, Category::Beverage)).collect();
        items.push(item(7, Category::Main));
        let catalog = one_restaurant(items);
        let config = SimConfig::default();
        for index in 0..20 {
            let mut rng = RngBank::new(11).for_session(index);
            let outcome = simulate_session(&catalog, &config, index, &mut rng).unwrap();
            assert_eq!(outcome.events()[0].item_id, "I00007");
            assert_eq!(outcome.events()[0].cart_position, Some(1));
        }
    }

    #[test]
    fn two_item_menu_stops_before_any_slate() {
        let catalog = one_restaurant(vec![item(1, Category::Main), item(2, Category::Side)]);
        let config = SimConfig {
            organic_insert_probability: 0.0,
            ..SimConfig::default()
        };
        let mut rng = RngBank::new(3).for_session(0);
        let outcome = simulate_session(&catalog, &config, 0, &mut rng).unwrap();
        assert_eq!(outcome.events().len(), 1);
        assert_eq!(outcome.session.num_cart_items, 1);
    }

    #[test]
    fn slates_are_distinct_and_exclude_cart_items() {
        let items: Vec<MenuItem> = (1..=30)
            .map(|n| item(n, if n % 2 == 0 { Category::Main } else { Category::Dessert }))
            .collect();
        let catalog = one_restaurant(items);
        let config = SimConfig::default();
        for index in 0..50 {
            let mut rng = RngBank::new(5).for_session(index);
            let outcome = simulate_session(&catalog, &config, index, &mut rng).unwrap();

            let mut in_cart: HashSet<&str> = HashSet::new();
            let mut shown_this_round: HashSet<&str> = HashSet::new();
            for e in outcome.events() {
                match e.position_shown {
                    Some(1) => {
                        shown_this_round.clear();
                        assert!(!in_cart.contains(e.item_id.as_str()));
                        shown_this_round.insert(e.item_id.as_str());
                    }
                    Some(pos) => {
                        assert!((1..=10).contains(&pos));
                        assert!(!in_cart.contains(e.item_id.as_str()));
                        assert!(shown_this_round.insert(e.item_id.as_str()), "duplicate in slate");
                    }
                    None => {}
                }
                if e.cart_position.is_some() {
                    assert!(in_cart.insert(e.item_id.as_str()), "item added twice");
                }
            }
            assert_eq!(in_cart.len() as u32, outcome.session.num_cart_items);
        }
    }

    #[test]
    fn certain_acceptance_fills_cart_in_order() {
        let items: Vec<MenuItem> = (1..=40).map(|n| item(n, Category::Main)).collect();
        let catalog = one_restaurant(items);
        let mut config = SimConfig::default();
        config.acceptance.base_probability = 1.0;
        config.acceptance.position_decay = 0.0;
        config.organic_insert_probability = 0.0;
        config.rounds = crate::config::IntRange::new(3, 3);

        let mut rng = RngBank::new(9).for_session(0);
        let outcome = simulate_session(&catalog, &config, 0, &mut rng).unwrap();
        let positions: Vec<u32> = outcome
            .events()
            .iter()
            .filter_map(|e| e.cart_position)
            .collect();
        let expected: Vec<u32> = (1..=positions.len() as u32).collect();
        assert_eq!(positions, expected);
        assert!(outcome.events().iter().all(|e| e.was_accepted != Some(false)));
        assert!(positions.len() >= 1 + 3 * 8);
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let items: Vec<MenuItem> = (1..=25).map(|n| item(n, Category::Combo)).collect();
        let catalog = one_restaurant(items);
        let config = SimConfig::default();
        let mut rng = RngBank::new(21).for_session(4);
        let outcome = simulate_session(&catalog, &config, 4, &mut rng).unwrap();
        assert!(outcome.events()[0].timestamp > outcome.session.start_time);
        assert!(outcome
            .events()
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(outcome.session.session_id, "S000005");
    }
}
