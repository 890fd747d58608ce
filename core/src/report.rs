//! Run summary and output invariant checks.
//!
//! Both read a finished SimOutput and never touch the RNG, so they can
//! be run on any output, including one read back from the store.

use crate::{
    catalog::Catalog,
    config::SimConfig,
    emitter::{AbortTally, SimOutput},
    event::{CartEvent, Session},
    history::{HistorySplit, OrderRecord},
    types::{DietaryToggle, Price},
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Aggregate acceptance band the default constants are calibrated to.
pub const TARGET_ACCEPTANCE: (f64, f64) = (0.08, 0.12);

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunSummary {
    pub sessions:             u64,
    pub aborted:              AbortTally,
    pub completed:            u64,
    pub completion_rate:      f64,
    pub avg_cart_items:       f64,
    pub toggled_sessions:     u64,
    pub recommendations_shown: u64,
    pub recommendations_accepted: u64,
    pub acceptance_rate:      f64,
    pub organic_adds:         u64,
    pub completed_order_value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history:              Option<HistorySummary>,
}

/// Past-order totals and the train / validation / test split.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistorySummary {
    pub orders:          u64,
    pub completed:       u64,
    pub completion_rate: f64,
    pub avg_order_value: f64,
    pub train:           u64,
    pub validation:      u64,
    pub test:            u64,
}

impl HistorySummary {
    pub fn from_orders(orders: &[OrderRecord], config: &SimConfig) -> Self {
        let n = orders.len() as u64;
        let completed = orders.iter().filter(|o| o.was_completed).count() as u64;
        let value: i64 = orders.iter().map(|o| o.order_value).sum();
        let (mut train, mut validation, mut test) = (0, 0, 0);
        for o in orders {
            match HistorySplit::of(o.order_time, config) {
                HistorySplit::Train      => train += 1,
                HistorySplit::Validation => validation += 1,
                HistorySplit::Test       => test += 1,
            }
        }
        Self {
            orders: n,
            completed,
            completion_rate: ratio(completed, n),
            avg_order_value: if n == 0 { 0.0 } else { value as f64 / n as f64 },
            train,
            validation,
            test,
        }
    }
}

impl RunSummary {
    pub fn from_output(output: &SimOutput) -> Self {
        let sessions = output.sessions();
        let n = sessions.len() as u64;
        let completed = sessions.iter().filter(|s| s.order_completed).count() as u64;
        let cart_items: u64 = sessions.iter().map(|s| s.num_cart_items as u64).sum();
        let toggled = sessions
            .iter()
            .filter(|s| s.dietary_toggle != DietaryToggle::None)
            .count() as u64;

        let mut shown = 0u64;
        let mut accepted = 0u64;
        let mut organic = 0u64;
        for e in output.events() {
            if e.was_recommendation {
                shown += 1;
                if e.was_accepted == Some(true) {
                    accepted += 1;
                }
            } else {
                organic += 1;
            }
        }

        Self {
            sessions: n,
            aborted: output.aborted(),
            completed,
            completion_rate: ratio(completed, n),
            avg_cart_items: ratio(cart_items, n),
            toggled_sessions: toggled,
            recommendations_shown: shown,
            recommendations_accepted: accepted,
            acceptance_rate: ratio(accepted, shown),
            organic_adds: organic,
            completed_order_value: sessions.iter().map(|s| s.final_order_value).sum(),
            history: None,
        }
    }

    pub fn with_history(mut self, orders: &[OrderRecord], config: &SimConfig) -> Self {
        self.history = Some(HistorySummary::from_orders(orders, config));
        self
    }

    pub fn within_target(&self) -> bool {
        let (lo, hi) = TARGET_ACCEPTANCE;
        (lo..=hi).contains(&self.acceptance_rate)
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// One broken record-level invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub session_id: String,
    pub reason:     String,
}

/// Check every record-level invariant of a run. Empty means clean.
pub fn validate_output(
    output: &SimOutput,
    catalog: &Catalog,
    config: &SimConfig,
) -> Vec<Violation> {
    let mut by_session: HashMap<&str, Vec<&CartEvent>> = HashMap::new();
    for e in output.events() {
        by_session.entry(e.session_id.as_str()).or_default().push(e);
    }

    let mut violations = Vec::new();
    let known: HashSet<&str> = output
        .sessions()
        .iter()
        .map(|s| s.session_id.as_str())
        .collect();
    for session_id in by_session.keys().filter(|id| !known.contains(*id)) {
        violations.push(Violation {
            session_id: session_id.to_string(),
            reason: "events reference an unknown session".into(),
        });
    }

    for session in output.sessions() {
        let events = by_session
            .get(session.session_id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        for reason in check_session(session, events, catalog, config) {
            violations.push(Violation {
                session_id: session.session_id.clone(),
                reason,
            });
        }
    }
    violations
}

fn check_session(
    session: &Session,
    events: &[&CartEvent],
    catalog: &Catalog,
    config: &SimConfig,
) -> Vec<String> {
    let mut problems = Vec::new();
    if events.is_empty() {
        problems.push("session emitted no events".to_string());
    }

    let max_shown = config.slate_size.max as u32;
    let mut next_position = 1u32;
    let mut in_cart: HashSet<&str> = HashSet::new();
    let mut last_time = session.start_time;
    let mut cart_value: Price = 0;

    for e in events {
        if e.timestamp < last_time {
            problems.push(format!("{} goes back in time", e.event_id));
        }
        last_time = e.timestamp;

        if e.was_recommendation {
            match (e.position_shown, e.was_accepted) {
                (Some(pos), Some(accepted)) => {
                    if pos == 0 || pos > max_shown {
                        problems.push(format!("{} shown at position {pos}", e.event_id));
                    }
                    if accepted != e.cart_position.is_some() {
                        problems.push(format!("{} acceptance disagrees with cart_position", e.event_id));
                    }
                }
                _ => problems.push(format!("{} recommendation missing fields", e.event_id)),
            }
        } else {
            if e.was_accepted.is_some() || e.position_shown.is_some() {
                problems.push(format!("{} organic add carries recommendation fields", e.event_id));
            }
            if e.cart_position.is_none() {
                problems.push(format!("{} organic add has no cart_position", e.event_id));
            }
        }

        if let Some(pos) = e.cart_position {
            if pos != next_position {
                problems.push(format!(
                    "{} cart_position {pos}, expected {next_position}",
                    e.event_id
                ));
            }
            next_position = pos + 1;
            in_cart.insert(e.item_id.as_str());
            match catalog.item_by_id(&e.item_id) {
                Some(item) => cart_value += item.price,
                None => problems.push(format!("{} adds unknown item {}", e.event_id, e.item_id)),
            }
        }
    }

    if in_cart.len() as u32 != session.num_cart_items {
        problems.push(format!(
            "num_cart_items {} but {} distinct items entered the cart",
            session.num_cart_items,
            in_cart.len()
        ));
    }
    if !session.order_completed && session.final_order_value != 0 {
        problems.push("abandoned order carries a value".to_string());
    }
    if session.order_completed && session.final_order_value != cart_value {
        problems.push(format!(
            "final_order_value {} but cart items sum to {cart_value}",
            session.final_order_value
        ));
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{MenuItem, PriceTier, Restaurant, User},
        types::{Category, DietaryPreference, MealPeriod, Segment},
    };
    use chrono::{Duration, NaiveDate, NaiveTime};

    /// Items I00001..I00004 at 150 each.
    fn catalog() -> Catalog {
        let items = (1..=4)
            .map(|n| MenuItem {
                item_id: format!("I{n:05}"),
                restaurant_id: "R0001".into(),
                name: String::new(),
                category: Category::Main,
                subcategory: String::new(),
                price: 150,
                veg_flag: true,
                availability: true,
                bestseller_flag: false,
            })
            .collect();
        Catalog::new(
            vec![User {
                user_id: "U00001".into(),
                segment: Segment::Budget,
                dietary_preference: DietaryPreference::None,
                veg_days: Default::default(),
                favourite_cuisines: Default::default(),
            }],
            vec![Restaurant {
                restaurant_id: "R0001".into(),
                name: String::new(),
                zone: "South".into(),
                primary_cuisine: "Chinese".into(),
                price_tier: PriceTier::Mid,
            }],
            items,
        )
        .unwrap()
    }

    fn session(id: &str, items: u32) -> Session {
        Session {
            session_id: id.into(),
            user_id: "U00001".into(),
            restaurant_id: "R0001".into(),
            start_time: NaiveDate::from_ymd_opt(2025, 12, 3)
                .unwrap()
                .and_hms_opt(20, 15, 0)
                .unwrap(),
            meal_period: MealPeriod::Dinner,
            zone: "South".into(),
            dietary_toggle: DietaryToggle::None,
            order_completed: true,
            final_order_value: 300,
            num_cart_items: items,
        }
    }

    fn event(seq: u64, pos: Option<u32>, shown: Option<u32>, accepted: Option<bool>) -> CartEvent {
        CartEvent {
            event_id: crate::emitter::event_id(seq),
            session_id: "S000001".into(),
            item_id: format!("I{seq:05}"),
            timestamp: NaiveDate::from_ymd_opt(2025, 12, 3)
                .unwrap()
                .and_hms_opt(20, 16, seq as u32)
                .unwrap(),
            cart_position: pos,
            was_recommendation: shown.is_some(),
            was_accepted: accepted,
            position_shown: shown,
        }
    }

    #[test]
    fn clean_session_has_no_violations() {
        let s = session("S000001", 2);
        let events = [
            event(1, Some(1), None, None),
            event(2, None, Some(1), Some(false)),
            event(3, Some(2), Some(2), Some(true)),
        ];
        let refs: Vec<&CartEvent> = events.iter().collect();
        assert!(check_session(&s, &refs, &catalog(), &SimConfig::default()).is_empty());
    }

    #[test]
    fn completed_value_must_match_cart_prices() {
        let mut s = session("S000001", 1);
        s.final_order_value = 999_999;
        let events = [event(1, Some(1), None, None)];
        let refs: Vec<&CartEvent> = events.iter().collect();
        let problems = check_session(&s, &refs, &catalog(), &SimConfig::default());
        assert_eq!(problems, vec!["final_order_value 999999 but cart items sum to 150".to_string()]);

        s.final_order_value = 150;
        assert!(check_session(&s, &refs, &catalog(), &SimConfig::default()).is_empty());
    }

    #[test]
    fn unknown_cart_item_is_reported() {
        let s = session("S000001", 1);
        let mut e = event(1, Some(1), None, None);
        e.item_id = "I99999".into();
        let problems = check_session(&s, &[&e], &catalog(), &SimConfig::default());
        assert!(problems.iter().any(|p| p.contains("unknown item I99999")));
    }

    #[test]
    fn gaps_and_mismatches_are_reported() {
        let s = session("S000001", 3);
        let events = [
            event(1, Some(1), None, None),
            event(2, Some(3), Some(1), Some(true)),
            event(3, Some(4), Some(11), Some(false)),
        ];
        let refs: Vec<&CartEvent> = events.iter().collect();
        let problems = check_session(&s, &refs, &catalog(), &SimConfig::default());
        assert!(problems.iter().any(|p| p.contains("expected 2")));
        assert!(problems.iter().any(|p| p.contains("position 11")));
        assert!(problems.iter().any(|p| p.contains("acceptance disagrees")));
    }

    #[test]
    fn empty_output_summary_is_zeroed() {
        let output = SimOutput::assemble(Vec::new(), AbortTally::default());
        let summary = RunSummary::from_output(&output);
        assert_eq!(summary.sessions, 0);
        assert_eq!(summary.acceptance_rate, 0.0);
        assert!(!summary.within_target());
        assert!(validate_output(&output, &catalog(), &SimConfig::default()).is_empty());
        assert!(summary.history.is_none());
    }

    #[test]
    fn history_summary_counts_splits() {
        let config = SimConfig::default();
        let start = config.window_start.and_time(NaiveTime::MIN);
        let order = |days: i64, value: i64, completed: bool| OrderRecord {
            order_id: format!("O{days:06}"),
            user_id: "U00001".into(),
            restaurant_id: "R0001".into(),
            order_time: start + Duration::days(days) + Duration::hours(12),
            meal_period: MealPeriod::Lunch,
            items_ordered: vec!["I00001".into()],
            order_value: value,
            was_completed: completed,
        };
        let orders = [
            order(0, 100, true),
            order(20, 200, true),
            order(21, 300, false),
            order(28, 400, true),
            order(34, 500, true),
        ];
        let output = SimOutput::assemble(Vec::new(), AbortTally::default());
        let summary = RunSummary::from_output(&output).with_history(&orders, &config);
        let history = summary.history.unwrap();
        assert_eq!((history.train, history.validation, history.test), (2, 1, 2));
        assert_eq!(history.completed, 4);
        assert!((history.completion_rate - 0.8).abs() < 1e-12);
        assert!((history.avg_order_value - 300.0).abs() < 1e-12);
    }
}
