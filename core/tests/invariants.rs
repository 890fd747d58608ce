//! Record-level invariants over a generated run.

use cartrail_core::{
    catalog_generator::{generate_catalog, CatalogSpec},
    config::SimConfig,
    emitter::SimOutput,
    engine::SimEngine,
    report::validate_output,
    rng::RngBank,
    types::MealPeriod,
};
use std::collections::{HashMap, HashSet};

fn run(seed: u64, sessions: u64) -> (SimOutput, SimEngine) {
    let config = SimConfig {
        seed,
        num_sessions: sessions,
        ..SimConfig::default()
    };
    let catalog = generate_catalog(&CatalogSpec::default(), &mut RngBank::new(seed).for_catalog())
        .expect("catalog");
    let engine = SimEngine::new(config, catalog).expect("engine");
    (engine.run_parallel(), engine)
}

#[test]
fn generated_run_has_no_violations() {
    let (output, engine) = run(42, 3_000);
    let violations = validate_output(&output, engine.catalog(), engine.config());
    assert!(violations.is_empty(), "first violations: {:?}", &violations[..violations.len().min(5)]);
    assert_eq!(
        output.sessions().len() as u64 + output.aborted().total(),
        engine.config().num_sessions
    );

    let mut cart_value: HashMap<&str, i64> = HashMap::new();
    for e in output.events().iter().filter(|e| e.entered_cart()) {
        let item = engine.catalog().item_by_id(&e.item_id).expect("known item");
        *cart_value.entry(e.session_id.as_str()).or_default() += item.price;
    }
    for s in output.sessions().iter().filter(|s| s.order_completed) {
        assert_eq!(s.final_order_value, cart_value[s.session_id.as_str()], "{}", s.session_id);
    }
}

#[test]
fn organic_and_recommendation_fields_are_exclusive() {
    let (output, _) = run(9, 1_000);
    for e in output.events() {
        if e.was_recommendation {
            let pos = e.position_shown.expect("position_shown");
            assert!((1..=10).contains(&pos));
            assert!(e.was_accepted.is_some());
        } else {
            assert!(e.was_accepted.is_none() && e.position_shown.is_none());
            assert!(e.cart_position.is_some());
        }
    }
}

#[test]
fn ids_are_unique_and_ordered() {
    let (output, _) = run(13, 1_000);
    let ids: Vec<&str> = output.sessions().iter().map(|s| s.session_id.as_str()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    for (i, e) in output.events().iter().enumerate() {
        assert_eq!(e.event_id, format!("E{:07}", i + 1));
    }
    let unique: HashSet<&str> = output.events().iter().map(|e| e.event_id.as_str()).collect();
    assert_eq!(unique.len(), output.events().len());
}

#[test]
fn meal_period_and_window_follow_start_time() {
    let (output, engine) = run(21, 1_000);
    let config = engine.config();
    for s in output.sessions() {
        assert!(s.start_time.date() >= config.window_start);
        assert!(s.start_time.date() < config.window_end);
        use chrono::Timelike;
        assert_eq!(s.meal_period, MealPeriod::from_hour(s.start_time.hour()));
        if !s.order_completed {
            assert_eq!(s.final_order_value, 0);
        }
        assert!(s.num_cart_items >= 1);
    }
}
