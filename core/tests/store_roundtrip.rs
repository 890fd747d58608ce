//! Output written to SQLite reads back unchanged.

use cartrail_core::{
    catalog_generator::{generate_catalog, CatalogSpec},
    config::SimConfig,
    engine::SimEngine,
    report::RunSummary,
    rng::RngBank,
    store::SimStore,
};

fn build_store(run_id: &str, seed: u64, sessions: u64) -> SimStore {
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
        .insert_run(run_id, seed, sessions, "0.1.0-test")
        .expect("insert run");
    store
}

#[test]
fn sessions_and_events_round_trip() {
    const SEED: u64 = 314;
    let run_id = format!("store-test-{SEED}");
    let store = build_store(&run_id, SEED, 400);

    let spec = CatalogSpec { restaurants: 30, users: 300 };
    let catalog = generate_catalog(&spec, &mut RngBank::new(SEED).for_catalog()).expect("catalog");
    let config = SimConfig {
        seed: SEED,
        num_sessions: 400,
        ..SimConfig::default_test()
    };
    let output = SimEngine::new(config, catalog).expect("engine").run();
    store.insert_output(&run_id, &output).expect("insert output");

    assert_eq!(store.run_seed(&run_id).expect("seed"), Some(SEED));
    assert_eq!(store.session_count(&run_id).expect("count"), output.sessions().len() as u64);

    let sessions = store.sessions_for_run(&run_id).expect("sessions");
    assert_eq!(sessions.as_slice(), output.sessions());

    for session in sessions.iter().take(50) {
        let stored = store
            .events_for_session(&run_id, &session.session_id)
            .expect("events");
        let expected: Vec<_> = output.events_for(&session.session_id).cloned().collect();
        assert_eq!(stored, expected);
    }

    let counts = store.acceptance_counts(&run_id).expect("counts");
    let summary = RunSummary::from_output(&output);
    assert_eq!(counts.shown, summary.recommendations_shown);
    assert_eq!(counts.accepted, summary.recommendations_accepted);
}

#[test]
fn order_history_round_trips() {
    const SEED: u64 = 2718;
    let run_id = format!("history-test-{SEED}");
    let store = build_store(&run_id, SEED, 0);

    let spec = CatalogSpec { restaurants: 20, users: 200 };
    let catalog = generate_catalog(&spec, &mut RngBank::new(SEED).for_catalog()).expect("catalog");
    let config = SimConfig {
        seed: SEED,
        ..SimConfig::default_test()
    };
    let engine = SimEngine::new(config, catalog).expect("engine");
    let orders = engine.generate_history();
    assert!(!orders.is_empty());
    store.insert_orders(&run_id, &orders).expect("insert orders");

    assert_eq!(store.order_count(&run_id).expect("count"), orders.len() as u64);
    assert_eq!(store.orders_for_run(&run_id).expect("orders"), orders);
    assert_eq!(store.order_count("other-run").expect("count"), 0);
}

#[test]
fn runs_are_isolated_by_run_id() {
    let store = build_store("a", 1, 0);
    store.insert_run("b", 2, 0, "0.1.0-test").expect("insert run b");
    assert_eq!(store.session_count("a").expect("count"), 0);
    assert_eq!(store.run_seed("missing").expect("seed"), None);
}

#[test]
fn duplicate_run_id_is_rejected() {
    let store = build_store("dup", 1, 10);
    assert!(store.insert_run("dup", 1, 10, "0.1.0-test").is_err());
}
