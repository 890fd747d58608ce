//! sim-runner: headless session generator for cartrail.
//!
//! Usage:
//!   sim-runner --seed 42 --sessions 15000 --db sessions.db
//!   sim-runner --data-dir ./catalog --config sim.json --parallel
//!   sim-runner --seed 7 --write-catalog ./catalog --summary-json
//!   sim-runner --seed 42 --orders 30000 --db sessions.db

use anyhow::Result;
use cartrail_core::{
    catalog::Catalog,
    catalog_generator::{generate_catalog, CatalogSpec},
    config::SimConfig,
    engine::SimEngine,
    report::{validate_output, RunSummary},
    rng::RngBank,
    store::SimStore,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let parallel = args.iter().any(|a| a == "--parallel");
    let summary_json = args.iter().any(|a| a == "--summary-json");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = flag_value(&args, "--data-dir");
    let config_path = flag_value(&args, "--config");
    let write_catalog = flag_value(&args, "--write-catalog");

    let mut config = match config_path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed);
    config.num_sessions = parse_arg(&args, "--sessions", config.num_sessions);
    config.history.num_orders = parse_arg(&args, "--orders", config.history.num_orders);

    let catalog = match data_dir {
        Some(dir) => Catalog::load(dir)?,
        None => {
            let mut rng = RngBank::new(config.seed).for_catalog();
            generate_catalog(&CatalogSpec::default(), &mut rng)?
        }
    };
    if let Some(dir) = write_catalog {
        catalog.save(dir)?;
        log::info!("catalog written to {dir}");
    }

    if !summary_json {
        println!("cartrail sim-runner");
        println!("  seed:      {}", config.seed);
        println!("  sessions:  {}", config.num_sessions);
        println!("  orders:    {}", config.history.num_orders);
        println!("  db:        {db}");
        println!("  catalog:   {}", data_dir.unwrap_or("(generated)"));
        println!("  mode:      {}", if parallel { "parallel" } else { "sequential" });
        println!();
    }

    let store = SimStore::open(db)?;
    store.migrate()?;
    let run_id = format!("run-{}-{}", config.seed, uuid::Uuid::new_v4());
    store.insert_run(&run_id, config.seed, config.num_sessions, env!("CARGO_PKG_VERSION"))?;

    let engine = SimEngine::new(config, catalog)?;
    let output = if parallel {
        engine.run_parallel()
    } else {
        engine.run()
    };

    let violations = validate_output(&output, engine.catalog(), engine.config());
    for v in &violations {
        log::warn!("{}: {}", v.session_id, v.reason);
    }
    store.insert_output(&run_id, &output)?;

    let orders = engine.generate_history();
    store.insert_orders(&run_id, &orders)?;

    let summary = RunSummary::from_output(&output).with_history(&orders, engine.config());
    if summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &store, &run_id, violations.len())?;
    }
    Ok(())
}

fn print_summary(summary: &RunSummary, store: &SimStore, run_id: &str, violations: usize) -> Result<()> {
    let stored = store.session_count(run_id)?;
    let counts = store.acceptance_counts(run_id)?;

    println!("=== RUN SUMMARY ===");
    println!("  run_id:          {run_id}");
    println!("  sessions kept:   {}", summary.sessions);
    println!("  sessions stored: {stored}");
    println!("  aborted:         {} (empty menu {}, too few items {})",
        summary.aborted.total(),
        summary.aborted.empty_restaurant_menu,
        summary.aborted.insufficient_candidates);
    println!("  completed:       {} ({:.1}%)", summary.completed, summary.completion_rate * 100.0);
    println!("  avg cart items:  {:.2}", summary.avg_cart_items);
    println!("  diet toggled:    {}", summary.toggled_sessions);
    println!("  organic adds:    {}", summary.organic_adds);
    println!("  recs shown:      {}", counts.shown);
    println!("  recs accepted:   {}", counts.accepted);
    println!(
        "  acceptance rate: {:.2}% ({})",
        counts.rate() * 100.0,
        if summary.within_target() { "within 8-12%" } else { "OUTSIDE 8-12%" }
    );
    println!("  order value:     {}", summary.completed_order_value);
    println!("  violations:      {violations}");

    if let Some(history) = &summary.history {
        println!();
        println!("=== ORDER HISTORY ===");
        println!("  orders stored:   {}", store.order_count(run_id)?);
        println!("  completed:       {} ({:.1}%)", history.completed, history.completion_rate * 100.0);
        println!("  avg order value: {:.2}", history.avg_order_value);
        println!("  train:           {}", history.train);
        println!("  validation:      {}", history.validation);
        println!("  test:            {}", history.test);
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
