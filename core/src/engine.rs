//! The batch engine: runs every session of a simulation.
//!
//! RULES:
//!   - Session i always draws from RngBank::for_session(i).
//!   - Sessions share nothing mutable; the catalog is read-only.
//!   - Event ids are assigned after all sessions finish, in index order.
//!
//! Consequently `run()` and `run_parallel()` produce identical output.

use crate::{
    catalog::Catalog,
    config::SimConfig,
    emitter::{AbortTally, SessionOutcome, SimOutput},
    error::{SessionAbort, SimResult},
    history::{generate_order_history, OrderRecord},
    rng::RngBank,
    session::simulate_session,
};
use log::{debug, info};
use rayon::prelude::*;

pub struct SimEngine {
    pub rng_bank: RngBank,
    config:       SimConfig,
    catalog:      Catalog,
}

impl SimEngine {
    /// Validate the config and wire an engine over `catalog`.
    pub fn new(config: SimConfig, catalog: Catalog) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            rng_bank: RngBank::new(config.seed),
            config,
            catalog,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Simulate a single session by index.
    pub fn simulate_one(&self, index: u64) -> Result<SessionOutcome, SessionAbort> {
        let mut rng = self.rng_bank.for_session(index);
        simulate_session(&self.catalog, &self.config, index, &mut rng)
    }

    /// Past orders for this catalog, from the history stream.
    pub fn generate_history(&self) -> Vec<OrderRecord> {
        let mut rng = self.rng_bank.for_history();
        generate_order_history(&self.catalog, &self.config, &mut rng)
    }

    /// Run all sessions one after another.
    pub fn run(&self) -> SimOutput {
        let results: Vec<_> = (0..self.config.num_sessions)
            .map(|index| (index, self.simulate_one(index)))
            .collect();
        self.collect(results)
    }

    /// Run all sessions across the rayon thread pool.
    pub fn run_parallel(&self) -> SimOutput {
        let results: Vec<_> = (0..self.config.num_sessions)
            .into_par_iter()
            .map(|index| (index, self.simulate_one(index)))
            .collect();
        self.collect(results)
    }

    fn collect(&self, results: Vec<(u64, Result<SessionOutcome, SessionAbort>)>) -> SimOutput {
        let mut aborted = AbortTally::default();
        let mut outcomes = Vec::with_capacity(results.len());
        for (index, result) in results {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(abort) => {
                    debug!("session {index} aborted: {}", abort.as_str());
                    aborted.record(abort);
                }
            }
        }

        let output = SimOutput::assemble(outcomes, aborted);
        info!(
            "simulated {} sessions (seed {}): {} kept, {} aborted, {} cart events",
            self.config.num_sessions,
            self.rng_bank.master_seed(),
            output.sessions().len(),
            aborted.total(),
            output.events().len()
        );
        output
    }
}
