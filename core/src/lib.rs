//! cartrail-core: synthetic cart-building sessions with recommendation
//! rails, generated deterministically from a catalog and a seed.
//!
//! Data flows one way:
//!
//!   Catalog → context → session (cart, acceptance, completion)
//!           → emitter → SimOutput → store / report
//!
//!   Catalog → history → OrderRecords → store / report

pub mod acceptance;
pub mod cart;
pub mod catalog;
pub mod catalog_generator;
pub mod clock;
pub mod completion;
pub mod config;
pub mod context;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod event;
pub mod history;
pub mod name_generator;
pub mod report;
pub mod rng;
pub mod session;
pub mod store;
pub mod types;
