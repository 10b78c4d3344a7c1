pub mod auditing;
pub mod config;
pub mod constants;
pub mod costs;
pub mod error;
pub mod generator;
pub mod ledger;
pub mod loader;
pub mod observability;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod rng;

// Domain data shapes shared across layers
pub mod domain;
