//! Backend smoke-test harness
//!
//! This library drives end-to-end smoke tests against the restaurant REST
//! backend: one login, get-or-create fixture resolution over an explicit
//! dependency graph, then a fixed sequence of scenarios.

pub mod cli;
pub mod commands;
pub mod common;
pub mod fixtures;
pub mod harness;
pub mod http;
pub mod scenarios;
pub mod session;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use fixtures::{FixtureRegistry, ResourceKind};
pub use harness::{run, RunContext, RunReport};
pub use scenarios::{Scenario, ScenarioOutcome};
