//! Run orchestration
//!
//! A run is: authenticate once, resolve fixtures in dependency order, then
//! execute scenarios. All mutable state for the run lives in [`RunContext`],
//! which is created per run and passed by reference.

use colored::Colorize;
use std::sync::Arc;

use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::fixtures::{DependencyGraph, FixtureRegistry, ResourceKind, Resolver};
use crate::http::{Invoker, Transport};
use crate::scenarios::{self, Scenario, ScenarioReport};
use crate::session::{self, Credential};

/// State of a single harness run
pub struct RunContext {
    pub config: Config,
    pub invoker: Invoker,
    pub graph: DependencyGraph,
    pub registry: FixtureRegistry,
}

impl RunContext {
    /// Create a context for a run over the given transport
    ///
    /// Fails if the dependency graph is invalid, before any request is made.
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        let graph = DependencyGraph::standard()?;
        let invoker = Invoker::new(transport, config.target.base_url.clone());
        Ok(Self {
            config,
            invoker,
            graph,
            registry: FixtureRegistry::new(),
        })
    }

    /// Log in with the configured credentials
    pub async fn authenticate(&mut self) -> bool {
        let credential = Credential::new(
            self.config.credentials.email.clone(),
            self.config.credentials.secret.clone(),
        );
        session::authenticate(&mut self.invoker, &credential).await
    }

    /// Log in, turning a failed login into an error
    pub async fn require_authentication(&mut self) -> Result<()> {
        if self.authenticate().await {
            Ok(())
        } else {
            Err(Error::AuthenticationFailed(format!(
                "could not log in as '{}'",
                self.config.credentials.email
            )))
        }
    }

    /// Resolve every fixture kind
    pub async fn resolve_all(&mut self) -> Result<()> {
        let resolver = Resolver::new(&self.invoker, &self.graph, &self.config.agent);
        resolver.resolve_all(&mut self.registry).await
    }

    /// Resolve only the given kinds (and their dependencies)
    pub async fn resolve_kinds(&mut self, kinds: &[ResourceKind]) -> Result<()> {
        let resolver = Resolver::new(&self.invoker, &self.graph, &self.config.agent);
        for kind in kinds {
            resolver.resolve(&mut self.registry, *kind).await?;
        }
        Ok(())
    }

    /// Run scenarios against the current registry
    pub async fn run_scenarios(&self, selection: &[Scenario]) -> Vec<ScenarioReport> {
        scenarios::run_scenarios(&self.invoker, &self.registry, selection).await
    }
}

/// Outcome of a full run
#[derive(Debug)]
pub struct RunReport {
    /// False if the run stopped at login
    pub authenticated: bool,
    pub fixtures: FixtureRegistry,
    pub scenarios: Vec<ScenarioReport>,
}

/// Execute a full run
///
/// Only configuration and graph problems are errors. A failed login ends the
/// run early with `authenticated == false`; everything after login is
/// best-effort.
pub async fn run(
    config: Config,
    transport: Arc<dyn Transport>,
    selection: &[Scenario],
) -> Result<RunReport> {
    let mut ctx = RunContext::new(config, transport)?;

    println!(
        "{} {}\n",
        "Starting backend smoke tests against".blue().bold(),
        ctx.invoker.base_url().white().bold()
    );

    if !ctx.authenticate().await {
        println!("{}\n", "Authentication failed. Stopping tests.".red().bold());
        return Ok(RunReport {
            authenticated: false,
            fixtures: ctx.registry,
            scenarios: Vec::new(),
        });
    }

    println!("{}\n", "Resolving fixtures...".cyan().bold());
    ctx.resolve_all().await?;
    print_registry(&ctx.registry);

    let reports = ctx.run_scenarios(selection).await;
    scenarios::print_summary(&reports);
    println!("{}\n", "=== Tests finished ===".blue().bold());

    Ok(RunReport {
        authenticated: true,
        fixtures: ctx.registry,
        scenarios: reports,
    })
}

/// Print the resolved fixture ids per kind
pub fn print_registry(registry: &FixtureRegistry) {
    println!("{}", "Fixtures:".cyan().bold());
    for (kind, ids) in registry.iter() {
        if ids.is_empty() {
            println!("  {:14} {}", kind.label(), "(none)".yellow());
        } else {
            println!("  {:14} {}", kind.label(), ids.join(", ").dimmed());
        }
    }
    println!();
}
