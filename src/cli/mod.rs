//! CLI command handling
//!
//! Dispatches CLI commands to the harness and formats output.

use colored::Colorize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::commands::{Commands, TargetArgs};
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::fixtures::{DependencyGraph, ResourceKind};
use crate::harness::{self, RunContext};
use crate::http::ReqwestTransport;
use crate::scenarios::Scenario;

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, config_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Run { target, only } => {
            let config = load_config(config_path, &target)?;
            let selection = only
                .iter()
                .map(|name| name.parse::<Scenario>())
                .collect::<Result<Vec<_>>>()?;

            let transport = Arc::new(ReqwestTransport::new(&config.http)?);
            harness::run(config, transport, &selection).await?;
            Ok(())
        }

        Commands::Resolve { target, kinds } => {
            let config = load_config(config_path, &target)?;
            let kinds = kinds
                .iter()
                .map(|name| name.parse::<ResourceKind>())
                .collect::<Result<Vec<_>>>()?;

            let transport = Arc::new(ReqwestTransport::new(&config.http)?);
            let mut ctx = RunContext::new(config, transport)?;
            ctx.require_authentication().await?;

            if kinds.is_empty() {
                ctx.resolve_all().await?;
            } else {
                ctx.resolve_kinds(&kinds).await?;
            }
            harness::print_registry(&ctx.registry);
            Ok(())
        }

        Commands::Graph => {
            let graph = DependencyGraph::standard()?;
            print_graph(&graph);
            Ok(())
        }

        Commands::Scenarios => {
            for (i, scenario) in Scenario::ALL.iter().enumerate() {
                println!("{:2}. {}", i + 1, scenario.name());
            }
            Ok(())
        }

        Commands::Call {
            target,
            verb,
            path,
            body,
            query,
        } => {
            let config = load_config(config_path, &target)?;
            let body = body
                .as_deref()
                .map(serde_json::from_str::<Value>)
                .transpose()?;
            let query = parse_query(&query)?;
            let query: Vec<(&str, &str)> =
                query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

            let transport = Arc::new(ReqwestTransport::new(&config.http)?);
            let mut ctx = RunContext::new(config, transport)?;
            ctx.require_authentication().await?;

            let outcome = ctx
                .invoker
                .call_str(&verb, &path, body.as_ref(), &query)
                .await;
            if !outcome.is_success() {
                println!("{} {}", "✗".red(), outcome.describe());
            }
            Ok(())
        }
    }
}

/// Load configuration, then apply environment and command-line overrides
fn load_config(path: Option<&Path>, target: &TargetArgs) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env();
    config.apply_overrides(
        target.base_url.clone(),
        target.email.clone(),
        target.secret.clone(),
    );
    config.validate()?;
    Ok(config)
}

/// Parse `key=value` query arguments
fn parse_query(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| {
                    Error::Config(format!("Invalid query '{}', expected KEY=VALUE", pair))
                })
        })
        .collect()
}

fn print_graph(graph: &DependencyGraph) {
    println!("{}", "Fixture resolution order:".cyan().bold());
    for (i, kind) in graph.order().iter().enumerate() {
        let deps = graph.dependencies(*kind);
        if deps.is_empty() {
            println!("  {:2}. {}", i + 1, kind);
        } else {
            let deps = deps.iter().map(|d| d.label()).collect::<Vec<_>>().join(", ");
            println!("  {:2}. {} {}", i + 1, kind, format!("(needs {})", deps).dimmed());
        }
    }

    println!("\n{}", "Scenario prerequisites:".cyan().bold());
    for scenario in Scenario::ALL {
        let requires = scenario.requires();
        if requires.is_empty() {
            println!("  {:18} -", scenario.name());
        } else {
            let kinds = requires.iter().map(|k| k.label()).collect::<Vec<_>>().join(", ");
            println!("  {:18} {}", scenario.name(), kinds);
        }
    }
}
