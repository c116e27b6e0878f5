//! CLI command definitions
//!
//! Defines the clap commands for the smoke harness.

use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Authenticate, resolve fixtures and run every scenario
    Run {
        #[command(flatten)]
        target: TargetArgs,

        /// Only run these scenarios (repeatable, see 'smoke scenarios')
        #[arg(long = "only", value_name = "SCENARIO")]
        only: Vec<String>,
    },

    /// Authenticate and resolve fixtures without running scenarios
    Resolve {
        #[command(flatten)]
        target: TargetArgs,

        /// Resource kinds to resolve (default: all)
        kinds: Vec<String>,
    },

    /// Print the fixture dependency order and scenario prerequisites
    Graph,

    /// List scenarios in execution order
    Scenarios,

    /// Authenticate and issue a single call
    Call {
        #[command(flatten)]
        target: TargetArgs,

        /// HTTP method (GET, POST, PUT, DELETE)
        verb: String,

        /// Endpoint path relative to the base URL, e.g. /tables
        path: String,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,

        /// Query parameter as key=value (repeatable)
        #[arg(long = "query", short = 'q', value_name = "KEY=VALUE")]
        query: Vec<String>,
    },
}

/// Overrides for the backend and login credentials
#[derive(Args, Debug, Default, Clone)]
pub struct TargetArgs {
    /// Backend base URL, e.g. http://localhost:8000/api
    #[arg(long)]
    pub base_url: Option<String>,

    /// Login email
    #[arg(long)]
    pub email: Option<String>,

    /// Login secret
    #[arg(long)]
    pub secret: Option<String>,
}
