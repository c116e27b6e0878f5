//! Error types for the smoke harness
//!
//! Only conditions that stop the whole run live here. Transport, business and
//! missing-prerequisite failures are ordinary values (`CallOutcome`,
//! `ScenarioOutcome`, empty registry entries). `Error::Transport` only travels
//! from a `Transport` to the `Invoker`, which folds it into a `CallOutcome`.

use thiserror::Error;

use crate::fixtures::ResourceKind;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the smoke harness
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Dependency Graph Errors ===
    #[error("Resource kind '{kind}' depends on '{dependency}', which is not part of the graph")]
    UnknownDependency {
        kind: ResourceKind,
        dependency: ResourceKind,
    },

    #[error("Resource kind '{0}' is declared more than once")]
    DuplicateKind(ResourceKind),

    #[error("Resource kind '{0}' is not part of the dependency graph")]
    KindNotInGraph(ResourceKind),

    #[error("Dependency cycle between resource kinds: {0}")]
    DependencyCycle(String),

    #[error("Fixtures for '{0}' were already recorded in this run")]
    AlreadyRecorded(ResourceKind),

    // === Run Errors ===
    #[error("Unknown scenario '{name}'. Available: {available}")]
    UnknownScenario { name: String, available: String },

    #[error("Unknown resource kind '{0}'")]
    UnknownResourceKind(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    // === Transport Errors ===
    #[error("Transport error: {0}")]
    Transport(String),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an unknown scenario error listing the valid names
    pub fn unknown_scenario<S: AsRef<str>>(name: &str, available: &[S]) -> Self {
        Self::UnknownScenario {
            name: name.to_string(),
            available: available
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create an unknown dependency error
    pub fn unknown_dependency(kind: ResourceKind, dependency: ResourceKind) -> Self {
        Self::UnknownDependency { kind, dependency }
    }
}
