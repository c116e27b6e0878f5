//! Scenario definitions
//!
//! A scenario exercises one backend capability using fixtures from the
//! registry. Scenarios always run in the order of [`Scenario::ALL`]; a
//! missing prerequisite skips that scenario only.

pub mod payload;
mod runner;

pub use runner::{print_summary, run_scenarios};

use std::fmt;
use std::str::FromStr;

use crate::common::Error;
use crate::fixtures::ResourceKind;

/// Exercise scenarios, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    Reservations,
    Tables,
    Orders,
    Ingredients,
    IfoodAuthStart,
    Products,
    Reports,
    Payments,
    SalesGoals,
    Stock,
    Categories,
}

impl Scenario {
    pub const ALL: [Scenario; 11] = [
        Scenario::Reservations,
        Scenario::Tables,
        Scenario::Orders,
        Scenario::Ingredients,
        Scenario::IfoodAuthStart,
        Scenario::Products,
        Scenario::Reports,
        Scenario::Payments,
        Scenario::SalesGoals,
        Scenario::Stock,
        Scenario::Categories,
    ];

    /// Name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Scenario::Reservations => "reservations",
            Scenario::Tables => "tables",
            Scenario::Orders => "orders",
            Scenario::Ingredients => "ingredients",
            Scenario::IfoodAuthStart => "ifood-auth-start",
            Scenario::Products => "products",
            Scenario::Reports => "reports",
            Scenario::Payments => "payments",
            Scenario::SalesGoals => "sales-goals",
            Scenario::Stock => "stock",
            Scenario::Categories => "categories",
        }
    }

    /// Heading printed before the scenario runs
    pub fn title(self) -> &'static str {
        match self {
            Scenario::Reservations => "Reservations",
            Scenario::Tables => "Tables",
            Scenario::Orders => "Orders",
            Scenario::Ingredients => "Ingredients",
            Scenario::IfoodAuthStart => "iFood Authentication",
            Scenario::Products => "Products",
            Scenario::Reports => "Reports",
            Scenario::Payments => "Payments",
            Scenario::SalesGoals => "Sales Goals",
            Scenario::Stock => "Stock",
            Scenario::Categories => "Categories",
        }
    }

    /// Collection listed before the scenario's own call, if any
    pub fn listing(self) -> Option<&'static str> {
        match self {
            Scenario::Reservations => Some("/reservations"),
            Scenario::Tables => Some("/tables"),
            Scenario::Orders => Some("/orders"),
            Scenario::Ingredients => Some("/ingredients"),
            Scenario::Products => Some("/products"),
            Scenario::SalesGoals => Some("/sales-goals"),
            Scenario::Stock => Some("/stock"),
            Scenario::Categories => Some("/categories"),
            Scenario::IfoodAuthStart | Scenario::Reports | Scenario::Payments => None,
        }
    }

    /// Fixtures the scenario needs, in the order they are consumed
    pub fn requires(self) -> &'static [ResourceKind] {
        match self {
            Scenario::Reservations => &[ResourceKind::Customer, ResourceKind::Table],
            Scenario::Tables => &[ResourceKind::Environment],
            Scenario::Orders => &[
                ResourceKind::Table,
                ResourceKind::Recipe,
                ResourceKind::Customer,
                ResourceKind::Staff,
            ],
            Scenario::Products => &[ResourceKind::Category],
            Scenario::SalesGoals => &[ResourceKind::Agent],
            Scenario::Stock => &[ResourceKind::Product],
            Scenario::Ingredients
            | Scenario::IfoodAuthStart
            | Scenario::Reports
            | Scenario::Payments
            | Scenario::Categories => &[],
        }
    }

    pub fn names() -> Vec<&'static str> {
        Scenario::ALL.iter().map(|s| s.name()).collect()
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let needle = s.trim().to_ascii_lowercase().replace('_', "-");
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == needle)
            .ok_or_else(|| Error::unknown_scenario(s, &Scenario::names()))
    }
}

/// How a scenario ended
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioOutcome {
    /// The scenario's own call returned 2xx
    Passed { status: u16 },
    /// The call was made and did not succeed
    Failed { reason: String },
    /// A prerequisite was unavailable; nothing was attempted
    Skipped { missing: String },
}

impl ScenarioOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ScenarioOutcome::Passed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ScenarioOutcome::Skipped { .. })
    }
}

/// Result of one scenario in a run
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub outcome: ScenarioOutcome,
}
