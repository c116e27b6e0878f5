//! Fixture resolution
//!
//! Every resource kind the scenarios depend on is resolved with the same
//! get-or-create protocol: list the collection, reuse what exists, and only
//! when nothing does, create one minimal instance. Kinds are visited in the
//! topological order of [`DependencyGraph`] so a kind's dependencies are
//! always settled before its own payload is built.

mod graph;
pub mod payload;
mod registry;
mod resolver;

pub use graph::DependencyGraph;
pub use registry::FixtureRegistry;
pub use resolver::Resolver;

use std::fmt;
use std::str::FromStr;

use crate::common::Error;

/// Resource kinds that are resolved into fixtures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Customer,
    Environment,
    Table,
    Ingredient,
    Recipe,
    Category,
    Product,
    /// Waiters and other employees, used as the server on orders
    Staff,
    /// User with the `agent` role, owner of sales goals
    Agent,
}

impl ResourceKind {
    /// All kinds, in declaration order
    pub const ALL: [ResourceKind; 9] = [
        ResourceKind::Customer,
        ResourceKind::Environment,
        ResourceKind::Table,
        ResourceKind::Ingredient,
        ResourceKind::Recipe,
        ResourceKind::Category,
        ResourceKind::Product,
        ResourceKind::Staff,
        ResourceKind::Agent,
    ];

    /// Registry label, also accepted on the command line
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Customer => "customers",
            ResourceKind::Environment => "environments",
            ResourceKind::Table => "tables",
            ResourceKind::Ingredient => "ingredients",
            ResourceKind::Recipe => "recipes",
            ResourceKind::Category => "categories",
            ResourceKind::Product => "products",
            ResourceKind::Staff => "staff",
            ResourceKind::Agent => "agents",
        }
    }

    /// Collection listed to discover existing fixtures
    ///
    /// `None` for provision-only kinds, which are always created.
    pub fn list_path(self) -> Option<&'static str> {
        match self {
            ResourceKind::Agent => None,
            kind => Some(kind.create_path()),
        }
    }

    /// Endpoint a synthetic instance is POSTed to
    pub fn create_path(self) -> &'static str {
        match self {
            ResourceKind::Customer => "/customers",
            ResourceKind::Environment => "/ambientes",
            ResourceKind::Table => "/tables",
            ResourceKind::Ingredient => "/ingredients",
            ResourceKind::Recipe => "/recipes",
            ResourceKind::Category => "/categories",
            ResourceKind::Product => "/products",
            ResourceKind::Staff => "/employees",
            ResourceKind::Agent => "/auth/register",
        }
    }

    /// Key wrapping the created object in a 201 body, if any
    pub fn envelope(self) -> Option<&'static str> {
        match self {
            ResourceKind::Customer => Some("customer"),
            ResourceKind::Environment => Some("ambiente"),
            ResourceKind::Table => Some("table"),
            ResourceKind::Ingredient => Some("ingredient"),
            ResourceKind::Recipe => Some("recipe"),
            ResourceKind::Category => Some("category"),
            ResourceKind::Product => None,
            ResourceKind::Staff => Some("employee"),
            ResourceKind::Agent => Some("user"),
        }
    }

    /// Kinds whose fixture id is embedded in this kind's creation payload
    pub fn dependencies(self) -> &'static [ResourceKind] {
        match self {
            ResourceKind::Table => &[ResourceKind::Environment],
            ResourceKind::Recipe => &[ResourceKind::Ingredient],
            ResourceKind::Product => &[ResourceKind::Category],
            _ => &[],
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let needle = s.trim().to_ascii_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|kind| {
                let label = kind.label();
                let singular = match label.strip_suffix("ies") {
                    Some(stem) => format!("{}y", stem),
                    None => label.trim_end_matches('s').to_string(),
                };
                needle == label || needle == singular
            })
            .ok_or_else(|| Error::UnknownResourceKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_labels() {
        assert_eq!("tables".parse::<ResourceKind>().unwrap(), ResourceKind::Table);
        assert_eq!("table".parse::<ResourceKind>().unwrap(), ResourceKind::Table);
        assert_eq!("Staff".parse::<ResourceKind>().unwrap(), ResourceKind::Staff);
        assert_eq!("agent".parse::<ResourceKind>().unwrap(), ResourceKind::Agent);
        assert_eq!("category".parse::<ResourceKind>().unwrap(), ResourceKind::Category);
        assert!("orders".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_agent_is_provision_only() {
        assert!(ResourceKind::Agent.list_path().is_none());
        assert_eq!(ResourceKind::Table.list_path(), Some("/tables"));
    }
}
