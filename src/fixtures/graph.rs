//! Dependency graph over resource kinds
//!
//! Built and validated once, before any request is made. Unknown
//! dependencies and cycles are construction errors, so resolution can never
//! reach a kind whose dependency was not visited first.

use std::collections::BTreeMap;

use crate::common::{Error, Result};

use super::ResourceKind;

/// Validated DAG of resource kinds with a precomputed topological order
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    dependencies: BTreeMap<ResourceKind, Vec<ResourceKind>>,
    order: Vec<ResourceKind>,
}

impl DependencyGraph {
    /// Graph of every [`ResourceKind`] with its declared dependencies
    pub fn standard() -> Result<Self> {
        let nodes: Vec<(ResourceKind, Vec<ResourceKind>)> = ResourceKind::ALL
            .iter()
            .map(|kind| (*kind, kind.dependencies().to_vec()))
            .collect();
        Self::new(nodes)
    }

    /// Build a graph from `(kind, dependencies)` pairs
    ///
    /// Ties in the topological order are broken by the order of `nodes`.
    pub fn new(nodes: Vec<(ResourceKind, Vec<ResourceKind>)>) -> Result<Self> {
        let declared: Vec<ResourceKind> = nodes.iter().map(|(kind, _)| *kind).collect();
        let mut dependencies = BTreeMap::new();
        for (kind, deps) in nodes {
            if dependencies.insert(kind, deps).is_some() {
                return Err(Error::DuplicateKind(kind));
            }
        }

        for (kind, deps) in &dependencies {
            if let Some(missing) = deps.iter().find(|d| !dependencies.contains_key(*d)) {
                return Err(Error::unknown_dependency(*kind, *missing));
            }
        }

        let order = topological_order(&declared, &dependencies)?;
        Ok(Self {
            dependencies,
            order,
        })
    }

    /// Every kind, dependencies before dependents
    pub fn order(&self) -> &[ResourceKind] {
        &self.order
    }

    pub fn contains(&self, kind: ResourceKind) -> bool {
        self.dependencies.contains_key(&kind)
    }

    /// Direct dependencies of a kind
    pub fn dependencies(&self, kind: ResourceKind) -> &[ResourceKind] {
        self.dependencies
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// A kind and all of its transitive dependencies, in topological order
    pub fn closure(&self, kind: ResourceKind) -> Result<Vec<ResourceKind>> {
        if !self.contains(kind) {
            return Err(Error::KindNotInGraph(kind));
        }

        let mut needed = vec![kind];
        let mut stack = vec![kind];
        while let Some(current) = stack.pop() {
            for dep in self.dependencies(current) {
                if !needed.contains(dep) {
                    needed.push(*dep);
                    stack.push(*dep);
                }
            }
        }

        Ok(self
            .order
            .iter()
            .copied()
            .filter(|k| needed.contains(k))
            .collect())
    }
}

/// Kahn's algorithm with a stable, declaration-order tie-break
fn topological_order(
    declared: &[ResourceKind],
    dependencies: &BTreeMap<ResourceKind, Vec<ResourceKind>>,
) -> Result<Vec<ResourceKind>> {
    let mut remaining: Vec<ResourceKind> = declared.to_vec();
    let mut order = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let ready = remaining.iter().position(|kind| {
            dependencies
                .get(kind)
                .map(|deps| deps.iter().all(|d| order.contains(d)))
                .unwrap_or(true)
        });

        match ready {
            Some(index) => order.push(remaining.remove(index)),
            None => {
                let stuck = remaining
                    .iter()
                    .map(|k| k.label())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(Error::DependencyCycle(stuck));
            }
        }
    }

    Ok(order)
}
