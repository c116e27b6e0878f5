//! Get-or-create resolution of fixtures

use colored::Colorize;
use serde_json::Value;

use crate::common::config::AgentConfig;
use crate::common::Result;
use crate::http::{CallOutcome, Invoker};

use super::payload::{self, PayloadGap};
use super::{DependencyGraph, FixtureRegistry, ResourceKind};

/// Resolves fixtures into a registry, one kind at a time
pub struct Resolver<'a> {
    invoker: &'a Invoker,
    graph: &'a DependencyGraph,
    agent: &'a AgentConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(invoker: &'a Invoker, graph: &'a DependencyGraph, agent: &'a AgentConfig) -> Self {
        Self {
            invoker,
            graph,
            agent,
        }
    }

    /// Resolve every kind in the graph, dependencies first
    pub async fn resolve_all(&self, registry: &mut FixtureRegistry) -> Result<()> {
        for kind in self.graph.order() {
            self.resolve(registry, *kind).await?;
        }
        Ok(())
    }

    /// Resolve a kind and, before it, every kind it depends on
    ///
    /// Kinds already in the registry are skipped without any call, so
    /// repeated resolution within a run neither re-lists nor re-creates.
    pub async fn resolve(
        &self,
        registry: &mut FixtureRegistry,
        kind: ResourceKind,
    ) -> Result<Vec<String>> {
        for step in self.graph.closure(kind)? {
            if registry.is_resolved(step) {
                continue;
            }
            let ids = self.resolve_one(registry, step).await;
            registry.record(step, ids)?;
        }
        Ok(registry.ids(kind).to_vec())
    }

    async fn resolve_one(&self, registry: &FixtureRegistry, kind: ResourceKind) -> Vec<String> {
        println!("{} {}", "Resolving".cyan().bold(), kind.to_string().white().bold());

        if let Some(list_path) = kind.list_path() {
            match self.invoker.get(list_path).await {
                CallOutcome::Success { status: 200, body } => {
                    match body.json() {
                        Some(Value::Array(items)) => {
                            let ids = collect_ids(items);
                            if !ids.is_empty() {
                                println!(
                                    "  {} Reusing {} existing {}\n",
                                    "✓".green(),
                                    ids.len(),
                                    kind
                                );
                                tracing::info!(%kind, count = ids.len(), "Reusing fixtures");
                                return ids;
                            }
                            println!("  No {} found. Creating one for the tests.", kind);
                        }
                        _ => {
                            println!(
                                "  {} Listing {} did not return a collection. Creating one for the tests.",
                                "!".yellow(),
                                kind
                            );
                        }
                    }
                }
                other => {
                    println!(
                        "  {} Could not list {} ({}). Creating one for the tests.",
                        "!".yellow(),
                        kind,
                        other.describe()
                    );
                }
            }
        } else {
            println!("  Provisioning {}.", kind);
        }

        let body = match payload::synthesize(kind, registry, self.agent) {
            Ok(body) => body,
            Err(PayloadGap::MissingDependency(missing)) => {
                println!(
                    "  {} Missing prerequisite: no {} available to create {}\n",
                    "⊘".yellow(),
                    missing,
                    kind
                );
                tracing::warn!(%kind, %missing, "Skipping creation, dependency has no fixtures");
                return Vec::new();
            }
            Err(gap) => {
                println!("  {} Cannot create {}: {}\n", "✗".red(), kind, gap);
                tracing::error!(%kind, %gap, "Skipping creation");
                return Vec::new();
            }
        };

        let outcome = self.invoker.post(kind.create_path(), &body).await;
        let created = outcome
            .success_json(201)
            .and_then(|json| created_id(json, kind.envelope()));

        match created {
            Some(id) => {
                println!("  {} Created {} fixture {}\n", "✓".green(), kind, id.dimmed());
                tracing::info!(%kind, %id, "Created fixture");
                vec![id]
            }
            None => {
                let reason = match outcome.status() {
                    Some(201) => "created, but no id in response".to_string(),
                    _ => outcome.describe(),
                };
                println!(
                    "  {} Failed to create {} fixture ({}). Dependent tests will be skipped.\n",
                    "✗".red(),
                    kind,
                    reason
                );
                tracing::warn!(%kind, %reason, "Fixture creation failed");
                Vec::new()
            }
        }
    }
}

/// Id of an object, from `_id` or `id`
fn object_id(value: &Value) -> Option<String> {
    value
        .get("_id")
        .or_else(|| value.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Ids of every element of a listing that has one
fn collect_ids(items: &[Value]) -> Vec<String> {
    items.iter().filter_map(object_id).collect()
}

/// Id of a created object, looking inside the envelope first
fn created_id(body: &Value, envelope: Option<&str>) -> Option<String> {
    envelope
        .and_then(|key| body.get(key))
        .and_then(object_id)
        .or_else(|| object_id(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{FakeTransport, Verb};
    use serde_json::json;
    use std::sync::Arc;

    struct Harness {
        fake: Arc<FakeTransport>,
        invoker: Invoker,
        graph: DependencyGraph,
        agent: AgentConfig,
    }

    impl Harness {
        fn new() -> Self {
            let fake = Arc::new(FakeTransport::new());
            let invoker = Invoker::new(fake.clone(), FakeTransport::BASE_URL);
            Self {
                fake,
                invoker,
                graph: DependencyGraph::standard().unwrap(),
                agent: AgentConfig::default(),
            }
        }

        fn resolver(&self) -> Resolver<'_> {
            Resolver::new(&self.invoker, &self.graph, &self.agent)
        }
    }

    #[test]
    fn test_created_id_envelope_and_bare() {
        assert_eq!(
            created_id(&json!({"message": "ok", "table": {"_id": "t1"}}), Some("table")),
            Some("t1".to_string())
        );
        assert_eq!(
            created_id(&json!({"_id": "p1", "nome": "x"}), None),
            Some("p1".to_string())
        );
        assert_eq!(created_id(&json!({"message": "ok"}), Some("user")), None);
    }

    #[test]
    fn test_collect_ids_skips_elements_without_id() {
        let items = vec![json!({"_id": "a"}), json!({"nome": "x"}), json!({"id": "b"})];
        assert_eq!(collect_ids(&items), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_existing_fixtures_are_reused_without_post() {
        let h = Harness::new();
        h.fake.respond(
            Verb::Get,
            "/customers",
            200,
            json!([{"_id": "c1"}, {"_id": "c2"}]),
        );

        let mut registry = FixtureRegistry::new();
        let ids = h
            .resolver()
            .resolve(&mut registry, ResourceKind::Customer)
            .await
            .unwrap();

        assert_eq!(ids, vec!["c1", "c2"]);
        assert!(h.fake.requests_to(Verb::Post, "/customers").is_empty());
    }

    #[tokio::test]
    async fn test_tables_on_empty_backend_create_environment_first() {
        let h = Harness::new();
        h.fake
            .respond(Verb::Get, "/ambientes", 200, json!([]))
            .respond(
                Verb::Post,
                "/ambientes",
                201,
                json!({"message": "Ambiente criado com sucesso", "ambiente": {"_id": "env1"}}),
            )
            .respond(Verb::Get, "/tables", 200, json!([]))
            .respond(
                Verb::Post,
                "/tables",
                201,
                json!({"message": "Mesa criada com sucesso", "table": {"_id": "t1"}}),
            );

        let mut registry = FixtureRegistry::new();
        let ids = h
            .resolver()
            .resolve(&mut registry, ResourceKind::Table)
            .await
            .unwrap();

        assert_eq!(ids, vec!["t1"]);
        assert_eq!(registry.ids(ResourceKind::Environment), &["env1".to_string()]);
        assert_eq!(
            h.fake.calls(),
            vec![
                (Verb::Get, "/ambientes".to_string()),
                (Verb::Post, "/ambientes".to_string()),
                (Verb::Get, "/tables".to_string()),
                (Verb::Post, "/tables".to_string()),
            ]
        );

        let env_post = &h.fake.requests_to(Verb::Post, "/ambientes")[0];
        assert_eq!(
            env_post.body,
            Some(json!({"nome": "Ambiente Teste", "limitePessoas": 50}))
        );
        let table_post = &h.fake.requests_to(Verb::Post, "/tables")[0];
        assert_eq!(
            table_post.body,
            Some(json!({
                "numeroMesa": 999,
                "ambienteId": "env1",
                "position": {"x": 0, "y": 0},
                "numeroAssentos": 4,
                "capacidade": 4
            }))
        );
    }

    #[tokio::test]
    async fn test_products_skipped_without_categories() {
        let h = Harness::new();
        h.fake
            .respond(Verb::Get, "/categories", 500, json!({"message": "boom"}))
            .respond(Verb::Post, "/categories", 400, json!({"message": "invalid"}))
            .respond(Verb::Get, "/products", 200, json!([]));

        let mut registry = FixtureRegistry::new();
        let ids = h
            .resolver()
            .resolve(&mut registry, ResourceKind::Product)
            .await
            .unwrap();

        assert!(ids.is_empty());
        assert!(registry.is_resolved(ResourceKind::Category));
        assert!(registry.is_resolved(ResourceKind::Product));
        assert!(h.fake.requests_to(Verb::Post, "/products").is_empty());
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent_per_run() {
        let h = Harness::new();
        h.fake.respond(Verb::Get, "/ingredients", 200, json!([{"_id": "i1"}]));

        let mut registry = FixtureRegistry::new();
        let resolver = h.resolver();
        resolver
            .resolve(&mut registry, ResourceKind::Ingredient)
            .await
            .unwrap();
        resolver
            .resolve(&mut registry, ResourceKind::Ingredient)
            .await
            .unwrap();

        assert_eq!(h.fake.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_listing_falls_back_to_creation() {
        let h = Harness::new();
        h.fake
            .fail(Verb::Get, "/customers", "connection reset")
            .respond(
                Verb::Post,
                "/customers",
                201,
                json!({"customer": {"_id": "c9"}}),
            );

        let mut registry = FixtureRegistry::new();
        let ids = h
            .resolver()
            .resolve(&mut registry, ResourceKind::Customer)
            .await
            .unwrap();
        assert_eq!(ids, vec!["c9"]);
    }

    #[tokio::test]
    async fn test_failed_creation_records_empty_set() {
        let h = Harness::new();
        h.fake
            .respond(Verb::Get, "/employees", 403, json!({"message": "Acesso negado"}))
            .respond(Verb::Post, "/employees", 403, json!({"message": "Acesso negado"}));

        let mut registry = FixtureRegistry::new();
        let ids = h
            .resolver()
            .resolve(&mut registry, ResourceKind::Staff)
            .await
            .unwrap();
        assert!(ids.is_empty());
        assert!(registry.is_resolved(ResourceKind::Staff));
    }

    #[tokio::test]
    async fn test_agent_is_provisioned_without_listing() {
        let h = Harness::new();
        h.fake.respond(
            Verb::Post,
            "/auth/register",
            201,
            json!({"message": "Usuário registrado com sucesso", "user": {"_id": "u1"}}),
        );

        let mut registry = FixtureRegistry::new();
        let ids = h
            .resolver()
            .resolve(&mut registry, ResourceKind::Agent)
            .await
            .unwrap();
        assert_eq!(ids, vec!["u1"]);
        assert_eq!(h.fake.calls(), vec![(Verb::Post, "/auth/register".to_string())]);
    }

    #[tokio::test]
    async fn test_agent_created_without_id_skips_sales_goals() {
        use crate::scenarios::{run_scenarios, Scenario, ScenarioOutcome};

        let h = Harness::new();
        h.fake.respond(
            Verb::Post,
            "/auth/register",
            201,
            json!({"message": "Usuário registrado com sucesso"}),
        );

        let mut registry = FixtureRegistry::new();
        for kind in ResourceKind::ALL {
            if kind != ResourceKind::Agent {
                registry.record(kind, Vec::new()).unwrap();
            }
        }
        let ids = h
            .resolver()
            .resolve(&mut registry, ResourceKind::Agent)
            .await
            .unwrap();
        assert!(ids.is_empty());
        assert!(registry.is_resolved(ResourceKind::Agent));

        let reports = run_scenarios(&h.invoker, &registry, &[Scenario::SalesGoals]).await;
        assert_eq!(
            reports[0].outcome,
            ScenarioOutcome::Skipped {
                missing: "agents".to_string()
            }
        );
        assert!(h.fake.requests_to(Verb::Post, "/sales-goals").is_empty());
    }
}
