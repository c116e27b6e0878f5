//! Minimal creation payloads for each resource kind
//!
//! Field names on the wire follow the backend's contract; the Rust names are
//! the English equivalents.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::common::config::AgentConfig;

use super::{FixtureRegistry, ResourceKind};

#[derive(Debug, Clone, Serialize)]
pub struct CustomerPayload {
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "limitePessoas")]
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TablePayload {
    #[serde(rename = "numeroMesa")]
    pub number: u32,
    #[serde(rename = "ambienteId")]
    pub environment_id: String,
    pub position: Position,
    #[serde(rename = "numeroAssentos")]
    pub seats: u32,
    #[serde(rename = "capacidade")]
    pub capacity: u32,
}

impl TablePayload {
    /// Four-seat table in the given environment
    pub fn four_seater(number: u32, environment_id: &str, position: Position) -> Self {
        Self {
            number,
            environment_id: environment_id.to_string(),
            position,
            seats: 4,
            capacity: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "unidadeMedida")]
    pub unit: String,
    #[serde(rename = "quantidadeEstoque")]
    pub stock: u32,
    #[serde(rename = "precoCusto")]
    pub cost: f64,
}

impl IngredientPayload {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            unit: "kg".to_string(),
            stock: 50,
            cost: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeIngredient {
    #[serde(rename = "ingrediente")]
    pub ingredient: String,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipePayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "ingredientes")]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(rename = "precoVenda")]
    pub price: f64,
    #[serde(rename = "descricao")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPayload {
    #[serde(rename = "categoria")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
}

impl CategoryPayload {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category_id: String,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "disponivel")]
    pub available: bool,
    #[serde(rename = "quantidadeEstoque")]
    pub stock: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "funcao")]
    pub role: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub secret: String,
}

/// Registration of a user account
#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub secret: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl From<&AgentConfig> for RegisterPayload {
    fn from(agent: &AgentConfig) -> Self {
        Self {
            name: agent.name.clone(),
            email: agent.email.clone(),
            secret: agent.secret.clone(),
            role: "agent".to_string(),
            permissions: agent.permissions.clone(),
        }
    }
}

/// Roles the backend accepts for an employee
pub const STAFF_ROLES: [&str; 3] = ["Garçom", "Cozinheiro", "Gerente"];

/// Why no creation payload could be built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadGap {
    /// A dependency kind has no resolved fixtures
    MissingDependency(ResourceKind),
    Serialize(String),
}

impl fmt::Display for PayloadGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadGap::MissingDependency(kind) => write!(f, "no {} available", kind),
            PayloadGap::Serialize(e) => write!(f, "payload could not be serialized: {}", e),
        }
    }
}

/// Build the synthetic creation payload for a kind
///
/// Fails with the dependency kind whose resolved set is empty; no payload
/// with a missing reference is ever produced.
pub fn synthesize(
    kind: ResourceKind,
    registry: &FixtureRegistry,
    agent: &AgentConfig,
) -> Result<Value, PayloadGap> {
    let dependency = |dep: ResourceKind| {
        registry
            .first(dep)
            .map(str::to_string)
            .ok_or(PayloadGap::MissingDependency(dep))
    };

    match kind {
        ResourceKind::Customer => to_value(&CustomerPayload {
            name: "Teste Cliente".to_string(),
            cpf: "000.000.000-00".to_string(),
            phone: "11999999999".to_string(),
            email: "teste_cliente@example.com".to_string(),
        }),
        ResourceKind::Environment => to_value(&EnvironmentPayload {
            name: "Ambiente Teste".to_string(),
            limit: 50,
        }),
        ResourceKind::Table => {
            let environment = dependency(ResourceKind::Environment)?;
            to_value(&TablePayload::four_seater(
                999,
                &environment,
                Position { x: 0, y: 0 },
            ))
        }
        ResourceKind::Ingredient => to_value(&IngredientPayload::named("Ingrediente Teste")),
        ResourceKind::Recipe => {
            let ingredient = dependency(ResourceKind::Ingredient)?;
            to_value(&RecipePayload {
                name: "Receita Teste".to_string(),
                category: "Pratos Principais".to_string(),
                ingredients: vec![RecipeIngredient {
                    ingredient,
                    quantity: 1,
                }],
                price: 50.0,
                description: "Descrição da receita teste.".to_string(),
            })
        }
        ResourceKind::Category => to_value(&CategoryPayload::new(
            "Categoria Teste",
            "Descrição da categoria teste.",
        )),
        ResourceKind::Product => {
            let category_id = dependency(ResourceKind::Category)?;
            to_value(&ProductPayload {
                name: "Produto Teste".to_string(),
                category_id,
                price: 100.0,
                description: "Descrição do produto teste.".to_string(),
                available: true,
                stock: 10,
            })
        }
        ResourceKind::Staff => to_value(&StaffPayload {
            name: "Garçom Teste".to_string(),
            role: STAFF_ROLES[0].to_string(),
            email: "garcom_teste@example.com".to_string(),
            secret: "senha123".to_string(),
        }),
        ResourceKind::Agent => to_value(&RegisterPayload::from(agent)),
    }
}

fn to_value<T: Serialize>(payload: &T) -> Result<Value, PayloadGap> {
    serde_json::to_value(payload).map_err(|e| PayloadGap::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_payload_wire_shape() {
        let mut registry = FixtureRegistry::new();
        registry
            .record(ResourceKind::Environment, vec!["env1".into()])
            .unwrap();

        let payload = synthesize(ResourceKind::Table, &registry, &AgentConfig::default()).unwrap();
        assert_eq!(
            payload,
            json!({
                "numeroMesa": 999,
                "ambienteId": "env1",
                "position": {"x": 0, "y": 0},
                "numeroAssentos": 4,
                "capacidade": 4
            })
        );
    }

    #[test]
    fn test_environment_payload() {
        let payload = synthesize(
            ResourceKind::Environment,
            &FixtureRegistry::new(),
            &AgentConfig::default(),
        )
        .unwrap();
        assert_eq!(payload, json!({"nome": "Ambiente Teste", "limitePessoas": 50}));
    }

    #[test]
    fn test_missing_dependency_yields_no_payload() {
        let registry = FixtureRegistry::new();
        let agent = AgentConfig::default();
        assert_eq!(
            synthesize(ResourceKind::Product, &registry, &agent).unwrap_err(),
            PayloadGap::MissingDependency(ResourceKind::Category)
        );
        assert_eq!(
            synthesize(ResourceKind::Recipe, &registry, &agent).unwrap_err(),
            PayloadGap::MissingDependency(ResourceKind::Ingredient)
        );
    }

    #[test]
    fn test_staff_role_is_accepted_by_backend() {
        let payload = synthesize(
            ResourceKind::Staff,
            &FixtureRegistry::new(),
            &AgentConfig::default(),
        )
        .unwrap();
        let role = payload["funcao"].as_str().unwrap();
        assert!(STAFF_ROLES.contains(&role), "unexpected role '{}'", role);
        assert_eq!(role, "Garçom");
    }

    #[test]
    fn test_agent_registration_uses_config() {
        let agent = AgentConfig {
            email: "ops@example.com".to_string(),
            ..AgentConfig::default()
        };
        let payload = synthesize(ResourceKind::Agent, &FixtureRegistry::new(), &agent).unwrap();
        assert_eq!(payload["email"], "ops@example.com");
        assert_eq!(payload["role"], "agent");
        assert_eq!(payload["permissions"], json!(["viewDashboard", "createOrder"]));
    }
}
