//! Scenario runner implementation
//!
//! Runs each selected scenario in declared order against the backend,
//! reading fixtures from the registry. Every scenario produces a report;
//! none of them can stop the others.

use colored::Colorize;
use serde_json::Value;

use crate::fixtures::payload::{
    CategoryPayload, IngredientPayload, Position, ProductPayload, TablePayload,
};
use crate::fixtures::FixtureRegistry;
use crate::http::{CallOutcome, Invoker};

use super::payload::{
    OrderItem, OrderPayload, PaymentPayload, ReservationPayload, SalesGoalPayload, StockUpdate,
};
use super::{Scenario, ScenarioOutcome, ScenarioReport};

/// Run the selected scenarios in declared order
///
/// An empty selection runs every scenario.
pub async fn run_scenarios(
    invoker: &Invoker,
    registry: &FixtureRegistry,
    selection: &[Scenario],
) -> Vec<ScenarioReport> {
    let mut reports = Vec::new();

    for scenario in Scenario::ALL {
        if !selection.is_empty() && !selection.contains(&scenario) {
            continue;
        }

        println!("{}\n", format!("=== {} ===", scenario.title()).blue().bold());
        let outcome = run_scenario(invoker, registry, scenario).await;

        match &outcome {
            ScenarioOutcome::Passed { status } => {
                println!("  {} {} ({})\n", "✓".green(), scenario, status);
            }
            ScenarioOutcome::Failed { reason } => {
                println!("  {} {}: {}\n", "✗".red(), scenario, reason);
            }
            ScenarioOutcome::Skipped { missing } => {
                println!(
                    "  {} {} skipped: missing prerequisite '{}'\n",
                    "⊘".yellow(),
                    scenario,
                    missing
                );
            }
        }
        tracing::info!(%scenario, ?outcome, "Scenario finished");

        reports.push(ScenarioReport { scenario, outcome });
    }

    reports
}

/// Run one scenario: list, check prerequisites, then exercise
async fn run_scenario(
    invoker: &Invoker,
    registry: &FixtureRegistry,
    scenario: Scenario,
) -> ScenarioOutcome {
    if let Some(listing) = scenario.listing() {
        invoker.get(listing).await;
    }

    let fixtures = match registry.require(scenario.requires()) {
        Ok(fixtures) => fixtures,
        Err(missing) => {
            tracing::warn!(%scenario, %missing, "Missing prerequisite");
            return ScenarioOutcome::Skipped {
                missing: missing.to_string(),
            };
        }
    };

    match (scenario, fixtures.as_slice()) {
        (Scenario::Reservations, [customer, table]) => {
            let reservation = ReservationPayload {
                customer_id: customer.to_string(),
                table_id: table.to_string(),
                reservation_date: "2024-12-01T20:00:00Z".to_string(),
                party_size: 2,
            };
            outcome_of(invoker.post("/reservations", &reservation).await)
        }
        (Scenario::Tables, [environment]) => {
            let table = TablePayload::four_seater(1000, environment, Position { x: 50, y: 50 });
            outcome_of(invoker.post("/tables", &table).await)
        }
        (Scenario::Orders, [table, recipe, customer, waiter]) => {
            let order = OrderPayload {
                table_id: table.to_string(),
                items: vec![OrderItem {
                    recipe: recipe.to_string(),
                    quantity: 2,
                }],
                customer_id: customer.to_string(),
                waiter_id: waiter.to_string(),
                order_type: "local".to_string(),
            };
            outcome_of(invoker.post("/orders", &order).await)
        }
        (Scenario::Ingredients, []) => {
            let ingredient = IngredientPayload::named("Ingrediente Teste Smoke");
            outcome_of(invoker.post("/ingredients", &ingredient).await)
        }
        (Scenario::IfoodAuthStart, []) => outcome_of(invoker.post_empty("/ifood/auth/start").await),
        (Scenario::Products, [category]) => {
            let product = ProductPayload {
                name: "Produto Teste Smoke".to_string(),
                category_id: category.to_string(),
                price: 150.0,
                description: "Descrição do produto teste criado pelo smoke test.".to_string(),
                available: true,
                stock: 20,
            };
            outcome_of(invoker.post("/products", &product).await)
        }
        (Scenario::Reports, []) => outcome_of(invoker.get("/reports/statistics").await),
        (Scenario::Payments, []) => run_payment(invoker).await,
        (Scenario::SalesGoals, [agent]) => {
            let goal = SalesGoalPayload {
                employee_id: agent.to_string(),
                goal_name: "Meta Teste Smoke".to_string(),
                goal_amount: 1000.0,
                start_date: "2024-12-01".to_string(),
                end_date: "2024-12-31".to_string(),
            };
            outcome_of(invoker.post("/sales-goals", &goal).await)
        }
        (Scenario::Stock, [product]) => {
            let update = StockUpdate { stock: 80 };
            outcome_of(invoker.put(&format!("/stock/{}", product), &update).await)
        }
        (Scenario::Categories, []) => {
            let category = CategoryPayload::new(
                "Categoria Teste Smoke",
                "Descrição da categoria criada pelo smoke test.",
            );
            outcome_of(invoker.post("/categories", &category).await)
        }
        (scenario, fixtures) => ScenarioOutcome::Failed {
            reason: format!(
                "{} received {} fixtures, expected {}",
                scenario,
                fixtures.len(),
                scenario.requires().len()
            ),
        },
    }
}

/// Pay the first order the backend lists
async fn run_payment(invoker: &Invoker) -> ScenarioOutcome {
    let listing = invoker.get("/orders").await;
    let orders = match listing.success_json(200) {
        Some(Value::Array(orders)) => orders,
        _ => {
            return ScenarioOutcome::Failed {
                reason: format!("could not list orders ({})", listing.describe()),
            }
        }
    };

    let order_id = orders
        .first()
        .and_then(|order| order.get("_id").or_else(|| order.get("id")))
        .and_then(Value::as_str);

    let Some(order_id) = order_id else {
        tracing::warn!("No order available to pay");
        return ScenarioOutcome::Skipped {
            missing: "orders".to_string(),
        };
    };

    let payment = PaymentPayload {
        order_id: order_id.to_string(),
        method: "Cartão".to_string(),
        amount: 1000.0,
    };
    outcome_of(invoker.post("/payments", &payment).await)
}

fn outcome_of(call: CallOutcome) -> ScenarioOutcome {
    match call {
        CallOutcome::Success { status, .. } => ScenarioOutcome::Passed { status },
        other => ScenarioOutcome::Failed {
            reason: other.describe(),
        },
    }
}

/// Print a pass/fail/skip table for the run
pub fn print_summary(reports: &[ScenarioReport]) {
    let passed = reports.iter().filter(|r| r.outcome.is_passed()).count();
    let skipped = reports.iter().filter(|r| r.outcome.is_skipped()).count();
    let failed = reports.len() - passed - skipped;

    println!("{}", "Summary:".cyan().bold());
    for report in reports {
        let (mark, detail) = match &report.outcome {
            ScenarioOutcome::Passed { status } => ("✓".green(), status.to_string()),
            ScenarioOutcome::Failed { reason } => ("✗".red(), reason.clone()),
            ScenarioOutcome::Skipped { missing } => ("⊘".yellow(), format!("missing {}", missing)),
        };
        println!("  {} {:18} {}", mark, report.scenario.name(), detail.dimmed());
    }
    println!(
        "\n  {} passed, {} failed, {} skipped\n",
        passed.to_string().green().bold(),
        failed.to_string().red().bold(),
        skipped.to_string().yellow().bold()
    );
}
