//! Request bodies issued by scenarios

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReservationPayload {
    #[serde(rename = "clienteId")]
    pub customer_id: String,
    #[serde(rename = "mesaId")]
    pub table_id: String,
    #[serde(rename = "dataReserva")]
    pub reservation_date: String,
    #[serde(rename = "numeroPessoas")]
    pub party_size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    #[serde(rename = "receita")]
    pub recipe: String,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderPayload {
    #[serde(rename = "mesaId")]
    pub table_id: String,
    #[serde(rename = "itens")]
    pub items: Vec<OrderItem>,
    #[serde(rename = "clienteId")]
    pub customer_id: String,
    #[serde(rename = "garcomId")]
    pub waiter_id: String,
    #[serde(rename = "tipoPedido")]
    pub order_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentPayload {
    #[serde(rename = "pedidoId")]
    pub order_id: String,
    #[serde(rename = "metodoPagamento")]
    pub method: String,
    #[serde(rename = "valorPago")]
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesGoalPayload {
    pub employee_id: String,
    pub goal_name: String,
    pub goal_amount: f64,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockUpdate {
    #[serde(rename = "quantidadeEstoque")]
    pub stock: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sales_goal_is_camel_case() {
        let goal = SalesGoalPayload {
            employee_id: "u1".to_string(),
            goal_name: "Meta".to_string(),
            goal_amount: 1000.0,
            start_date: "2024-12-01".to_string(),
            end_date: "2024-12-31".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&goal).unwrap(),
            json!({
                "employeeId": "u1",
                "goalName": "Meta",
                "goalAmount": 1000.0,
                "startDate": "2024-12-01",
                "endDate": "2024-12-31"
            })
        );
    }
}
