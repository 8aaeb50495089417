/// Order lookup operations. All three are read-only GET forwards.
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AdapterError;
use crate::registry::{parse_args, require_non_empty, schema_of, Method, Operation, Payload};
use crate::tag::pagination_pairs;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FetchOrder {
    /// Order ID to fetch
    pub order_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListOrders {
    /// Filter by user ID
    pub user_id: Option<String>,
    /// Filter by order status
    pub status: Option<String>,
    /// Maximum number of results
    pub limit: Option<u32>,
    /// Offset for pagination
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListOrderFinancials {
    /// Filter by order ID
    pub order_id: Option<String>,
    /// Maximum number of results
    pub limit: Option<u32>,
    /// Offset for pagination
    pub offset: Option<u32>,
}

fn build_fetch_order(args: Value) -> Result<Payload, AdapterError> {
    let input: FetchOrder = parse_args(args)?;
    require_non_empty(&input.order_id, "order_id")?;
    Ok(Payload::Query(vec![("order_id", input.order_id)]))
}

fn build_list_orders(args: Value) -> Result<Payload, AdapterError> {
    let input: ListOrders = parse_args(args)?;
    let mut pairs = Vec::new();
    if let Some(user_id) = input.user_id {
        pairs.push(("user_id", user_id));
    }
    if let Some(status) = input.status {
        pairs.push(("status", status));
    }
    pairs.extend(pagination_pairs(input.limit, input.offset));
    Ok(Payload::Query(pairs))
}

fn build_list_order_financials(args: Value) -> Result<Payload, AdapterError> {
    let input: ListOrderFinancials = parse_args(args)?;
    let mut pairs = Vec::new();
    if let Some(order_id) = input.order_id {
        pairs.push(("order_id", order_id));
    }
    pairs.extend(pagination_pairs(input.limit, input.offset));
    Ok(Payload::Query(pairs))
}

pub fn operations() -> Vec<Operation> {
    vec![
        Operation {
            name: "fetch_order",
            description: "Fetch details for a specific order",
            method: Method::Get,
            path: "/api/v5/entity/order/fetch",
            input_schema: schema_of::<FetchOrder>(),
            build: build_fetch_order,
        },
        Operation {
            name: "list_orders",
            description: "List orders with optional filtering",
            method: Method::Get,
            path: "/api/v5/entity/order/list",
            input_schema: schema_of::<ListOrders>(),
            build: build_list_orders,
        },
        Operation {
            name: "list_order_financials",
            description: "List financial records for orders",
            method: Method::Get,
            path: "/api/v5/entity/order/financial/list",
            input_schema: schema_of::<ListOrderFinancials>(),
            build: build_list_order_financials,
        },
    ]
}
