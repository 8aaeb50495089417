/// Lead import. The one operation that forwards a caller-supplied sequence:
/// records go upstream in input order and the per-record outcomes upstream
/// reports come back untouched.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdapterError;
use crate::registry::{body_of, parse_args, schema_of, Method, Operation, Payload};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ImportLeads {
    /// Array of raw lead objects to import
    pub leads_data: Vec<Value>,
    /// Source of the leads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

fn build_import_leads(args: Value) -> Result<Payload, AdapterError> {
    let input: ImportLeads = parse_args(args)?;
    if input.leads_data.is_empty() {
        return Err(AdapterError::validation("leads_data must not be empty"));
    }
    for (index, record) in input.leads_data.iter().enumerate() {
        if !record.is_object() {
            return Err(AdapterError::Validation(format!(
                "leads_data[{index}] must be an object"
            )));
        }
    }
    Ok(body_of(&input))
}

pub fn operations() -> Vec<Operation> {
    vec![Operation {
        name: "import_leads",
        description: "Import leads from raw data",
        method: Method::Post,
        path: "/api/v5/entity/leads/import",
        input_schema: schema_of::<ImportLeads>(),
        build: build_import_leads,
    }]
}
