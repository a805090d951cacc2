use clap::Args;
use serde_json::{json, Value};

use holding_projection_core::entity::{self, EntityInput};
use holding_projection_core::validation;

use crate::input;

/// Arguments shared by every projection view
#[derive(Args)]
pub struct ProjectionArgs {
    /// Path to the entity description (JSON or YAML)
    #[arg(long)]
    pub input: Option<String>,

    /// Number of years to project (defaults to the configured horizon)
    #[arg(long)]
    pub horizon: Option<u32>,
}

/// Arguments for entity validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the entity description (JSON or YAML)
    #[arg(long)]
    pub input: Option<String>,
}

fn load_entity(path: &Option<String>) -> Result<EntityInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = path {
        input::file::read_input(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input <file.json|file.yaml> or stdin required for projections".into())
    }
}

pub fn run_project(args: ProjectionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let entity_input = load_entity(&args.input)?;
    let result = entity::run_projection(&entity_input, args.horizon)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_income_statement(args: ProjectionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let entity_input = load_entity(&args.input)?;
    let result = entity::run_income_statements(&entity_input, args.horizon)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_treasury(args: ProjectionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let entity_input = load_entity(&args.input)?;
    let result = entity::run_treasury(&entity_input, args.horizon)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_properties(args: ProjectionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let entity_input = load_entity(&args.input)?;
    let result = entity::run_property_summary(&entity_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let entity_input = load_entity(&args.input)?;
    let messages = validation::validate_entity(&entity_input);
    Ok(json!({
        "result": {
            "entity": entity_input.name,
            "valid": messages.is_empty(),
            "property_count": entity_input.properties.len(),
            "messages": messages,
        }
    }))
}
