//! Config-seeded roster implementation.
//!
//! This module resolves courier names from a table embedded in the
//! configuration file, for development and testing.

use crate::{RosterError, RosterFactory, RosterInterface, RosterRegistry};
use async_trait::async_trait;
use mealflow_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError,
};
use std::collections::HashMap;

/// Roster implementation backed by a configuration table.
pub struct MemoryRoster {
	/// Courier id to display name mapping.
	couriers: HashMap<String, String>,
}

impl MemoryRoster {
	/// Creates a new MemoryRoster from a courier table.
	pub fn new(couriers: HashMap<String, String>) -> Self {
		Self { couriers }
	}
}

#[async_trait]
impl RosterInterface for MemoryRoster {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryRosterSchema)
	}

	async fn resolve_name(&self, courier_id: &str) -> Result<Option<String>, RosterError> {
		Ok(self.couriers.get(courier_id).cloned())
	}
}

/// Configuration schema for MemoryRoster.
pub struct MemoryRosterSchema;

impl ConfigSchema for MemoryRosterSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// Courier ids are free-form keys, so the nested table is left open.
		let schema = Schema::new(
			vec![],
			vec![Field::new(
				"couriers",
				FieldType::Table(Schema::new(vec![], vec![])),
			)],
		);
		schema.validate(config)
	}
}

/// Registry for the config-seeded roster implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = RosterFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn RosterInterface>, RosterError> {
			let mut couriers = HashMap::new();
			if let Some(table) = config.get("couriers").and_then(|v| v.as_table()) {
				for (id, name) in table {
					let name = name.as_str().ok_or_else(|| {
						RosterError::Configuration(format!(
							"Courier '{}' name must be a string",
							id
						))
					})?;
					couriers.insert(id.clone(), name.to_string());
				}
			}
			Ok(Box::new(MemoryRoster::new(couriers)))
		}
	}
}

impl RosterRegistry for Registry {}
