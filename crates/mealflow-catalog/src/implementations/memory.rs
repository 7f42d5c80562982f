//! Config-seeded catalog implementation.
//!
//! This module serves the restaurant catalog from tables embedded in the
//! configuration file. It is intended for development and testing, where
//! running a separate catalog service would be overkill.

use crate::{CatalogError, CatalogFactory, CatalogInterface, CatalogRegistry};
use async_trait::async_trait;
use mealflow_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, MenuItem, Restaurant, Schema,
	ValidationError,
};
use serde::Deserialize;
use std::collections::HashMap;

/// A restaurant entry in the seeded catalog configuration.
#[derive(Debug, Clone, Deserialize)]
struct SeededRestaurant {
	id: String,
	name: String,
	#[serde(default)]
	menu: Vec<MenuItem>,
}

/// Configuration for the seeded catalog.
#[derive(Debug, Clone, Deserialize)]
struct MemoryCatalogConfig {
	#[serde(default)]
	restaurants: Vec<SeededRestaurant>,
}

/// Catalog implementation backed by configuration tables.
pub struct MemoryCatalog {
	/// Restaurants in configuration order.
	restaurants: Vec<Restaurant>,
	/// Menus keyed by restaurant id.
	menus: HashMap<String, Vec<MenuItem>>,
}

impl MemoryCatalog {
	/// Builds the catalog from parsed configuration entries.
	fn from_config(config: MemoryCatalogConfig) -> Self {
		let mut restaurants = Vec::with_capacity(config.restaurants.len());
		let mut menus = HashMap::with_capacity(config.restaurants.len());

		for seeded in config.restaurants {
			restaurants.push(Restaurant {
				id: seeded.id.clone(),
				name: seeded.name,
			});
			menus.insert(seeded.id, seeded.menu);
		}

		Self { restaurants, menus }
	}
}

#[async_trait]
impl CatalogInterface for MemoryCatalog {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryCatalogSchema)
	}

	async fn list_restaurants(&self) -> Result<Vec<Restaurant>, CatalogError> {
		Ok(self.restaurants.clone())
	}

	async fn get_menu(&self, restaurant_id: &str) -> Result<Vec<MenuItem>, CatalogError> {
		self.menus
			.get(restaurant_id)
			.cloned()
			.ok_or_else(|| CatalogError::NotFound(restaurant_id.to_string()))
	}
}

/// Configuration schema for MemoryCatalog.
pub struct MemoryCatalogSchema;

impl ConfigSchema for MemoryCatalogSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let menu_item_schema = Schema::new(
			vec![
				Field::new("id", FieldType::String),
				Field::new("name", FieldType::String),
				Field::new("price", FieldType::Float { min: Some(0.0) }),
			],
			vec![Field::new("description", FieldType::String)],
		);

		let restaurant_schema = Schema::new(
			vec![
				Field::new("id", FieldType::String),
				Field::new("name", FieldType::String),
			],
			vec![Field::new(
				"menu",
				FieldType::Array(Box::new(FieldType::Table(menu_item_schema))),
			)],
		);

		let schema = Schema::new(
			vec![],
			vec![Field::new(
				"restaurants",
				FieldType::Array(Box::new(FieldType::Table(restaurant_schema))),
			)],
		);

		schema.validate(config)
	}
}

/// Registry for the config-seeded catalog implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = CatalogFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn CatalogInterface>, CatalogError> {
			MemoryCatalogSchema
				.validate(config)
				.map_err(|e| CatalogError::Configuration(e.to_string()))?;

			let parsed: MemoryCatalogConfig = config
				.clone()
				.try_into()
				.map_err(|e| CatalogError::Configuration(format!("Invalid memory config: {}", e)))?;

			Ok(Box::new(MemoryCatalog::from_config(parsed)))
		}
	}
}

impl CatalogRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal::Decimal;

	fn sample_config() -> toml::Value {
		toml::from_str(
			r#"
			[[restaurants]]
			id = "rest-1"
			name = "Bella Napoli"

			[[restaurants.menu]]
			id = "m-1"
			name = "Margherita"
			description = "Tomato, mozzarella, basil"
			price = 10.0

			[[restaurants.menu]]
			id = "m-2"
			name = "Diavola"
			price = 12.5

			[[restaurants]]
			id = "rest-2"
			name = "Sakura Sushi"
			"#,
		)
		.unwrap()
	}

	#[tokio::test]
	async fn test_lists_seeded_restaurants() {
		let catalog = Registry::factory()(&sample_config()).unwrap();

		let restaurants = catalog.list_restaurants().await.unwrap();
		assert_eq!(restaurants.len(), 2);
		assert_eq!(restaurants[0].id, "rest-1");
		assert_eq!(restaurants[1].name, "Sakura Sushi");
	}

	#[tokio::test]
	async fn test_menu_lookup() {
		let catalog = Registry::factory()(&sample_config()).unwrap();

		let menu = catalog.get_menu("rest-1").await.unwrap();
		assert_eq!(menu.len(), 2);
		assert_eq!(menu[0].name, "Margherita");
		assert_eq!(menu[0].price, Decimal::from(10));
		assert_eq!(menu[1].price, Decimal::new(125, 1));

		// Restaurant without a seeded menu still resolves, to an empty one.
		let empty = catalog.get_menu("rest-2").await.unwrap();
		assert!(empty.is_empty());

		let missing = catalog.get_menu("rest-9").await;
		assert!(matches!(missing, Err(CatalogError::NotFound(_))));
	}

	#[test]
	fn test_schema_rejects_negative_price() {
		let config = toml::from_str::<toml::Value>(
			r#"
			[[restaurants]]
			id = "rest-1"
			name = "Bad Prices"

			[[restaurants.menu]]
			id = "m-1"
			name = "Free Lunch"
			price = -1.0
			"#,
		)
		.unwrap();
		assert!(Registry::factory()(&config).is_err());
	}
}
