//! HTTP catalog implementation.
//!
//! This module reads the restaurant catalog from a remote service
//! exposing `GET /restaurants` and `GET /restaurants/{id}/menu`.

use crate::{CatalogError, CatalogFactory, CatalogInterface, CatalogRegistry};
use async_trait::async_trait;
use mealflow_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, MenuItem, Restaurant, Schema,
	ValidationError,
};
use std::time::Duration;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Catalog implementation backed by a remote HTTP service.
pub struct HttpCatalog {
	/// Shared HTTP client with the configured timeout.
	client: reqwest::Client,
	/// Base URL of the catalog service, without a trailing slash.
	base_url: String,
}

impl HttpCatalog {
	/// Creates a new HttpCatalog for the given base URL.
	pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self, CatalogError> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(timeout_seconds))
			.build()
			.map_err(|e| CatalogError::Configuration(e.to_string()))?;

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
		})
	}
}

#[async_trait]
impl CatalogInterface for HttpCatalog {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(HttpCatalogSchema)
	}

	async fn list_restaurants(&self) -> Result<Vec<Restaurant>, CatalogError> {
		let url = format!("{}/restaurants", self.base_url);
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| CatalogError::Network(e.to_string()))?;

		if !response.status().is_success() {
			return Err(CatalogError::Network(format!(
				"{} returned {}",
				url,
				response.status()
			)));
		}

		response
			.json()
			.await
			.map_err(|e| CatalogError::Network(e.to_string()))
	}

	async fn get_menu(&self, restaurant_id: &str) -> Result<Vec<MenuItem>, CatalogError> {
		let url = format!("{}/restaurants/{}/menu", self.base_url, restaurant_id);
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| CatalogError::Network(e.to_string()))?;

		if response.status() == reqwest::StatusCode::NOT_FOUND {
			return Err(CatalogError::NotFound(restaurant_id.to_string()));
		}
		if !response.status().is_success() {
			return Err(CatalogError::Network(format!(
				"{} returned {}",
				url,
				response.status()
			)));
		}

		response
			.json()
			.await
			.map_err(|e| CatalogError::Network(e.to_string()))
	}
}

/// Configuration schema for HttpCatalog.
pub struct HttpCatalogSchema;

impl ConfigSchema for HttpCatalogSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("base_url", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(s) if s.starts_with("http://") || s.starts_with("https://") => Ok(()),
						_ => Err("must start with http:// or https://".to_string()),
					}
				}),
			],
			vec![Field::new(
				"timeout_seconds",
				FieldType::Integer {
					min: Some(1),
					max: Some(300),
				},
			)],
		);

		schema.validate(config)
	}
}

/// Registry for the HTTP catalog implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "http";
	type Factory = CatalogFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn CatalogInterface>, CatalogError> {
			HttpCatalogSchema
				.validate(config)
				.map_err(|e| CatalogError::Configuration(e.to_string()))?;

			let base_url = config
				.get("base_url")
				.and_then(|v| v.as_str())
				.ok_or_else(|| CatalogError::Configuration("base_url is required".to_string()))?
				.to_string();
			let timeout_seconds = config
				.get("timeout_seconds")
				.and_then(|v| v.as_integer())
				.map(|v| v as u64)
				.unwrap_or(DEFAULT_TIMEOUT_SECONDS);

			Ok(Box::new(HttpCatalog::new(base_url, timeout_seconds)?))
		}
	}
}

impl CatalogRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_schema_requires_base_url() {
		let schema = HttpCatalogSchema;
		let empty = toml::from_str::<toml::Value>("").unwrap();
		assert!(schema.validate(&empty).is_err());

		let valid =
			toml::from_str::<toml::Value>(r#"base_url = "http://localhost:4000""#).unwrap();
		assert!(schema.validate(&valid).is_ok());
	}

	#[test]
	fn test_base_url_trailing_slash_stripped() {
		let catalog = HttpCatalog::new("http://localhost:4000/".to_string(), 5).unwrap();
		assert_eq!(catalog.base_url, "http://localhost:4000");
	}
}
