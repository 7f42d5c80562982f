//! HTTP roster implementation.
//!
//! This module resolves courier names against a remote staff service
//! exposing `GET /couriers/{id}`. A 404 from the service is a normal
//! outcome and resolves to no name.

use crate::{RosterError, RosterFactory, RosterInterface, RosterRegistry};
use async_trait::async_trait;
use mealflow_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError,
};
use serde::Deserialize;
use std::time::Duration;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Response body returned by the staff service for a courier lookup.
#[derive(Debug, Deserialize)]
struct CourierResponse {
	name: String,
}

/// Roster implementation backed by a remote HTTP service.
pub struct HttpRoster {
	/// Shared HTTP client with the configured timeout.
	client: reqwest::Client,
	/// Base URL of the staff service, without a trailing slash.
	base_url: String,
}

impl HttpRoster {
	/// Creates a new HttpRoster for the given base URL.
	pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self, RosterError> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(timeout_seconds))
			.build()
			.map_err(|e| RosterError::Configuration(e.to_string()))?;

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
		})
	}
}

#[async_trait]
impl RosterInterface for HttpRoster {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(HttpRosterSchema)
	}

	async fn resolve_name(&self, courier_id: &str) -> Result<Option<String>, RosterError> {
		let url = format!("{}/couriers/{}", self.base_url, courier_id);
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| RosterError::Network(e.to_string()))?;

		if response.status() == reqwest::StatusCode::NOT_FOUND {
			return Ok(None);
		}
		if !response.status().is_success() {
			return Err(RosterError::Network(format!(
				"{} returned {}",
				url,
				response.status()
			)));
		}

		let courier: CourierResponse = response
			.json()
			.await
			.map_err(|e| RosterError::Network(e.to_string()))?;
		Ok(Some(courier.name))
	}
}

/// Configuration schema for HttpRoster.
pub struct HttpRosterSchema;

impl ConfigSchema for HttpRosterSchema {
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

/// Registry for the HTTP roster implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "http";
	type Factory = RosterFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn RosterInterface>, RosterError> {
			HttpRosterSchema
				.validate(config)
				.map_err(|e| RosterError::Configuration(e.to_string()))?;

			let base_url = config
				.get("base_url")
				.and_then(|v| v.as_str())
				.ok_or_else(|| RosterError::Configuration("base_url is required".to_string()))?
				.to_string();
			let timeout_seconds = config
				.get("timeout_seconds")
				.and_then(|v| v.as_integer())
				.map(|v| v as u64)
				.unwrap_or(DEFAULT_TIMEOUT_SECONDS);

			Ok(Box::new(HttpRoster::new(base_url, timeout_seconds)?))
		}
	}
}

impl RosterRegistry for Registry {}
