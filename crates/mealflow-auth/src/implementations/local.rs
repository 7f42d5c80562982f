//! Local token table authentication.
//!
//! This module resolves tokens against a static table defined in the
//! configuration file. It is meant for development and single-tenant
//! deployments where an external identity provider is not available.

use crate::{AuthError, AuthFactory, AuthInterface, AuthRegistry};
use async_trait::async_trait;
use mealflow_types::{
	ConfigSchema, Field, FieldType, Identity, ImplementationRegistry, Role, Schema,
	ValidationError,
};
use serde::Deserialize;
use std::collections::HashMap;

/// A single token entry in the local auth configuration.
#[derive(Debug, Clone, Deserialize)]
struct TokenEntry {
	/// The bearer token value.
	token: String,
	/// User the token was issued for.
	user_id: String,
	/// Role granted to the token.
	role: Role,
	/// Contact email used for order notifications.
	#[serde(default)]
	email: Option<String>,
	/// Contact phone number used for order notifications.
	#[serde(default)]
	phone: Option<String>,
}

/// Configuration for the local auth implementation.
#[derive(Debug, Clone, Deserialize)]
struct LocalAuthConfig {
	tokens: Vec<TokenEntry>,
}

/// Authentication implementation backed by a configured token table.
pub struct LocalAuth {
	/// Token value to identity mapping.
	tokens: HashMap<String, Identity>,
}

impl LocalAuth {
	/// Builds the token table from parsed configuration entries.
	fn from_config(config: LocalAuthConfig) -> Result<Self, AuthError> {
		let mut tokens = HashMap::with_capacity(config.tokens.len());
		for entry in config.tokens {
			let identity = Identity {
				user_id: entry.user_id,
				role: entry.role,
				email: entry.email,
				phone: entry.phone,
			};
			if tokens.insert(entry.token.clone(), identity).is_some() {
				return Err(AuthError::Configuration(format!(
					"Duplicate token entry: {}",
					entry.token
				)));
			}
		}
		Ok(Self { tokens })
	}
}

#[async_trait]
impl AuthInterface for LocalAuth {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LocalAuthSchema)
	}

	async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
		self.tokens.get(token).cloned().ok_or(AuthError::InvalidToken)
	}
}

/// Configuration schema for LocalAuth.
pub struct LocalAuthSchema;

impl ConfigSchema for LocalAuthSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let entry_schema = Schema::new(
			vec![
				Field::new("token", FieldType::String),
				Field::new("user_id", FieldType::String),
				Field::new("role", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some("customer") | Some("restaurant") | Some("delivery") => Ok(()),
						_ => Err("must be one of: customer, restaurant, delivery".to_string()),
					}
				}),
			],
			vec![
				Field::new("email", FieldType::String),
				Field::new("phone", FieldType::String),
			],
		);

		let schema = Schema::new(
			vec![Field::new(
				"tokens",
				FieldType::Array(Box::new(FieldType::Table(entry_schema))),
			)],
			vec![],
		);

		schema.validate(config)
	}
}

/// Registry for the local auth implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "local";
	type Factory = AuthFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn AuthInterface>, AuthError> {
			LocalAuthSchema
				.validate(config)
				.map_err(|e| AuthError::Configuration(e.to_string()))?;

			let parsed: LocalAuthConfig = config
				.clone()
				.try_into()
				.map_err(|e| AuthError::Configuration(format!("Invalid local config: {}", e)))?;

			Ok(Box::new(LocalAuth::from_config(parsed)?))
		}
	}
}

impl AuthRegistry for Registry {}
