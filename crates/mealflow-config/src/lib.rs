//! Configuration module for the order system.
//!
//! This module provides structures and utilities for managing service
//! configuration. It supports loading configuration from TOML files with
//! environment variable resolution and validates that all required values
//! are properly set before the service starts.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the order service.
///
/// This structure contains all configuration sections required for the
/// service to operate: service identity, the HTTP API server, order
/// storage, authentication, the restaurant catalog, the courier roster,
/// and notification delivery.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to this service instance.
	pub service: ServiceConfig,
	/// Configuration for the HTTP API server.
	#[serde(default)]
	pub api: ApiConfig,
	/// Configuration for the order storage backend.
	pub storage: ComponentConfig,
	/// Configuration for token authentication.
	pub auth: ComponentConfig,
	/// Configuration for the restaurant catalog source.
	pub catalog: ComponentConfig,
	/// Configuration for the courier roster source.
	pub roster: ComponentConfig,
	/// Configuration for notification delivery.
	pub notifications: ComponentConfig,
}

/// Configuration specific to this service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// Unique identifier for this service instance.
	pub id: String,
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Request timeout in seconds.
	#[serde(default = "default_api_timeout")]
	pub timeout_seconds: u64,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			host: default_api_host(),
			port: default_api_port(),
			timeout_seconds: default_api_timeout(),
		}
	}
}

/// Configuration for a pluggable component.
///
/// Each component section names a primary implementation and carries a map
/// of implementation names to their raw TOML configurations. Only the
/// primary implementation is instantiated at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComponentConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Map of implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Returns the default API host address.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port.
fn default_api_port() -> u16 {
	3000
}

/// Returns the default API request timeout in seconds.
///
/// This provides a default timeout of 30 seconds for API requests
/// when no explicit timeout is configured.
fn default_api_timeout() -> u64 {
	30
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	// Limit input size to prevent ReDoS attacks
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).unwrap();
		let var_name = cap.get(1).unwrap().as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file with environment variable resolution.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		if !Path::new(path).exists() {
			return Err(ConfigError::Validation(format!(
				"Configuration file not found: {}",
				path
			)));
		}
		let contents = tokio::fs::read_to_string(path).await?;
		contents.parse()
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// This method checks every configuration section:
	/// - Ensures the service ID is not empty
	/// - Validates the API server binding
	/// - Checks each component names a primary implementation that exists
	///   in its implementations map
	fn validate(&self) -> Result<(), ConfigError> {
		if self.service.id.is_empty() {
			return Err(ConfigError::Validation("Service ID cannot be empty".into()));
		}

		if self.api.host.is_empty() {
			return Err(ConfigError::Validation("API host cannot be empty".into()));
		}
		if self.api.port == 0 {
			return Err(ConfigError::Validation("API port cannot be 0".into()));
		}
		if self.api.timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"API timeout_seconds must be greater than 0".into(),
			));
		}

		for (section, component) in [
			("storage", &self.storage),
			("auth", &self.auth),
			("catalog", &self.catalog),
			("roster", &self.roster),
			("notifications", &self.notifications),
		] {
			if component.primary.is_empty() {
				return Err(ConfigError::Validation(format!(
					"{} primary implementation cannot be empty",
					section
				)));
			}
			if component.implementations.is_empty() {
				return Err(ConfigError::Validation(format!(
					"At least one {} implementation must be configured",
					section
				)));
			}
			if !component.implementations.contains_key(&component.primary) {
				return Err(ConfigError::Validation(format!(
					"Primary {} '{}' not found in implementations",
					section, component.primary
				)));
			}
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// This allows configuration to be parsed from TOML strings using the standard
/// string parsing interface. Environment variables are resolved and the
/// configuration is automatically validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn base_config() -> String {
		r#"
[service]
id = "test-service"

[storage]
primary = "memory"
[storage.implementations.memory]

[auth]
primary = "local"
[auth.implementations.local]
[[auth.implementations.local.tokens]]
token = "tok-customer"
user_id = "u-1"
role = "customer"

[catalog]
primary = "memory"
[catalog.implementations.memory]

[roster]
primary = "memory"
[roster.implementations.memory]
[roster.implementations.memory.couriers]

[notifications]
primary = "memory"
[notifications.implementations.memory]
"#
		.to_string()
	}

	#[test]
	fn test_env_var_resolution() {
		// Set up test environment variables
		std::env::set_var("TEST_SMTP_HOST", "localhost");
		std::env::set_var("TEST_SMTP_PORT", "2525");

		let input = "host = \"${TEST_SMTP_HOST}:${TEST_SMTP_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"localhost:2525\"");

		// Clean up
		std::env::remove_var("TEST_SMTP_HOST");
		std::env::remove_var("TEST_SMTP_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("MISSING_VAR"));
	}

	#[test]
	fn test_parse_full_config() {
		std::env::set_var("TEST_SERVICE_ID", "orders-dev");

		let config_str = base_config().replace("test-service", "${TEST_SERVICE_ID}");
		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.service.id, "orders-dev");
		assert_eq!(config.api.host, "127.0.0.1");
		assert_eq!(config.api.port, 3000);
		assert_eq!(config.storage.primary, "memory");

		std::env::remove_var("TEST_SERVICE_ID");
	}

	#[test]
	fn test_primary_must_exist_in_implementations() {
		let config_str = base_config().replace(
			"[storage]\nprimary = \"memory\"",
			"[storage]\nprimary = \"file\"",
		);
		let result: Result<Config, _> = config_str.parse();
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("Primary storage 'file' not found"));
	}

	#[test]
	fn test_empty_service_id_rejected() {
		let config_str = base_config().replace("test-service", "");
		let result: Result<Config, _> = config_str.parse();
		assert!(result.is_err());
	}

	#[test]
	fn test_api_section_overrides() {
		let config_str = format!(
			"{}\n[api]\nhost = \"0.0.0.0\"\nport = 8080\n",
			base_config()
		);
		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.api.host, "0.0.0.0");
		assert_eq!(config.api.port, 8080);
		assert_eq!(config.api.timeout_seconds, 30);
	}

	#[tokio::test]
	async fn test_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		tokio::fs::write(&path, base_config()).await.unwrap();

		let config = Config::from_file(path.to_str().unwrap()).await.unwrap();
		assert_eq!(config.service.id, "test-service");
	}

	#[tokio::test]
	async fn test_from_file_missing() {
		let result = Config::from_file("/nonexistent/config.toml").await;
		assert!(result.is_err());
	}
}
