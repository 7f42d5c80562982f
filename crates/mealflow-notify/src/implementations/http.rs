//! HTTP notification provider.
//!
//! This module sends notifications through an external gateway exposing
//! one endpoint per channel. Email messages are POSTed to the configured
//! `email_url` and SMS messages to `sms_url`, both as JSON.

use crate::{NotifierFactory, NotifierInterface, NotifierRegistry, NotifyError};
use async_trait::async_trait;
use mealflow_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError,
};
use serde_json::json;
use std::time::Duration;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Notification provider that relays messages to an HTTP gateway.
pub struct HttpNotifier {
	/// Shared HTTP client with the configured timeout.
	client: reqwest::Client,
	/// Endpoint for email delivery.
	email_url: String,
	/// Endpoint for SMS delivery.
	sms_url: String,
}

impl HttpNotifier {
	/// Creates a new HttpNotifier with the given endpoints.
	pub fn new(
		email_url: String,
		sms_url: String,
		timeout_seconds: u64,
	) -> Result<Self, NotifyError> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(timeout_seconds))
			.build()
			.map_err(|e| NotifyError::Configuration(e.to_string()))?;

		Ok(Self {
			client,
			email_url,
			sms_url,
		})
	}

	/// Posts a JSON payload and maps the response to a delivery result.
	async fn post(&self, url: &str, payload: serde_json::Value) -> Result<(), NotifyError> {
		let response = self
			.client
			.post(url)
			.json(&payload)
			.send()
			.await
			.map_err(|e| NotifyError::Network(e.to_string()))?;

		if !response.status().is_success() {
			let status = response.status();
			let body = response
				.text()
				.await
				.unwrap_or_else(|_| "<unreadable body>".to_string());
			return Err(NotifyError::Rejected(format!("{}: {}", status, body)));
		}

		Ok(())
	}
}

#[async_trait]
impl NotifierInterface for HttpNotifier {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(HttpNotifierSchema)
	}

	async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
		let payload = json!({
			"to": to,
			"subject": subject,
			"message": body,
		});
		self.post(&self.email_url, payload).await
	}

	async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError> {
		let payload = json!({
			"to": to,
			"message": body,
		});
		self.post(&self.sms_url, payload).await
	}
}

/// Configuration schema for HttpNotifier.
pub struct HttpNotifierSchema;

impl ConfigSchema for HttpNotifierSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let url_validator = |value: &toml::Value| match value.as_str() {
			Some(s) if s.starts_with("http://") || s.starts_with("https://") => Ok(()),
			_ => Err("must start with http:// or https://".to_string()),
		};

		let schema = Schema::new(
			vec![
				Field::new("email_url", FieldType::String).with_validator(url_validator),
				Field::new("sms_url", FieldType::String).with_validator(url_validator),
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

/// Registry for the HTTP notifier implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "http";
	type Factory = NotifierFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn NotifierInterface>, NotifyError> {
			HttpNotifierSchema
				.validate(config)
				.map_err(|e| NotifyError::Configuration(e.to_string()))?;

			let email_url = config
				.get("email_url")
				.and_then(|v| v.as_str())
				.ok_or_else(|| NotifyError::Configuration("email_url is required".to_string()))?
				.to_string();
			let sms_url = config
				.get("sms_url")
				.and_then(|v| v.as_str())
				.ok_or_else(|| NotifyError::Configuration("sms_url is required".to_string()))?
				.to_string();
			let timeout_seconds = config
				.get("timeout_seconds")
				.and_then(|v| v.as_integer())
				.map(|v| v as u64)
				.unwrap_or(DEFAULT_TIMEOUT_SECONDS);

			Ok(Box::new(HttpNotifier::new(
				email_url,
				sms_url,
				timeout_seconds,
			)?))
		}
	}
}

impl NotifierRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_schema_requires_both_endpoints() {
		let schema = HttpNotifierSchema;

		let missing_sms =
			toml::from_str::<toml::Value>(r#"email_url = "https://gateway:8080/email""#).unwrap();
		assert!(schema.validate(&missing_sms).is_err());

		let valid = toml::from_str::<toml::Value>(
			r#"
			email_url = "https://gateway:8080/email"
			sms_url = "https://gateway:8080/sms"
			timeout_seconds = 5
			"#,
		)
		.unwrap();
		assert!(schema.validate(&valid).is_ok());
	}

	#[test]
	fn test_schema_rejects_non_http_url() {
		let schema = HttpNotifierSchema;
		let config = toml::from_str::<toml::Value>(
			r#"
			email_url = "smtp://gateway:25"
			sms_url = "https://gateway:8080/sms"
			"#,
		)
		.unwrap();
		assert!(schema.validate(&config).is_err());
	}

	#[test]
	fn test_factory_builds_from_valid_config() {
		let config = toml::from_str::<toml::Value>(
			r#"
			email_url = "http://localhost:9200/email"
			sms_url = "http://localhost:9200/sms"
			"#,
		)
		.unwrap();
		assert!(Registry::factory()(&config).is_ok());
	}
}
