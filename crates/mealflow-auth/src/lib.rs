//! Authentication module for the order system.
//!
//! This module resolves bearer tokens to caller identities. It defines the
//! interface and service for authentication along with a registry of
//! available implementations. Token formats and issuance are the concern
//! of the configured implementation; the rest of the system only ever sees
//! an [`Identity`].

use async_trait::async_trait;
use mealflow_types::{ConfigSchema, Identity, ImplementationRegistry};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
	/// Error that occurs when a token is unknown or malformed.
	#[error("Invalid token")]
	InvalidToken,
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for authentication implementations.
///
/// This trait must be implemented by any authentication implementation
/// that wants to integrate with the order system.
#[async_trait]
pub trait AuthInterface: Send + Sync {
	/// Returns the configuration schema for this auth implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Resolves a bearer token to the identity it was issued for.
	async fn authenticate(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Type alias for auth factory functions.
pub type AuthFactory = fn(&toml::Value) -> Result<Box<dyn AuthInterface>, AuthError>;

/// Registry trait for auth implementations.
pub trait AuthRegistry: ImplementationRegistry<Factory = AuthFactory> {}

/// Get all registered auth implementations.
///
/// Returns a vector of (name, factory) tuples for all available auth
/// implementations.
pub fn get_all_implementations() -> Vec<(&'static str, AuthFactory)> {
	use implementations::local;

	vec![(local::Registry::NAME, local::Registry::factory())]
}

/// Service that manages authentication.
///
/// This struct provides a high-level interface for token resolution,
/// wrapping an underlying auth implementation.
pub struct AuthService {
	/// The underlying auth implementation.
	implementation: Box<dyn AuthInterface>,
}

impl AuthService {
	/// Creates a new AuthService with the specified implementation.
	pub fn new(implementation: Box<dyn AuthInterface>) -> Self {
		Self { implementation }
	}

	/// Resolves a bearer token to the identity it was issued for.
	///
	/// This method delegates to the underlying implementation.
	pub async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
		self.implementation.authenticate(token).await
	}
}
