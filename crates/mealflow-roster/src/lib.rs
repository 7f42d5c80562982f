//! Courier roster module for the order system.
//!
//! This module resolves courier identifiers to display names. The order
//! store only records courier ids; the roster supplies the names shown to
//! delivery staff when they browse orders. Resolution is best-effort: an
//! unknown courier simply has no display name.

use async_trait::async_trait;
use mealflow_types::{ConfigSchema, ImplementationRegistry};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
	pub mod memory;
}

/// Errors that can occur during roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for roster implementations.
#[async_trait]
pub trait RosterInterface: Send + Sync {
	/// Returns the configuration schema for this roster implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Resolves a courier id to a display name.
	///
	/// Returns `None` if the courier is not on the roster.
	async fn resolve_name(&self, courier_id: &str) -> Result<Option<String>, RosterError>;
}

/// Type alias for roster factory functions.
pub type RosterFactory = fn(&toml::Value) -> Result<Box<dyn RosterInterface>, RosterError>;

/// Registry trait for roster implementations.
pub trait RosterRegistry: ImplementationRegistry<Factory = RosterFactory> {}

/// Get all registered roster implementations.
///
/// Returns a vector of (name, factory) tuples for all available roster
/// implementations.
pub fn get_all_implementations() -> Vec<(&'static str, RosterFactory)> {
	use implementations::{http, memory};

	vec![
		(http::Registry::NAME, http::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// Service that resolves courier display names.
pub struct RosterService {
	/// The underlying roster implementation.
	implementation: Box<dyn RosterInterface>,
}

impl RosterService {
	/// Creates a new RosterService with the specified implementation.
	pub fn new(implementation: Box<dyn RosterInterface>) -> Self {
		Self { implementation }
	}

	/// Resolves a courier id to a display name.
	pub async fn resolve_name(&self, courier_id: &str) -> Result<Option<String>, RosterError> {
		self.implementation.resolve_name(courier_id).await
	}
}
