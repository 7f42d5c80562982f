//! Restaurant catalog module for the order system.
//!
//! This module provides read access to the restaurants available for
//! ordering and their menus. The catalog can be served from a remote
//! service over HTTP or seeded statically from configuration.

use async_trait::async_trait;
use mealflow_types::{ConfigSchema, ImplementationRegistry, MenuItem, Restaurant};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
	pub mod memory;
}

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when a restaurant is not found.
	#[error("Restaurant not found: {0}")]
	NotFound(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for catalog implementations.
#[async_trait]
pub trait CatalogInterface: Send + Sync {
	/// Returns the configuration schema for this catalog implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Lists all restaurants available for ordering.
	async fn list_restaurants(&self) -> Result<Vec<Restaurant>, CatalogError>;

	/// Returns the menu of a restaurant.
	async fn get_menu(&self, restaurant_id: &str) -> Result<Vec<MenuItem>, CatalogError>;
}

/// Type alias for catalog factory functions.
pub type CatalogFactory = fn(&toml::Value) -> Result<Box<dyn CatalogInterface>, CatalogError>;

/// Registry trait for catalog implementations.
pub trait CatalogRegistry: ImplementationRegistry<Factory = CatalogFactory> {}

/// Get all registered catalog implementations.
///
/// Returns a vector of (name, factory) tuples for all available catalog
/// implementations.
pub fn get_all_implementations() -> Vec<(&'static str, CatalogFactory)> {
	use implementations::{http, memory};

	vec![
		(http::Registry::NAME, http::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// Service that provides catalog lookups.
///
/// This struct provides a high-level interface for catalog access,
/// wrapping an underlying catalog implementation.
pub struct CatalogService {
	/// The underlying catalog implementation.
	implementation: Box<dyn CatalogInterface>,
}

impl CatalogService {
	/// Creates a new CatalogService with the specified implementation.
	pub fn new(implementation: Box<dyn CatalogInterface>) -> Self {
		Self { implementation }
	}

	/// Lists all restaurants available for ordering.
	pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>, CatalogError> {
		self.implementation.list_restaurants().await
	}

	/// Returns the menu of a restaurant.
	pub async fn get_menu(&self, restaurant_id: &str) -> Result<Vec<MenuItem>, CatalogError> {
		self.implementation.get_menu(restaurant_id).await
	}
}
