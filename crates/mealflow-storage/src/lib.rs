//! Storage module for the order system.
//!
//! This module provides abstractions for persistent storage of orders,
//! supporting different backend implementations such as in-memory or
//! file-based storage. The interface is built around a conditional status
//! update so that concurrent lifecycle transitions on the same order
//! resolve to exactly one winner.

use async_trait::async_trait;
use mealflow_types::{ConfigSchema, ImplementationRegistry, Order, OrderStatus};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
	/// Error that occurs when a requested order is not found.
	#[error("Not found")]
	NotFound,
	/// Error that occurs when a conditional update observes a status other
	/// than the one the caller expected.
	#[error("Conflict: order is currently {current}")]
	Conflict { current: OrderStatus },
	/// Error that occurs when inserting an order whose id is already taken.
	#[error("Already exists")]
	AlreadyExists,
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Predicate used to filter orders in listing queries.
pub type OrderPredicate = dyn Fn(&Order) -> bool + Send + Sync;

/// Trait defining the low-level interface for order storage backends.
///
/// This trait must be implemented by any storage backend that wants to
/// hold orders for the service. Beyond plain lookups it requires a
/// compare-and-set status update, which is the primitive the lifecycle
/// engine relies on to arbitrate races.
#[async_trait]
pub trait OrderStoreInterface: Send + Sync {
	/// Persists a new order and returns its identifier.
	///
	/// Fails with [`StoreError::AlreadyExists`] if an order with the same
	/// id is already stored.
	async fn insert(&self, order: Order) -> Result<String, StoreError>;

	/// Retrieves an order by identifier.
	async fn find_by_id(&self, id: &str) -> Result<Order, StoreError>;

	/// Returns all orders matching the predicate, oldest first.
	async fn find_matching(&self, predicate: &OrderPredicate) -> Result<Vec<Order>, StoreError>;

	/// Atomically moves an order from `expected` to `next`.
	///
	/// The write applies only if the stored status still equals `expected`
	/// at the moment of the update; otherwise the call fails with
	/// [`StoreError::Conflict`] carrying the status actually observed.
	/// When `courier_id` is provided and the order has no courier assigned
	/// yet, the assignment happens as part of the same atomic step.
	/// Returns the updated order.
	async fn update_status(
		&self,
		id: &str,
		expected: OrderStatus,
		next: OrderStatus,
		courier_id: Option<&str>,
	) -> Result<Order, StoreError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for order store factory functions.
///
/// This is the function signature that all storage implementations must
/// provide to create instances of their store interface.
pub type OrderStoreFactory = fn(&toml::Value) -> Result<Box<dyn OrderStoreInterface>, StoreError>;

/// Registry trait for order store implementations.
///
/// This trait extends the base ImplementationRegistry to specify that
/// storage implementations must provide an OrderStoreFactory.
pub trait OrderStoreRegistry: ImplementationRegistry<Factory = OrderStoreFactory> {}

/// Get all registered order store implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage
/// implementations. This is used by the factory registry to automatically
/// register all implementations.
pub fn get_all_implementations() -> Vec<(&'static str, OrderStoreFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// High-level order store that wraps a backend implementation.
///
/// The OrderStore hides the concrete backend behind the interface trait
/// and is the type the rest of the system works against.
pub struct OrderStore {
	/// The underlying storage backend implementation.
	backend: Box<dyn OrderStoreInterface>,
}

impl OrderStore {
	/// Creates a new OrderStore with the specified backend.
	pub fn new(backend: Box<dyn OrderStoreInterface>) -> Self {
		Self { backend }
	}

	/// Persists a new order and returns its identifier.
	pub async fn insert(&self, order: Order) -> Result<String, StoreError> {
		self.backend.insert(order).await
	}

	/// Retrieves an order by identifier.
	pub async fn find_by_id(&self, id: &str) -> Result<Order, StoreError> {
		self.backend.find_by_id(id).await
	}

	/// Returns all orders matching the predicate, oldest first.
	pub async fn find_matching(
		&self,
		predicate: &OrderPredicate,
	) -> Result<Vec<Order>, StoreError> {
		self.backend.find_matching(predicate).await
	}

	/// Atomically moves an order from `expected` to `next`, optionally
	/// assigning a courier in the same step.
	pub async fn update_status(
		&self,
		id: &str,
		expected: OrderStatus,
		next: OrderStatus,
		courier_id: Option<&str>,
	) -> Result<Order, StoreError> {
		self.backend
			.update_status(id, expected, next, courier_id)
			.await
	}
}
