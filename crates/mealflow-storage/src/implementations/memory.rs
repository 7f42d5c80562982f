//! In-memory order store implementation.
//!
//! This module provides a memory-based implementation of the
//! OrderStoreInterface trait, useful for testing and development scenarios
//! where persistence is not required.

use crate::{
	OrderPredicate, OrderStoreFactory, OrderStoreInterface, OrderStoreRegistry, StoreError,
};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mealflow_types::{
	current_timestamp, ConfigSchema, ImplementationRegistry, Order, OrderStatus, Schema,
	ValidationError,
};

/// In-memory order store implementation.
///
/// Orders live in a concurrent map keyed by order id. Operations on
/// different orders proceed independently; operations on the same order
/// are serialized by the map's per-key locking, which is what makes the
/// conditional status update atomic.
pub struct MemoryStore {
	/// The in-memory order map.
	orders: DashMap<String, Order>,
}

impl MemoryStore {
	/// Creates a new MemoryStore instance.
	pub fn new() -> Self {
		Self {
			orders: DashMap::new(),
		}
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl OrderStoreInterface for MemoryStore {
	async fn insert(&self, order: Order) -> Result<String, StoreError> {
		let id = order.id.clone();
		match self.orders.entry(id.clone()) {
			Entry::Occupied(_) => Err(StoreError::AlreadyExists),
			Entry::Vacant(vacant) => {
				vacant.insert(order);
				Ok(id)
			},
		}
	}

	async fn find_by_id(&self, id: &str) -> Result<Order, StoreError> {
		self.orders
			.get(id)
			.map(|entry| entry.value().clone())
			.ok_or(StoreError::NotFound)
	}

	async fn find_matching(&self, predicate: &OrderPredicate) -> Result<Vec<Order>, StoreError> {
		let mut matches: Vec<Order> = self
			.orders
			.iter()
			.filter(|entry| predicate(entry.value()))
			.map(|entry| entry.value().clone())
			.collect();
		// Iteration order of the map is arbitrary, so impose a stable one.
		matches.sort_by(|a, b| {
			a.created_at
				.cmp(&b.created_at)
				.then_with(|| a.id.cmp(&b.id))
		});
		Ok(matches)
	}

	async fn update_status(
		&self,
		id: &str,
		expected: OrderStatus,
		next: OrderStatus,
		courier_id: Option<&str>,
	) -> Result<Order, StoreError> {
		// The mutable guard holds the shard lock for this key, so the
		// status check and the write happen as one atomic step.
		let mut entry = self.orders.get_mut(id).ok_or(StoreError::NotFound)?;
		let order = entry.value_mut();

		if order.status != expected {
			return Err(StoreError::Conflict {
				current: order.status,
			});
		}

		order.status = next;
		if let Some(courier) = courier_id {
			if order.delivery_person_id.is_none() {
				order.delivery_person_id = Some(courier.to_string());
			}
		}
		order.updated_at = current_timestamp();

		Ok(order.clone())
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryStoreSchema)
	}
}

/// Configuration schema for MemoryStore.
pub struct MemoryStoreSchema;

impl ConfigSchema for MemoryStoreSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// Memory storage has no required configuration
		let schema = Schema::new(vec![], vec![]);
		schema.validate(config)
	}
}

/// Registry for the in-memory order store implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = OrderStoreFactory;

	fn factory() -> Self::Factory {
		|_config: &toml::Value| -> Result<Box<dyn OrderStoreInterface>, StoreError> {
			Ok(Box::new(MemoryStore::new()))
		}
	}
}

impl OrderStoreRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use mealflow_types::OrderItem;
	use rust_decimal::Decimal;
	use std::sync::Arc;

	fn sample_order(id: &str, status: OrderStatus) -> Order {
		Order {
			id: id.to_string(),
			customer_id: "cust-1".to_string(),
			restaurant_id: "rest-1".to_string(),
			items: vec![OrderItem {
				name: "Pizza".to_string(),
				price: Decimal::from(10),
				quantity: 2,
			}],
			total: Decimal::from(20),
			status,
			delivery_person_id: None,
			customer_email: Some("cust@example.com".to_string()),
			customer_phone: None,
			created_at: current_timestamp(),
			updated_at: current_timestamp(),
		}
	}

	#[tokio::test]
	async fn test_insert_and_find() {
		let store = MemoryStore::new();

		let id = store
			.insert(sample_order("o-1", OrderStatus::Pending))
			.await
			.unwrap();
		assert_eq!(id, "o-1");

		let found = store.find_by_id("o-1").await.unwrap();
		assert_eq!(found.customer_id, "cust-1");
		assert_eq!(found.status, OrderStatus::Pending);

		let missing = store.find_by_id("o-2").await;
		assert!(matches!(missing, Err(StoreError::NotFound)));
	}

	#[tokio::test]
	async fn test_insert_duplicate_rejected() {
		let store = MemoryStore::new();

		store
			.insert(sample_order("o-1", OrderStatus::Pending))
			.await
			.unwrap();
		let result = store.insert(sample_order("o-1", OrderStatus::Pending)).await;
		assert!(matches!(result, Err(StoreError::AlreadyExists)));
	}

	#[tokio::test]
	async fn test_conditional_update() {
		let store = MemoryStore::new();
		store
			.insert(sample_order("o-1", OrderStatus::Pending))
			.await
			.unwrap();

		let updated = store
			.update_status("o-1", OrderStatus::Pending, OrderStatus::Accepted, None)
			.await
			.unwrap();
		assert_eq!(updated.status, OrderStatus::Accepted);

		// A second update expecting the old status must observe the conflict.
		let stale = store
			.update_status("o-1", OrderStatus::Pending, OrderStatus::Accepted, None)
			.await;
		match stale {
			Err(StoreError::Conflict { current }) => assert_eq!(current, OrderStatus::Accepted),
			other => panic!("expected conflict, got {:?}", other.map(|o| o.status)),
		}
	}

	#[tokio::test]
	async fn test_courier_assigned_once() {
		let store = MemoryStore::new();
		store
			.insert(sample_order("o-1", OrderStatus::Accepted))
			.await
			.unwrap();

		let updated = store
			.update_status(
				"o-1",
				OrderStatus::Accepted,
				OrderStatus::InTransit,
				Some("courier-1"),
			)
			.await
			.unwrap();
		assert_eq!(updated.delivery_person_id.as_deref(), Some("courier-1"));
	}

	#[tokio::test]
	async fn test_concurrent_claims_single_winner() {
		let store = Arc::new(MemoryStore::new());
		store
			.insert(sample_order("o-1", OrderStatus::Accepted))
			.await
			.unwrap();

		let s1 = store.clone();
		let s2 = store.clone();
		let t1 = tokio::spawn(async move {
			s1.update_status(
				"o-1",
				OrderStatus::Accepted,
				OrderStatus::InTransit,
				Some("courier-1"),
			)
			.await
		});
		let t2 = tokio::spawn(async move {
			s2.update_status(
				"o-1",
				OrderStatus::Accepted,
				OrderStatus::InTransit,
				Some("courier-2"),
			)
			.await
		});

		let r1 = t1.await.unwrap();
		let r2 = t2.await.unwrap();

		// Exactly one claim succeeds and the loser sees the new status.
		assert_eq!(r1.is_ok() as u8 + r2.is_ok() as u8, 1);
		let loser = if r1.is_ok() { r2 } else { r1 };
		assert!(
			matches!(loser, Err(StoreError::Conflict { current }) if current == OrderStatus::InTransit)
		);

		let stored = store.find_by_id("o-1").await.unwrap();
		assert_eq!(stored.status, OrderStatus::InTransit);
		assert!(stored.delivery_person_id.is_some());
	}

	#[tokio::test]
	async fn test_find_matching_sorted_by_creation() {
		let store = MemoryStore::new();

		let mut first = sample_order("o-1", OrderStatus::Pending);
		first.created_at = 100;
		let mut second = sample_order("o-2", OrderStatus::Accepted);
		second.created_at = 200;
		store.insert(second).await.unwrap();
		store.insert(first).await.unwrap();

		let all = store.find_matching(&|_: &Order| true).await.unwrap();
		assert_eq!(all.len(), 2);
		assert_eq!(all[0].id, "o-1");
		assert_eq!(all[1].id, "o-2");

		let accepted = store
			.find_matching(&|o: &Order| o.status == OrderStatus::Accepted)
			.await
			.unwrap();
		assert_eq!(accepted.len(), 1);
		assert_eq!(accepted[0].id, "o-2");
	}
}
