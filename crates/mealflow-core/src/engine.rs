//! Order lifecycle engine.
//!
//! Coordinates order creation, status transitions, and role-scoped
//! listings against the injected store, notifier, and roster services.
//! Which transitions are legal and who may perform them comes from the
//! static transition table; concurrent transitions on the same order are
//! arbitrated by the store's conditional update, so the engine itself
//! holds no locks.

use crate::notifications::build_notifications;
use crate::transitions::rule_for;
use mealflow_notify::NotificationService;
use mealflow_roster::RosterService;
use mealflow_storage::{OrderPredicate, OrderStore, StoreError};
use mealflow_types::{
	current_timestamp, truncate_id, CreateOrderRequest, Identity, Order, OrderStatus, OrderView,
	Role,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

/// Errors that can occur while operating on the order lifecycle.
///
/// These cover rejected input, unknown orders, transition attempts the
/// table or the caller's role does not permit, and storage failures.
#[derive(Debug, Error)]
pub enum LifecycleError {
	#[error("Validation error: {0}")]
	Validation(String),
	#[error("Order not found: {0}")]
	NotFound(String),
	#[error("Cannot move order from {from} to {to}")]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
	#[error("Unauthorized: {0}")]
	Unauthorized(String),
	#[error("Store error: {0}")]
	Store(String),
}

/// Engine that owns the order lifecycle.
///
/// All state lives behind the injected services, so the engine is cheap
/// to share and every public method takes the authenticated caller
/// explicitly.
pub struct OrderLifecycle {
	store: Arc<OrderStore>,
	notifier: Arc<NotificationService>,
	roster: Arc<RosterService>,
}

impl OrderLifecycle {
	pub fn new(
		store: Arc<OrderStore>,
		notifier: Arc<NotificationService>,
		roster: Arc<RosterService>,
	) -> Self {
		Self {
			store,
			notifier,
			roster,
		}
	}

	/// Creates a new order for a customer caller.
	///
	/// The order starts out pending, with the total computed from the
	/// submitted items and the caller's contact details snapshotted for
	/// later notifications.
	#[instrument(skip_all, fields(customer_id = %truncate_id(&caller.user_id)))]
	pub async fn create_order(
		&self,
		caller: &Identity,
		request: CreateOrderRequest,
	) -> Result<Order, LifecycleError> {
		if caller.role != Role::Customer {
			return Err(LifecycleError::Unauthorized(
				"only customers can place orders".to_string(),
			));
		}

		validate_request(&request)?;

		let total = request.items.iter().fold(Decimal::ZERO, |acc, item| {
			acc + item.price * Decimal::from(item.quantity)
		});

		let now = current_timestamp();
		let order = Order {
			id: Uuid::new_v4().to_string(),
			customer_id: caller.user_id.clone(),
			restaurant_id: request.restaurant_id,
			items: request.items,
			total,
			status: OrderStatus::Pending,
			delivery_person_id: None,
			customer_email: caller.email.clone(),
			customer_phone: caller.phone.clone(),
			created_at: now,
			updated_at: now,
		};

		self.store
			.insert(order.clone())
			.await
			.map_err(|e| LifecycleError::Store(e.to_string()))?;

		tracing::info!(
			"Created order ({}) for restaurant ({})",
			truncate_id(&order.id),
			truncate_id(&order.restaurant_id)
		);

		Ok(order)
	}

	/// Moves an order to `target` on behalf of the caller.
	///
	/// The transition table decides which current status the order must
	/// hold and which roles may request the move. The write itself is a
	/// conditional update: when two callers race for the same step,
	/// exactly one wins and the loser observes an invalid transition from
	/// the status the winner just set. A delivery caller moving an order
	/// to in-transit claims it and is recorded as its courier.
	#[instrument(skip_all, fields(order_id = %truncate_id(order_id)))]
	pub async fn transition_status(
		&self,
		caller: &Identity,
		order_id: &str,
		target: OrderStatus,
	) -> Result<Order, LifecycleError> {
		let Some(rule) = rule_for(target) else {
			// No rule means the target is never reachable (pending).
			// Report against the order's current status when it exists.
			let order = self.find_order(order_id).await?;
			return Err(LifecycleError::InvalidTransition {
				from: order.status,
				to: target,
			});
		};

		if !rule.allows(caller.role) {
			return Err(LifecycleError::Unauthorized(format!(
				"role {} cannot move orders to {}",
				caller.role, target
			)));
		}

		let courier_id = if target == OrderStatus::InTransit {
			Some(caller.user_id.as_str())
		} else {
			None
		};

		let updated = self
			.store
			.update_status(order_id, rule.from, target, courier_id)
			.await
			.map_err(|e| match e {
				StoreError::NotFound => LifecycleError::NotFound(order_id.to_string()),
				StoreError::Conflict { current } => LifecycleError::InvalidTransition {
					from: current,
					to: target,
				},
				other => LifecycleError::Store(other.to_string()),
			})?;

		tracing::info!("Order moved from {} to {}", rule.from, target);

		self.notifier
			.dispatch(updated.id.clone(), build_notifications(&updated));

		Ok(updated)
	}

	/// Lists the orders visible to the caller.
	///
	/// Customers see their own orders, restaurants the orders placed
	/// against them, and delivery staff the unclaimed accepted pool plus
	/// the in-transit orders they carry. Delivery listings also resolve
	/// courier display names through the roster; a roster outage degrades
	/// to listings without names.
	pub async fn list_for_role(&self, caller: &Identity) -> Result<Vec<OrderView>, LifecycleError> {
		let user_id = caller.user_id.clone();
		let predicate: Box<OrderPredicate> = match caller.role {
			Role::Customer => Box::new(move |o: &Order| o.customer_id == user_id),
			Role::Restaurant => Box::new(move |o: &Order| o.restaurant_id == user_id),
			Role::Delivery => Box::new(move |o: &Order| {
				o.status == OrderStatus::Accepted
					|| (o.status == OrderStatus::InTransit
						&& o.delivery_person_id.as_deref() == Some(user_id.as_str()))
			}),
		};

		let orders = self
			.store
			.find_matching(predicate.as_ref())
			.await
			.map_err(|e| LifecycleError::Store(e.to_string()))?;

		if caller.role != Role::Delivery {
			return Ok(orders
				.into_iter()
				.map(|order| OrderView {
					order,
					delivery_person_name: None,
				})
				.collect());
		}

		// Resolve each distinct courier once per listing.
		let mut names: HashMap<String, Option<String>> = HashMap::new();
		for order in &orders {
			if let Some(courier_id) = &order.delivery_person_id {
				if !names.contains_key(courier_id) {
					let name = match self.roster.resolve_name(courier_id).await {
						Ok(name) => name,
						Err(e) => {
							tracing::warn!(
								"Failed to resolve courier ({}): {}",
								truncate_id(courier_id),
								e
							);
							None
						},
					};
					names.insert(courier_id.clone(), name);
				}
			}
		}

		Ok(orders
			.into_iter()
			.map(|order| {
				let delivery_person_name = order
					.delivery_person_id
					.as_ref()
					.and_then(|id| names.get(id).cloned().flatten());
				OrderView {
					order,
					delivery_person_name,
				}
			})
			.collect())
	}

	async fn find_order(&self, order_id: &str) -> Result<Order, LifecycleError> {
		self.store.find_by_id(order_id).await.map_err(|e| match e {
			StoreError::NotFound => LifecycleError::NotFound(order_id.to_string()),
			other => LifecycleError::Store(other.to_string()),
		})
	}
}

fn validate_request(request: &CreateOrderRequest) -> Result<(), LifecycleError> {
	if request.restaurant_id.trim().is_empty() {
		return Err(LifecycleError::Validation(
			"restaurantId must not be empty".to_string(),
		));
	}
	if request.items.is_empty() {
		return Err(LifecycleError::Validation(
			"items must not be empty".to_string(),
		));
	}
	for item in &request.items {
		if item.name.trim().is_empty() {
			return Err(LifecycleError::Validation(
				"every item needs a non-empty name".to_string(),
			));
		}
		if item.quantity == 0 {
			return Err(LifecycleError::Validation(format!(
				"item '{}' must have a quantity of at least 1",
				item.name
			)));
		}
		if item.price < Decimal::ZERO {
			return Err(LifecycleError::Validation(format!(
				"item '{}' must not have a negative price",
				item.name
			)));
		}
	}
	Ok(())
}
