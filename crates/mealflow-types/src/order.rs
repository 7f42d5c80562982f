//! Order domain types for the mealflow system.
//!
//! This module defines the persisted order record, its line items, the
//! status lifecycle, and the enriched read view returned by role-scoped
//! listings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A customer's purchase request against one restaurant, tracked through
/// a fixed status lifecycle.
///
/// An order is created by a customer-role caller and afterwards mutated
/// only through validated status transitions. The contact snapshot taken
/// at creation is what notification dispatch addresses later, so a
/// customer changing their profile does not retroactively change where
/// updates for an in-flight order go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Unique identifier for this order, assigned at creation.
	pub id: String,
	/// Identity of the placing customer.
	pub customer_id: String,
	/// Identity of the target restaurant.
	pub restaurant_id: String,
	/// Line items as supplied by the customer.
	pub items: Vec<OrderItem>,
	/// Sum of price * quantity over all items, computed once at creation.
	pub total: Decimal,
	/// Current lifecycle status.
	pub status: OrderStatus,
	/// Courier assigned when the order moves to in-transit.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub delivery_person_id: Option<String>,
	/// Customer email captured at creation, used for email notifications.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customer_email: Option<String>,
	/// Customer phone number captured at creation, used for SMS notifications.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customer_phone: Option<String>,
	/// Timestamp when this order was created.
	pub created_at: u64,
	/// Timestamp when this order was last updated.
	pub updated_at: u64,
}

/// A single line item on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
	/// Display name of the dish.
	pub name: String,
	/// Unit price as supplied by the caller.
	pub price: Decimal,
	/// Number of units ordered.
	pub quantity: u32,
}

/// Status of an order in the delivery lifecycle.
///
/// Orders move strictly forward: pending -> accepted -> in-transit ->
/// delivered. Delivered is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
	/// Order has been placed but not yet accepted by the restaurant.
	Pending,
	/// Restaurant has accepted the order and is preparing it.
	Accepted,
	/// A courier has claimed the order and is delivering it.
	InTransit,
	/// Order has been delivered. Terminal.
	Delivered,
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Pending => write!(f, "pending"),
			OrderStatus::Accepted => write!(f, "accepted"),
			OrderStatus::InTransit => write!(f, "in-transit"),
			OrderStatus::Delivered => write!(f, "delivered"),
		}
	}
}

/// Order read view for API listings.
///
/// Wraps the persisted order and, for delivery-role listings, the courier
/// display name resolved through the roster lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
	/// The underlying order record.
	#[serde(flatten)]
	pub order: Order,
	/// Display name of the assigned courier, when known.
	#[serde(
		rename = "deliveryPersonName",
		skip_serializing_if = "Option::is_none"
	)]
	pub delivery_person_name: Option<String>,
}
