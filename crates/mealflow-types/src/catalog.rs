//! Restaurant catalog types.
//!
//! The catalog is a read-only data source consumed when customers build
//! an order. Item prices on the order itself are taken as supplied by the
//! caller and are not re-checked against the catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A restaurant available for ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
	/// Opaque restaurant identifier.
	pub id: String,
	/// Display name.
	pub name: String,
}

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
	/// Opaque menu item identifier.
	pub id: String,
	/// Display name of the dish.
	pub name: String,
	/// Short description shown to customers.
	#[serde(default)]
	pub description: String,
	/// Current listed price.
	pub price: Decimal,
}
