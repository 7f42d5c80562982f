//! Caller identity types resolved by the identity guard.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an authenticated caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Places orders and receives notifications.
	Customer,
	/// Prepares orders for its own restaurant.
	Restaurant,
	/// Claims and fulfills in-transit orders.
	Delivery,
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Role::Customer => write!(f, "customer"),
			Role::Restaurant => write!(f, "restaurant"),
			Role::Delivery => write!(f, "delivery"),
		}
	}
}

/// An authenticated caller as resolved from a bearer credential.
///
/// Contact details are optional; when present they are snapshotted onto
/// orders the caller creates so notifications can be addressed later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
	/// Opaque user identifier.
	pub user_id: String,
	/// Role granted to this caller.
	pub role: Role,
	/// Email address for order notifications.
	#[serde(default)]
	pub email: Option<String>,
	/// Phone number for SMS notifications.
	#[serde(default)]
	pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_role_wire_format() {
		assert_eq!(serde_json::to_string(&Role::Delivery).unwrap(), "\"delivery\"");
		assert_eq!(
			serde_json::from_str::<Role>("\"restaurant\"").unwrap(),
			Role::Restaurant
		);
	}
}
