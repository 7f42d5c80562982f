//! Order lifecycle transition rules.
//!
//! Orders move through a fixed sequence: pending -> accepted -> in-transit
//! -> delivered. Each rule is keyed by the target status and names the one
//! status the order must currently be in together with the roles allowed
//! to request the move. Pending is the creation state and never a
//! transition target, so it has no rule and `delivered` has no successor.

use mealflow_types::{OrderStatus, Role};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A single lifecycle transition rule.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
	/// Status the order must currently have for the move to apply.
	pub from: OrderStatus,
	/// Roles allowed to request this transition.
	pub roles: &'static [Role],
}

impl TransitionRule {
	/// Whether the given role may request this transition.
	pub fn allows(&self, role: Role) -> bool {
		self.roles.contains(&role)
	}
}

// Static transition table - each target status maps to its rule
static RULES: Lazy<HashMap<OrderStatus, TransitionRule>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		OrderStatus::Accepted,
		TransitionRule {
			from: OrderStatus::Pending,
			roles: &[Role::Restaurant, Role::Delivery],
		},
	);
	m.insert(
		OrderStatus::InTransit,
		TransitionRule {
			from: OrderStatus::Accepted,
			roles: &[Role::Delivery],
		},
	);
	m.insert(
		OrderStatus::Delivered,
		TransitionRule {
			from: OrderStatus::InTransit,
			roles: &[Role::Restaurant, Role::Delivery],
		},
	);
	m
});

/// Looks up the rule for moving an order to `target`.
///
/// Returns `None` when `target` is never a valid transition target,
/// which includes `pending`.
pub fn rule_for(target: OrderStatus) -> Option<&'static TransitionRule> {
	RULES.get(&target)
}
