//! Order endpoints for the mealflow API.
//!
//! This module implements order creation, role-scoped listing, and status
//! transitions on top of the lifecycle engine, translating engine errors
//! into the API error envelope.

use crate::server::AppState;
use mealflow_core::LifecycleError;
use mealflow_types::{
	APIError, CreateOrderRequest, Identity, Order, OrderView, StatusUpdateRequest,
};

/// Creates a new order for the calling customer.
pub async fn create_order(
	state: &AppState,
	caller: &Identity,
	request: CreateOrderRequest,
) -> Result<Order, APIError> {
	state
		.lifecycle
		.create_order(caller, request)
		.await
		.map_err(|e| {
			tracing::warn!("Order creation failed: {}", e);
			map_lifecycle_error(e)
		})
}

/// Lists the orders visible to the caller.
pub async fn list_orders(state: &AppState, caller: &Identity) -> Result<Vec<OrderView>, APIError> {
	state.lifecycle.list_for_role(caller).await.map_err(|e| {
		tracing::warn!("Order listing failed: {}", e);
		map_lifecycle_error(e)
	})
}

/// Moves an order to the requested status.
pub async fn update_status(
	state: &AppState,
	caller: &Identity,
	order_id: &str,
	request: StatusUpdateRequest,
) -> Result<Order, APIError> {
	state
		.lifecycle
		.transition_status(caller, order_id, request.status)
		.await
		.map_err(|e| {
			tracing::warn!("Status update failed: {}", e);
			map_lifecycle_error(e)
		})
}

/// Maps lifecycle errors onto the API error envelope.
fn map_lifecycle_error(error: LifecycleError) -> APIError {
	match error {
		LifecycleError::Validation(message) => APIError::BadRequest {
			error_type: "VALIDATION_ERROR".to_string(),
			message,
			details: None,
		},
		LifecycleError::NotFound(id) => APIError::NotFound {
			error_type: "ORDER_NOT_FOUND".to_string(),
			message: format!("Order not found: {}", id),
		},
		LifecycleError::InvalidTransition { from, to } => APIError::Conflict {
			error_type: "INVALID_TRANSITION".to_string(),
			message: format!("Cannot move order from {} to {}", from, to),
			details: Some(serde_json::json!({ "from": from, "to": to })),
		},
		LifecycleError::Unauthorized(message) => APIError::Forbidden {
			error_type: "FORBIDDEN".to_string(),
			message,
		},
		LifecycleError::Store(message) => APIError::ServiceUnavailable {
			error_type: "SERVICE_UNAVAILABLE".to_string(),
			message,
			retry_after: Some(5),
		},
	}
}
