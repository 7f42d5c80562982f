//! API types for the HTTP order interface.
//!
//! This module defines the request and response types used by the REST
//! endpoints, together with the error envelope every endpoint returns on
//! failure.

use crate::order::{OrderItem, OrderStatus};
use serde::{Deserialize, Serialize};

/// Standard error response structure returned by all endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Machine-readable error code.
	pub error: String,
	/// Human-readable message describing the problem.
	pub message: String,
	/// Optional structured details about the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
	/// Optional retry hint in seconds for transient failures.
	#[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
	pub retry_after: Option<u64>,
}

/// API error types with associated HTTP status codes.
#[derive(Debug, Clone)]
pub enum APIError {
	/// 400 Bad Request with error details.
	BadRequest {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// 401 Unauthorized, missing or invalid credentials.
	Unauthorized { error_type: String, message: String },
	/// 403 Forbidden, authenticated but not allowed.
	Forbidden { error_type: String, message: String },
	/// 404 Not Found.
	NotFound { error_type: String, message: String },
	/// 409 Conflict, the request clashes with current resource state.
	Conflict {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// 503 Service Unavailable with optional retry hint.
	ServiceUnavailable {
		error_type: String,
		message: String,
		retry_after: Option<u64>,
	},
	/// 500 Internal Server Error.
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::Unauthorized { .. } => 401,
			APIError::Forbidden { .. } => 403,
			APIError::NotFound { .. } => 404,
			APIError::Conflict { .. } => 409,
			APIError::ServiceUnavailable { .. } => 503,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to an ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		match self {
			APIError::BadRequest {
				error_type,
				message,
				details,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: details.clone(),
				retry_after: None,
			},
			APIError::Unauthorized {
				error_type,
				message,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
				retry_after: None,
			},
			APIError::Forbidden {
				error_type,
				message,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
				retry_after: None,
			},
			APIError::NotFound {
				error_type,
				message,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
				retry_after: None,
			},
			APIError::Conflict {
				error_type,
				message,
				details,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: details.clone(),
				retry_after: None,
			},
			APIError::ServiceUnavailable {
				error_type,
				message,
				retry_after,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
				retry_after: *retry_after,
			},
			APIError::InternalServerError {
				error_type,
				message,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
				retry_after: None,
			},
		}
	}
}

impl std::fmt::Display for APIError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let response = self.to_error_response();
		write!(f, "{}: {}", response.error, response.message)
	}
}

impl std::error::Error for APIError {}

impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		let status = axum::http::StatusCode::from_u16(self.status_code())
			.unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
		let body = axum::Json(self.to_error_response());
		(status, body).into_response()
	}
}

/// Request body for order creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
	/// Restaurant the order is placed against.
	#[serde(rename = "restaurantId")]
	pub restaurant_id: String,
	/// Line items for the order.
	pub items: Vec<OrderItem>,
}

/// Request body for a status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
	/// The status the caller wants the order moved to.
	pub status: OrderStatus,
}
