//! Catalog endpoints for the mealflow API.
//!
//! Read-only passthrough to the configured catalog source so clients can
//! browse restaurants and menus while composing an order.

use crate::server::AppState;
use mealflow_catalog::CatalogError;
use mealflow_types::{APIError, MenuItem, Restaurant};

/// Lists the restaurants available for ordering.
pub async fn list_restaurants(state: &AppState) -> Result<Vec<Restaurant>, APIError> {
	state.catalog.list_restaurants().await.map_err(|e| {
		tracing::warn!("Restaurant listing failed: {}", e);
		map_catalog_error(e)
	})
}

/// Returns the menu of a restaurant.
pub async fn get_menu(state: &AppState, restaurant_id: &str) -> Result<Vec<MenuItem>, APIError> {
	state.catalog.get_menu(restaurant_id).await.map_err(|e| {
		tracing::warn!("Menu retrieval failed: {}", e);
		map_catalog_error(e)
	})
}

/// Maps catalog errors onto the API error envelope.
fn map_catalog_error(error: CatalogError) -> APIError {
	match error {
		CatalogError::NotFound(id) => APIError::NotFound {
			error_type: "RESTAURANT_NOT_FOUND".to_string(),
			message: format!("Restaurant not found: {}", id),
		},
		CatalogError::Network(message) => APIError::ServiceUnavailable {
			error_type: "SERVICE_UNAVAILABLE".to_string(),
			message,
			retry_after: Some(5),
		},
		CatalogError::Configuration(message) => APIError::InternalServerError {
			error_type: "INTERNAL_ERROR".to_string(),
			message,
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_catalog_errors_map_to_status_codes() {
		let err = map_catalog_error(CatalogError::NotFound("rest-9".to_string()));
		assert_eq!(err.status_code(), 404);

		let err = map_catalog_error(CatalogError::Network("connection refused".to_string()));
		assert_eq!(err.status_code(), 503);

		let err = map_catalog_error(CatalogError::Configuration("bad url".to_string()));
		assert_eq!(err.status_code(), 500);
	}
}
