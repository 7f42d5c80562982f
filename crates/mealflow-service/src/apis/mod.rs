//! API endpoint implementations.
//!
//! Each submodule owns the processing behind a group of routes; the
//! server module wires them to the router. The identity resolution shared
//! by every authenticated route lives here.

pub mod catalog;
pub mod orders;

use crate::server::AppState;
use axum::http::{header, HeaderMap};
use mealflow_types::{APIError, Identity};

/// Resolves the caller identity from the Authorization header.
///
/// Requires a `Bearer <token>` credential known to the auth service.
/// Every failure mode maps to the same 401 so callers cannot probe which
/// tokens exist.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Identity, APIError> {
	let header = headers
		.get(header::AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.ok_or_else(|| unauthorized("Missing Authorization header"))?;

	let token = header
		.strip_prefix("Bearer ")
		.ok_or_else(|| unauthorized("Authorization header must use the Bearer scheme"))?;

	state.auth.authenticate(token).await.map_err(|e| {
		tracing::debug!("Rejected credential: {}", e);
		unauthorized("Invalid or unknown token")
	})
}

fn unauthorized(message: &str) -> APIError {
	APIError::Unauthorized {
		error_type: "UNAUTHORIZED".to_string(),
		message: message.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::http::HeaderValue;
	use mealflow_auth::AuthService;
	use mealflow_catalog::CatalogService;
	use mealflow_core::OrderLifecycle;
	use mealflow_notify::{implementations::memory::MemoryNotifier, NotificationService};
	use mealflow_roster::{implementations::memory::MemoryRoster, RosterService};
	use mealflow_storage::{implementations::memory::MemoryStore, OrderStore};
	use mealflow_types::ImplementationRegistry;
	use std::collections::HashMap;
	use std::sync::Arc;

	fn test_state() -> AppState {
		let auth_config: toml::Value = toml::from_str(
			r#"
			[[tokens]]
			token = "tok-alice"
			user_id = "cust-1"
			role = "customer"
			"#,
		)
		.unwrap();
		let auth_factory = mealflow_auth::implementations::local::Registry::factory();
		let auth = auth_factory(&auth_config).unwrap();

		let catalog_factory = mealflow_catalog::implementations::memory::Registry::factory();
		let catalog = catalog_factory(&toml::Value::Table(toml::map::Map::new())).unwrap();

		let lifecycle = OrderLifecycle::new(
			Arc::new(OrderStore::new(Box::new(MemoryStore::new()))),
			Arc::new(NotificationService::new(Box::new(MemoryNotifier::new(
				false,
			)))),
			Arc::new(RosterService::new(Box::new(MemoryRoster::new(
				HashMap::new(),
			)))),
		);

		AppState {
			lifecycle: Arc::new(lifecycle),
			auth: Arc::new(AuthService::new(auth)),
			catalog: Arc::new(CatalogService::new(catalog)),
		}
	}

	#[tokio::test]
	async fn test_authenticate_resolves_bearer_token() {
		let state = test_state();
		let mut headers = HeaderMap::new();
		headers.insert(
			header::AUTHORIZATION,
			HeaderValue::from_static("Bearer tok-alice"),
		);

		let identity = authenticate(&state, &headers).await.unwrap();
		assert_eq!(identity.user_id, "cust-1");
	}

	#[tokio::test]
	async fn test_authenticate_rejects_missing_header() {
		let state = test_state();
		let headers = HeaderMap::new();

		let err = authenticate(&state, &headers).await.unwrap_err();
		assert_eq!(err.status_code(), 401);
	}

	#[tokio::test]
	async fn test_authenticate_rejects_wrong_scheme() {
		let state = test_state();
		let mut headers = HeaderMap::new();
		headers.insert(
			header::AUTHORIZATION,
			HeaderValue::from_static("Basic tok-alice"),
		);

		let err = authenticate(&state, &headers).await.unwrap_err();
		assert_eq!(err.status_code(), 401);
	}

	#[tokio::test]
	async fn test_authenticate_rejects_unknown_token() {
		let state = test_state();
		let mut headers = HeaderMap::new();
		headers.insert(
			header::AUTHORIZATION,
			HeaderValue::from_static("Bearer tok-mallory"),
		);

		let err = authenticate(&state, &headers).await.unwrap_err();
		assert_eq!(err.status_code(), 401);
	}
}
