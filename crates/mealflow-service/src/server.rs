//! HTTP server for the mealflow order API.
//!
//! This module provides the HTTP surface of the order system: order
//! creation, role-scoped listing, status transitions, catalog browsing,
//! and a health probe. All `/api` routes resolve the caller through the
//! bearer credential in the Authorization header.

use crate::apis;
use axum::{
	extract::{Path, State},
	http::{HeaderMap, StatusCode},
	response::Json,
	routing::{get, patch, post},
	Router,
};
use mealflow_auth::AuthService;
use mealflow_catalog::CatalogService;
use mealflow_config::ApiConfig;
use mealflow_core::OrderLifecycle;
use mealflow_types::{
	APIError, CreateOrderRequest, MenuItem, Order, OrderView, Restaurant, StatusUpdateRequest,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Lifecycle engine processing order operations.
	pub lifecycle: Arc<OrderLifecycle>,
	/// Resolver for bearer credentials.
	pub auth: Arc<AuthService>,
	/// Restaurant and menu directory.
	pub catalog: Arc<CatalogService>,
}

/// Starts the HTTP server for the API.
///
/// This function creates and configures the HTTP server with routing,
/// middleware, and error handling for all endpoints.
pub async fn start_server(
	api_config: ApiConfig,
	state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(state);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Mealflow API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Builds the application router with all API routes.
fn router(state: AppState) -> Router {
	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/orders", post(handle_create_order).get(handle_list_orders))
				.route("/orders/{id}/status", patch(handle_update_status))
				.route("/restaurants", get(handle_list_restaurants))
				.route("/restaurants/{id}/menu", get(handle_get_menu)),
		)
		.route("/health", get(handle_health))
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(state)
}

/// Handles POST /api/orders requests.
///
/// This endpoint creates a new order for the authenticated customer and
/// returns the stored record.
async fn handle_create_order(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), APIError> {
	let caller = apis::authenticate(&state, &headers).await?;
	let order = apis::orders::create_order(&state, &caller, request).await?;
	Ok((StatusCode::CREATED, Json(order)))
}

/// Handles GET /api/orders requests.
///
/// This endpoint returns the orders visible to the caller's role.
async fn handle_list_orders(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<Vec<OrderView>>, APIError> {
	let caller = apis::authenticate(&state, &headers).await?;
	let views = apis::orders::list_orders(&state, &caller).await?;
	Ok(Json(views))
}

/// Handles PATCH /api/orders/{id}/status requests.
///
/// This endpoint moves an order through its lifecycle on behalf of
/// restaurant and delivery callers.
async fn handle_update_status(
	State(state): State<AppState>,
	Path(id): Path<String>,
	headers: HeaderMap,
	Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Order>, APIError> {
	let caller = apis::authenticate(&state, &headers).await?;
	let order = apis::orders::update_status(&state, &caller, &id, request).await?;
	Ok(Json(order))
}

/// Handles GET /api/restaurants requests.
async fn handle_list_restaurants(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<Vec<Restaurant>>, APIError> {
	apis::authenticate(&state, &headers).await?;
	let restaurants = apis::catalog::list_restaurants(&state).await?;
	Ok(Json(restaurants))
}

/// Handles GET /api/restaurants/{id}/menu requests.
async fn handle_get_menu(
	State(state): State<AppState>,
	Path(id): Path<String>,
	headers: HeaderMap,
) -> Result<Json<Vec<MenuItem>>, APIError> {
	apis::authenticate(&state, &headers).await?;
	let menu = apis::catalog::get_menu(&state, &id).await?;
	Ok(Json(menu))
}

/// Handles GET /health requests.
async fn handle_health() -> Json<serde_json::Value> {
	Json(serde_json::json!({ "status": "ok" }))
}
