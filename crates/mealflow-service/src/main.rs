//! Main entry point for the mealflow order service.
//!
//! This binary wires together the pluggable components of the order
//! system: storage, authentication, the restaurant catalog, the courier
//! roster, and notification delivery. Implementations are selected
//! through configuration and the HTTP API is served until interrupted.

use clap::Parser;
use mealflow_auth::AuthService;
use mealflow_catalog::CatalogService;
use mealflow_config::{ComponentConfig, Config};
use mealflow_core::OrderLifecycle;
use mealflow_notify::NotificationService;
use mealflow_roster::RosterService;
use mealflow_storage::OrderStore;
use mealflow_types::ImplementationRegistry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

// Import implementations from individual crates
use mealflow_auth::implementations::local::Registry as LocalAuthRegistry;
use mealflow_catalog::implementations::http::Registry as HttpCatalogRegistry;
use mealflow_catalog::implementations::memory::Registry as MemoryCatalogRegistry;
use mealflow_notify::implementations::http::Registry as HttpNotifierRegistry;
use mealflow_notify::implementations::memory::Registry as MemoryNotifierRegistry;
use mealflow_roster::implementations::http::Registry as HttpRosterRegistry;
use mealflow_roster::implementations::memory::Registry as MemoryRosterRegistry;
use mealflow_storage::implementations::file::Registry as FileStoreRegistry;
use mealflow_storage::implementations::memory::Registry as MemoryStoreRegistry;

/// Command-line arguments for the order service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the order service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the lifecycle engine with all implementations
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	// Create env filter with default from args
	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started mealflow");

	// Load configuration
	let config = Config::from_file(args.config.to_str().unwrap()).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	// Build the shared state with implementations
	let state = build_state(&config)?;
	let api_config = config.api.clone();

	// Serve the API until it stops or the process is interrupted
	tokio::select! {
		result = server::start_server(api_config, state) => {
			tracing::info!("API server finished");
			result?;
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Stopped mealflow");
	Ok(())
}

/// Macro to create a factory HashMap with the appropriate type aliases
macro_rules! create_factory_map {
    ($interface:path, $error:path, $( $name:literal => $factory:expr ),* $(,)?) => {{
        let mut factories = std::collections::HashMap::new();
        $(
            factories.insert(
                $name.to_string(),
                $factory as fn(&toml::Value) -> Result<Box<dyn $interface>, $error>
            );
        )*
        factories
    }};
}

/// Builds the shared application state from configuration.
///
/// This function wires up the concrete implementations for:
/// - Storage backends (in-memory, file-based)
/// - Authentication (local token table)
/// - Restaurant catalog sources (HTTP, config-seeded)
/// - Courier roster sources (HTTP, config-seeded)
/// - Notification providers (HTTP, in-memory)
fn build_state(config: &Config) -> Result<server::AppState, Box<dyn std::error::Error>> {
	// Storage factories
	let storage_factories = create_factory_map!(
		mealflow_storage::OrderStoreInterface,
		mealflow_storage::StoreError,
		"file" => FileStoreRegistry::factory(),
		"memory" => MemoryStoreRegistry::factory(),
	);

	// Auth factories
	let auth_factories = create_factory_map!(
		mealflow_auth::AuthInterface,
		mealflow_auth::AuthError,
		"local" => LocalAuthRegistry::factory(),
	);

	// Catalog factories
	let catalog_factories = create_factory_map!(
		mealflow_catalog::CatalogInterface,
		mealflow_catalog::CatalogError,
		"http" => HttpCatalogRegistry::factory(),
		"memory" => MemoryCatalogRegistry::factory(),
	);

	// Roster factories
	let roster_factories = create_factory_map!(
		mealflow_roster::RosterInterface,
		mealflow_roster::RosterError,
		"http" => HttpRosterRegistry::factory(),
		"memory" => MemoryRosterRegistry::factory(),
	);

	// Notifier factories
	let notifier_factories = create_factory_map!(
		mealflow_notify::NotifierInterface,
		mealflow_notify::NotifyError,
		"http" => HttpNotifierRegistry::factory(),
		"memory" => MemoryNotifierRegistry::factory(),
	);

	let store = OrderStore::new(build_from_map("storage", &config.storage, &storage_factories)?);
	let auth = AuthService::new(build_from_map("auth", &config.auth, &auth_factories)?);
	let catalog = CatalogService::new(build_from_map(
		"catalog",
		&config.catalog,
		&catalog_factories,
	)?);
	let roster = RosterService::new(build_from_map("roster", &config.roster, &roster_factories)?);
	let notifier = NotificationService::new(build_from_map(
		"notifications",
		&config.notifications,
		&notifier_factories,
	)?);

	let lifecycle = OrderLifecycle::new(Arc::new(store), Arc::new(notifier), Arc::new(roster));

	Ok(server::AppState {
		lifecycle: Arc::new(lifecycle),
		auth: Arc::new(auth),
		catalog: Arc::new(catalog),
	})
}

/// Selects and instantiates the primary implementation of a component.
fn build_from_map<I, E>(
	kind: &str,
	component: &ComponentConfig,
	factories: &HashMap<String, fn(&toml::Value) -> Result<Box<I>, E>>,
) -> Result<Box<I>, Box<dyn std::error::Error>>
where
	I: ?Sized,
	E: std::error::Error + 'static,
{
	let factory = factories
		.get(&component.primary)
		.ok_or_else(|| format!("Unknown {} implementation: {}", kind, component.primary))?;

	let implementation_config = component
		.implementations
		.get(&component.primary)
		.cloned()
		.unwrap_or_else(|| toml::Value::Table(toml::map::Map::new()));

	let implementation = factory(&implementation_config)?;
	tracing::info!("Initialized {} implementation [{}]", kind, component.primary);
	Ok(implementation)
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	const TEST_CONFIG: &str = r#"
[service]
id = "test-mealflow"

[api]
host = "127.0.0.1"
port = 3000

[storage]
primary = "memory"
[storage.implementations.memory]

[auth]
primary = "local"
[[auth.implementations.local.tokens]]
token = "tok-alice"
user_id = "cust-1"
role = "customer"
email = "alice@example.com"

[catalog]
primary = "memory"
[catalog.implementations.memory]
[[catalog.implementations.memory.restaurants]]
id = "rest-1"
name = "Pizza Palace"

[roster]
primary = "memory"
[roster.implementations.memory.couriers]
d-dana = "Dana R."

[notifications]
primary = "memory"
[notifications.implementations.memory]
"#;

	#[test]
	fn test_args_default_values() {
		let args = Args {
			config: PathBuf::from("config.toml"),
			log_level: "info".to_string(),
		};

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_create_factory_map_macro() {
		let factories = create_factory_map!(
			mealflow_storage::OrderStoreInterface,
			mealflow_storage::StoreError,
			"memory" => MemoryStoreRegistry::factory(),
		);

		assert_eq!(factories.len(), 1);
		assert!(factories.contains_key("memory"));
	}

	#[test]
	fn test_factory_maps_cover_registered_implementations() {
		let storage_factories = create_factory_map!(
			mealflow_storage::OrderStoreInterface,
			mealflow_storage::StoreError,
			"file" => FileStoreRegistry::factory(),
			"memory" => MemoryStoreRegistry::factory(),
		);
		for (name, _) in mealflow_storage::get_all_implementations() {
			assert!(storage_factories.contains_key(name), "storage missing {}", name);
		}

		let auth_factories = create_factory_map!(
			mealflow_auth::AuthInterface,
			mealflow_auth::AuthError,
			"local" => LocalAuthRegistry::factory(),
		);
		for (name, _) in mealflow_auth::get_all_implementations() {
			assert!(auth_factories.contains_key(name), "auth missing {}", name);
		}

		let catalog_factories = create_factory_map!(
			mealflow_catalog::CatalogInterface,
			mealflow_catalog::CatalogError,
			"http" => HttpCatalogRegistry::factory(),
			"memory" => MemoryCatalogRegistry::factory(),
		);
		for (name, _) in mealflow_catalog::get_all_implementations() {
			assert!(catalog_factories.contains_key(name), "catalog missing {}", name);
		}

		let roster_factories = create_factory_map!(
			mealflow_roster::RosterInterface,
			mealflow_roster::RosterError,
			"http" => HttpRosterRegistry::factory(),
			"memory" => MemoryRosterRegistry::factory(),
		);
		for (name, _) in mealflow_roster::get_all_implementations() {
			assert!(roster_factories.contains_key(name), "roster missing {}", name);
		}

		let notifier_factories = create_factory_map!(
			mealflow_notify::NotifierInterface,
			mealflow_notify::NotifyError,
			"http" => HttpNotifierRegistry::factory(),
			"memory" => MemoryNotifierRegistry::factory(),
		);
		for (name, _) in mealflow_notify::get_all_implementations() {
			assert!(notifier_factories.contains_key(name), "notifier missing {}", name);
		}
	}

	#[tokio::test]
	async fn test_build_state_from_config() {
		let config: Config = TEST_CONFIG.parse().expect("config should parse");

		let state = build_state(&config).expect("state should build");

		let caller = state.auth.authenticate("tok-alice").await.unwrap();
		assert_eq!(caller.user_id, "cust-1");
		assert_eq!(caller.email.as_deref(), Some("alice@example.com"));

		let restaurants = state.catalog.list_restaurants().await.unwrap();
		assert_eq!(restaurants.len(), 1);
		assert_eq!(restaurants[0].name, "Pizza Palace");
	}

	#[tokio::test]
	async fn test_state_serves_order_flow() {
		let config: Config = TEST_CONFIG.parse().expect("config should parse");
		let state = build_state(&config).expect("state should build");

		let caller = state.auth.authenticate("tok-alice").await.unwrap();
		let request: mealflow_types::CreateOrderRequest = serde_json::from_value(serde_json::json!({
			"restaurantId": "rest-1",
			"items": [{ "name": "Margherita", "price": "12.5", "quantity": 2 }]
		}))
		.unwrap();

		let order = state.lifecycle.create_order(&caller, request).await.unwrap();
		assert_eq!(order.customer_id, "cust-1");
		assert_eq!(order.total.to_string(), "25.0");
	}

	#[test]
	fn test_build_state_rejects_unknown_primary() {
		let mut config: Config = TEST_CONFIG.parse().expect("config should parse");
		config.storage.primary = "redis".to_string();
		config
			.storage
			.implementations
			.insert("redis".to_string(), toml::Value::Table(toml::map::Map::new()));

		let result = build_state(&config);
		assert!(result.is_err());
	}

	#[tokio::test]
	async fn test_load_config_file() {
		let temp_dir = tempdir().expect("Failed to create temp dir");
		let config_path = temp_dir.path().join("config.toml");
		std::fs::write(&config_path, TEST_CONFIG).expect("Failed to write config");

		let config = Config::from_file(config_path.to_str().unwrap())
			.await
			.expect("Failed to load config");

		assert_eq!(config.service.id, "test-mealflow");
		assert_eq!(config.api.port, 3000);
		assert_eq!(config.storage.primary, "memory");
	}
}
