//! File-based order store implementation.
//!
//! This module provides a persistent implementation of the
//! OrderStoreInterface trait. Each order is kept as a JSON document in its
//! own file under the configured directory, written atomically via a
//! temporary file and rename. A directory-level lock file prevents two
//! service instances from sharing the same storage directory.

use crate::{
	OrderPredicate, OrderStoreFactory, OrderStoreInterface, OrderStoreRegistry, StoreError,
};
use async_trait::async_trait;
use fs2::FileExt;
use mealflow_types::{
	current_timestamp, ConfigSchema, Field, FieldType, ImplementationRegistry, Order, OrderStatus,
	Schema, ValidationError,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// File-based order store implementation.
///
/// Mutations are serialized through an in-process mutex so that the
/// conditional status update reads and rewrites an order as one step.
/// The lock file held for the lifetime of the store keeps a second
/// process from mutating the same directory concurrently.
pub struct FileStore {
	/// Base directory where order files are stored.
	base_path: PathBuf,
	/// Serializes all mutations to the directory.
	write_lock: Mutex<()>,
	/// Exclusive lock on the storage directory, released on drop.
	_dir_lock: std::fs::File,
}

impl FileStore {
	/// Creates a new FileStore rooted at the given directory.
	///
	/// The directory is created if it does not exist. Fails if another
	/// process already holds the directory lock.
	pub fn new(base_path: PathBuf) -> Result<Self, StoreError> {
		std::fs::create_dir_all(&base_path).map_err(|e| StoreError::Backend(e.to_string()))?;

		let lock_path = base_path.join(".lock");
		let dir_lock = std::fs::OpenOptions::new()
			.create(true)
			.write(true)
			.truncate(false)
			.open(&lock_path)
			.map_err(|e| StoreError::Backend(e.to_string()))?;
		dir_lock.try_lock_exclusive().map_err(|_| {
			StoreError::Backend(format!(
				"Storage directory {} is locked by another process",
				base_path.display()
			))
		})?;

		Ok(Self {
			base_path,
			write_lock: Mutex::new(()),
			_dir_lock: dir_lock,
		})
	}

	/// Constructs the file path for a given order id.
	fn order_path(&self, id: &str) -> PathBuf {
		// Sanitize id to be filesystem-safe
		let safe_id = id.replace(['/', ':'], "_");
		self.base_path.join(format!("{}.json", safe_id))
	}

	/// Writes an order atomically by writing to a temp file then renaming.
	async fn write_order(&self, order: &Order) -> Result<(), StoreError> {
		let path = self.order_path(&order.id);
		let bytes =
			serde_json::to_vec(order).map_err(|e| StoreError::Serialization(e.to_string()))?;

		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, bytes)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?;
		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?;

		Ok(())
	}

	/// Reads and deserializes the order stored at the given path.
	async fn read_order(&self, path: &Path) -> Result<Order, StoreError> {
		let data = match fs::read(path).await {
			Ok(data) => data,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(StoreError::NotFound)
			},
			Err(e) => return Err(StoreError::Backend(e.to_string())),
		};
		serde_json::from_slice(&data).map_err(|e| StoreError::Serialization(e.to_string()))
	}
}

#[async_trait]
impl OrderStoreInterface for FileStore {
	async fn insert(&self, order: Order) -> Result<String, StoreError> {
		let _guard = self.write_lock.lock().await;

		let path = self.order_path(&order.id);
		if path.exists() {
			return Err(StoreError::AlreadyExists);
		}

		let id = order.id.clone();
		self.write_order(&order).await?;
		Ok(id)
	}

	async fn find_by_id(&self, id: &str) -> Result<Order, StoreError> {
		let path = self.order_path(id);
		self.read_order(&path).await
	}

	async fn find_matching(&self, predicate: &OrderPredicate) -> Result<Vec<Order>, StoreError> {
		let mut matches = Vec::new();
		let mut entries = fs::read_dir(&self.base_path)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?;

		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?
		{
			let path = entry.path();
			if path.extension() != Some(std::ffi::OsStr::new("json")) {
				continue;
			}
			match self.read_order(&path).await {
				Ok(order) => {
					if predicate(&order) {
						matches.push(order);
					}
				},
				Err(e) => {
					tracing::debug!("Skipping file {:?}: {}", path, e);
				},
			}
		}

		matches.sort_by(|a, b| {
			a.created_at
				.cmp(&b.created_at)
				.then_with(|| a.id.cmp(&b.id))
		});
		Ok(matches)
	}

	async fn update_status(
		&self,
		id: &str,
		expected: OrderStatus,
		next: OrderStatus,
		courier_id: Option<&str>,
	) -> Result<Order, StoreError> {
		// All mutations go through this lock, so the status check and the
		// rewrite below form one atomic step.
		let _guard = self.write_lock.lock().await;

		let path = self.order_path(id);
		let mut order = self.read_order(&path).await?;

		if order.status != expected {
			return Err(StoreError::Conflict {
				current: order.status,
			});
		}

		order.status = next;
		if let Some(courier) = courier_id {
			if order.delivery_person_id.is_none() {
				order.delivery_person_id = Some(courier.to_string());
			}
		}
		order.updated_at = current_timestamp();

		self.write_order(&order).await?;
		Ok(order)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStoreSchema)
	}
}

/// Configuration schema for FileStore.
pub struct FileStoreSchema;

impl ConfigSchema for FileStoreSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(vec![Field::new("storage_path", FieldType::String)], vec![]);
		schema.validate(config)
	}
}

/// Registry for the file-based order store implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = OrderStoreFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn OrderStoreInterface>, StoreError> {
			let storage_path = config
				.get("storage_path")
				.and_then(|v| v.as_str())
				.ok_or_else(|| {
					StoreError::Configuration("storage_path is required".to_string())
				})?;

			Ok(Box::new(FileStore::new(PathBuf::from(storage_path))?))
		}
	}
}

impl OrderStoreRegistry for Registry {}
