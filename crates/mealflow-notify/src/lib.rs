//! Notification delivery module for the order system.
//!
//! This module handles sending customer-facing notifications over email
//! and SMS. Delivery is best-effort: the lifecycle engine hands a batch of
//! notifications to [`NotificationService::dispatch`], which sends them on
//! a background task so that a slow or failing provider never blocks or
//! fails an order operation.

use async_trait::async_trait;
use mealflow_types::{
	truncate_id, ConfigSchema, ImplementationRegistry, Notification, NotificationChannel,
};
use std::sync::Arc;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
	pub mod memory;
}

/// Errors that can occur during notification delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when the provider rejects a message.
	#[error("Rejected: {0}")]
	Rejected(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for notification providers.
///
/// This trait must be implemented by any notification provider that wants
/// to integrate with the order system. It provides one method per channel.
#[async_trait]
pub trait NotifierInterface: Send + Sync {
	/// Returns the configuration schema for this notifier implementation.
	///
	/// This allows each implementation to define its own configuration
	/// requirements with specific validation rules. The schema is used to
	/// validate TOML configuration before initializing the provider.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Sends an email message.
	async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;

	/// Sends an SMS message.
	async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError>;
}

/// Type alias for notifier factory functions.
pub type NotifierFactory = fn(&toml::Value) -> Result<Box<dyn NotifierInterface>, NotifyError>;

/// Registry trait for notifier implementations.
pub trait NotifierRegistry: ImplementationRegistry<Factory = NotifierFactory> {}

/// Get all registered notifier implementations.
///
/// Returns a vector of (name, factory) tuples for all available notifier
/// implementations.
pub fn get_all_implementations() -> Vec<(&'static str, NotifierFactory)> {
	use implementations::{http, memory};

	vec![
		(http::Registry::NAME, http::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// Service that delivers notifications through a provider implementation.
pub struct NotificationService {
	/// The underlying notification provider implementation.
	implementation: Box<dyn NotifierInterface>,
}

impl NotificationService {
	/// Creates a new NotificationService with the specified provider.
	pub fn new(implementation: Box<dyn NotifierInterface>) -> Self {
		Self { implementation }
	}

	/// Sends a single notification over its channel.
	pub async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
		match notification.channel {
			NotificationChannel::Email => {
				let subject = notification.subject.as_deref().unwrap_or("Order update");
				self.implementation
					.send_email(&notification.recipient, subject, &notification.body)
					.await
			},
			NotificationChannel::Sms => {
				self.implementation
					.send_sms(&notification.recipient, &notification.body)
					.await
			},
		}
	}

	/// Dispatches a batch of notifications on a background task.
	///
	/// Returns immediately. Failures are logged and never surface to the
	/// caller, so an outage at the provider cannot fail the order
	/// operation that produced the batch.
	pub fn dispatch(self: &Arc<Self>, order_id: String, notifications: Vec<Notification>) {
		if notifications.is_empty() {
			return;
		}

		let service = self.clone();
		tokio::spawn(async move {
			for notification in notifications {
				tracing::trace!(
					"Sending {} notification for order ({}) to {}",
					notification.channel,
					truncate_id(&order_id),
					notification.recipient
				);
				match service.send(&notification).await {
					Ok(()) => {
						tracing::debug!(
							"Sent {} notification for order ({})",
							notification.channel,
							truncate_id(&order_id)
						);
					},
					Err(e) => {
						tracing::warn!(
							"Failed to send {} notification for order ({}): {}",
							notification.channel,
							truncate_id(&order_id),
							e
						);
					},
				}
			}
		});
	}
}
