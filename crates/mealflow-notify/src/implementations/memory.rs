//! In-memory notification provider.
//!
//! This module records messages instead of sending them, which is what
//! tests and local development need. It can also be configured to fail
//! every send to exercise the error paths of callers.

use crate::{NotifierFactory, NotifierInterface, NotifierRegistry, NotifyError};
use async_trait::async_trait;
use mealflow_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, NotificationChannel, Schema,
	ValidationError,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A message recorded by the in-memory provider.
#[derive(Debug, Clone)]
pub struct SentMessage {
	/// Channel the message was sent over.
	pub channel: NotificationChannel,
	/// Recipient address or phone number.
	pub to: String,
	/// Subject line, present for email only.
	pub subject: Option<String>,
	/// Message body.
	pub body: String,
}

/// Notification provider that records messages in memory.
pub struct MemoryNotifier {
	/// All messages accepted so far, in send order.
	sent: Arc<Mutex<Vec<SentMessage>>>,
	/// When set, every send fails with a network error.
	fail_sends: bool,
}

impl MemoryNotifier {
	/// Creates a new MemoryNotifier.
	pub fn new(fail_sends: bool) -> Self {
		Self {
			sent: Arc::new(Mutex::new(Vec::new())),
			fail_sends,
		}
	}

	/// Returns a handle to the recorded messages.
	pub fn sent_messages(&self) -> Arc<Mutex<Vec<SentMessage>>> {
		self.sent.clone()
	}
}

impl Default for MemoryNotifier {
	fn default() -> Self {
		Self::new(false)
	}
}

#[async_trait]
impl NotifierInterface for MemoryNotifier {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryNotifierSchema)
	}

	async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
		if self.fail_sends {
			return Err(NotifyError::Network("simulated send failure".to_string()));
		}
		self.sent.lock().await.push(SentMessage {
			channel: NotificationChannel::Email,
			to: to.to_string(),
			subject: Some(subject.to_string()),
			body: body.to_string(),
		});
		Ok(())
	}

	async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError> {
		if self.fail_sends {
			return Err(NotifyError::Network("simulated send failure".to_string()));
		}
		self.sent.lock().await.push(SentMessage {
			channel: NotificationChannel::Sms,
			to: to.to_string(),
			subject: None,
			body: body.to_string(),
		});
		Ok(())
	}
}

/// Configuration schema for MemoryNotifier.
pub struct MemoryNotifierSchema;

impl ConfigSchema for MemoryNotifierSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(vec![], vec![Field::new("fail_sends", FieldType::Boolean)]);
		schema.validate(config)
	}
}

/// Registry for the in-memory notifier implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = NotifierFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn NotifierInterface>, NotifyError> {
			let fail_sends = config
				.get("fail_sends")
				.and_then(|v| v.as_bool())
				.unwrap_or(false);
			Ok(Box::new(MemoryNotifier::new(fail_sends)))
		}
	}
}

impl NotifierRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_records_messages() {
		let notifier = MemoryNotifier::new(false);

		notifier
			.send_email("cust@example.com", "Order update", "Accepted")
			.await
			.unwrap();
		notifier
			.send_sms("+15550001111", "On the way")
			.await
			.unwrap();

		let sent = notifier.sent_messages();
		let messages = sent.lock().await;
		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0].channel, NotificationChannel::Email);
		assert_eq!(messages[0].subject.as_deref(), Some("Order update"));
		assert_eq!(messages[1].channel, NotificationChannel::Sms);
		assert!(messages[1].subject.is_none());
	}

	#[tokio::test]
	async fn test_fail_sends() {
		let notifier = MemoryNotifier::new(true);

		let result = notifier.send_email("cust@example.com", "s", "b").await;
		assert!(matches!(result, Err(NotifyError::Network(_))));
		assert!(notifier.sent_messages().lock().await.is_empty());
	}

	#[test]
	fn test_factory_reads_fail_sends() {
		let config = toml::from_str::<toml::Value>("fail_sends = true").unwrap();
		assert!(Registry::factory()(&config).is_ok());

		let empty = toml::from_str::<toml::Value>("").unwrap();
		assert!(Registry::factory()(&empty).is_ok());
	}
}
