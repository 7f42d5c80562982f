//! Outbound customer notification types.
//!
//! Notifications are advisory: they are built after a status change has
//! been persisted and handed to a fire-and-forget dispatcher. Their
//! failure never affects order state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel through which a notification is delivered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
	Email,
	Sms,
}

impl fmt::Display for NotificationChannel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NotificationChannel::Email => write!(f, "email"),
			NotificationChannel::Sms => write!(f, "sms"),
		}
	}
}

/// A single outbound message addressed to an order's customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
	/// Delivery channel for this message.
	pub channel: NotificationChannel,
	/// Email address or phone number, depending on the channel.
	pub recipient: String,
	/// Subject line; only meaningful for email.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub subject: Option<String>,
	/// Message body.
	pub body: String,
}
