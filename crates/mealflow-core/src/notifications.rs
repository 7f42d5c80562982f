//! Notification composition for lifecycle events.
//!
//! Maps each order status to the channels the customer is notified on and
//! builds the concrete messages. A channel whose recipient is unknown for
//! the order is skipped; partial contact details reduce the batch rather
//! than failing it.

use mealflow_types::{
	truncate_id, Notification, NotificationChannel, Order, OrderStatus,
};

/// Channels notified when an order reaches the given status.
pub fn channels_for(status: OrderStatus) -> &'static [NotificationChannel] {
	match status {
		OrderStatus::Pending => &[],
		OrderStatus::Accepted => &[NotificationChannel::Email],
		OrderStatus::InTransit => &[NotificationChannel::Sms],
		OrderStatus::Delivered => &[NotificationChannel::Email, NotificationChannel::Sms],
	}
}

/// Message body for a status, shared between channels.
fn body_for(status: OrderStatus) -> &'static str {
	match status {
		OrderStatus::Pending => "Your order has been received.",
		OrderStatus::Accepted => "Your order has been accepted and is being prepared.",
		OrderStatus::InTransit => "Your delivery is on the way.",
		OrderStatus::Delivered => "Your order has been delivered. Enjoy your meal!",
	}
}

/// Builds the notification batch for an order that just reached its
/// current status.
///
/// Returns one message per configured channel for which the order carries
/// a recipient. Skipped channels are logged at debug level.
pub fn build_notifications(order: &Order) -> Vec<Notification> {
	let mut batch = Vec::new();

	for channel in channels_for(order.status) {
		let recipient = match channel {
			NotificationChannel::Email => order.customer_email.as_deref(),
			NotificationChannel::Sms => order.customer_phone.as_deref(),
		};

		let Some(recipient) = recipient else {
			tracing::debug!(
				"Order ({}) has no {} contact, skipping channel",
				truncate_id(&order.id),
				channel
			);
			continue;
		};

		let subject = match channel {
			NotificationChannel::Email => Some(format!(
				"Order {} is {}",
				truncate_id(&order.id),
				order.status
			)),
			NotificationChannel::Sms => None,
		};

		batch.push(Notification {
			channel: *channel,
			recipient: recipient.to_string(),
			subject,
			body: body_for(order.status).to_string(),
		});
	}

	batch
}
