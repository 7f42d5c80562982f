//! Common types module for the mealflow order system.
//!
//! This module defines the core data types and structures shared by all
//! mealflow components. It provides a centralized location for the order
//! domain model, caller identity, notifications, and the configuration
//! validation framework used by pluggable implementations.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Restaurant and menu types consumed at order-creation time.
pub mod catalog;
/// Caller identity and role types.
pub mod identity;
/// Outbound customer notification types.
pub mod notification;
/// Order domain types including items, status, and read views.
pub mod order;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Utility functions shared across components.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use catalog::*;
pub use identity::*;
pub use notification::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use utils::{current_timestamp, truncate_id};
pub use validation::*;
