//! Utility functions shared across the workspace.
//!
//! This module provides small helpers for string formatting and timestamp
//! retrieval used throughout the order system.

pub mod formatting;
pub mod helpers;

pub use formatting::truncate_id;
pub use helpers::current_timestamp;
