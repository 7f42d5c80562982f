//! Core order lifecycle engine.
//!
//! This crate owns the business rules of the order system: who may move
//! an order between statuses, how concurrent moves are arbitrated, and
//! which notifications each move produces. It is deliberately free of any
//! HTTP concerns; the service crate wires it to the outside world.

pub mod engine;
pub mod notifications;
pub mod transitions;

pub use engine::{LifecycleError, OrderLifecycle};
