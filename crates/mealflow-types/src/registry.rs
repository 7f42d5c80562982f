//! Implementation registry for pluggable components.
//!
//! Each backend crate exposes swappable implementations behind a trait.
//! Implementations register themselves through this trait so the service
//! binary can discover them by name at startup and instantiate whichever
//! one the configuration selects.

/// Trait for registering component implementations.
///
/// Each implementation provides a unique name and a factory function for
/// creating instances from configuration.
pub trait ImplementationRegistry {
	/// The unique name of this implementation.
	const NAME: &'static str;

	/// The factory function type for this component kind.
	type Factory;

	/// Get the factory function for creating instances.
	fn factory() -> Self::Factory;
}
