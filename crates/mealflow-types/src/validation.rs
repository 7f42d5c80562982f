//! Configuration validation utilities for the order system.
//!
//! This module provides a type-safe framework for validating the TOML
//! configuration blocks handed to component implementations. It supports
//! nested schemas, custom validators, and detailed error reporting.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// Error that occurs when a required field is missing.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// Error that occurs when a field has an invalid value.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// Error that occurs when field type is incorrect.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// Represents the type of a configuration field.
///
/// This enum defines the possible types that a field in a TOML configuration
/// can have, including primitive types and complex structures.
#[derive(Debug)]
pub enum FieldType {
	/// A string value.
	String,
	/// An integer value with optional minimum and maximum bounds.
	Integer {
		/// Minimum allowed value (inclusive).
		min: Option<i64>,
		/// Maximum allowed value (inclusive).
		max: Option<i64>,
	},
	/// A floating point value with an optional minimum bound.
	Float {
		/// Minimum allowed value (inclusive).
		min: Option<f64>,
	},
	/// A boolean value (true/false).
	Boolean,
	/// An array of values, all of the same type.
	Array(Box<FieldType>),
	/// A nested table with its own schema.
	Table(Schema),
}

impl FieldType {
	/// Checks that a value matches this field type.
	///
	/// Performs type checking and recursively validates nested structures.
	/// For numbers it also checks the declared bounds. For arrays it checks
	/// each element, and for tables it delegates to the nested schema.
	fn check(&self, field_name: &str, value: &toml::Value) -> Result<(), ValidationError> {
		let mismatch = |expected: &str| ValidationError::TypeMismatch {
			field: field_name.to_string(),
			expected: expected.to_string(),
			actual: value.type_str().to_string(),
		};

		match self {
			FieldType::String => {
				if !value.is_str() {
					return Err(mismatch("string"));
				}
			},
			FieldType::Integer { min, max } => {
				let int_val = value.as_integer().ok_or_else(|| mismatch("integer"))?;

				if let Some(min_val) = min {
					if int_val < *min_val {
						return Err(ValidationError::InvalidValue {
							field: field_name.to_string(),
							message: format!("Value {} is less than minimum {}", int_val, min_val),
						});
					}
				}

				if let Some(max_val) = max {
					if int_val > *max_val {
						return Err(ValidationError::InvalidValue {
							field: field_name.to_string(),
							message: format!(
								"Value {} is greater than maximum {}",
								int_val, max_val
							),
						});
					}
				}
			},
			FieldType::Float { min } => {
				// TOML integers are accepted where a float is expected.
				let float_val = value
					.as_float()
					.or_else(|| value.as_integer().map(|i| i as f64))
					.ok_or_else(|| mismatch("float"))?;

				if let Some(min_val) = min {
					if float_val < *min_val {
						return Err(ValidationError::InvalidValue {
							field: field_name.to_string(),
							message: format!(
								"Value {} is less than minimum {}",
								float_val, min_val
							),
						});
					}
				}
			},
			FieldType::Boolean => {
				if !value.is_bool() {
					return Err(mismatch("boolean"));
				}
			},
			FieldType::Array(inner_type) => {
				let array = value.as_array().ok_or_else(|| mismatch("array"))?;

				for (i, item) in array.iter().enumerate() {
					inner_type.check(&format!("{}[{}]", field_name, i), item)?;
				}
			},
			FieldType::Table(schema) => {
				schema.validate(value).map_err(|e| match e {
					ValidationError::MissingField(f) => {
						ValidationError::MissingField(format!("{}.{}", field_name, f))
					},
					ValidationError::InvalidValue { field, message } => {
						ValidationError::InvalidValue {
							field: format!("{}.{}", field_name, field),
							message,
						}
					},
					ValidationError::TypeMismatch {
						field,
						expected,
						actual,
					} => ValidationError::TypeMismatch {
						field: format!("{}.{}", field_name, field),
						expected,
						actual,
					},
				})?;
			},
		}

		Ok(())
	}
}

/// Type alias for field validator functions.
///
/// Validators are custom functions that can perform additional validation
/// beyond type checking. They receive a TOML value and return an error
/// message if validation fails.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// Represents a field in a configuration schema.
///
/// A field has a name, a type, and an optional custom validator function.
/// Fields can be either required or optional within a schema.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	/// Creates a new field with the given name and type.
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Adds a custom validator to this field.
	///
	/// Custom validators allow for complex validation logic beyond simple
	/// type checking. The validator function receives the field's value and
	/// should return an error message if validation fails.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		self.field_type.check(&self.name, value)?;

		if let Some(validator) = &self.validator {
			validator(value).map_err(|msg| ValidationError::InvalidValue {
				field: self.name.clone(),
				message: msg,
			})?;
		}

		Ok(())
	}
}

/// Defines a validation schema for TOML configuration.
///
/// A schema consists of required fields that must be present and optional
/// fields that may be present. Each field has a type and optional custom
/// validation logic. Schemas can be nested to validate hierarchical
/// configurations.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	/// Creates a new schema with required and optional fields.
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML value against this schema.
	///
	/// Checks that all required fields are present, that every field has the
	/// declared type, runs custom validators, and recursively validates
	/// nested tables.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - A required field is missing
	/// - A field has the wrong type
	/// - A custom validator fails
	/// - A nested schema validation fails
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			field.check(value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(value)?;
			}
		}

		Ok(())
	}
}

/// Trait defining a configuration schema that can validate TOML values.
///
/// Implement this trait to expose a component's configuration requirements
/// so they can be checked before the component is instantiated.
pub trait ConfigSchema: Send + Sync {
	/// Validates a TOML configuration value against this schema.
	///
	/// This method should check:
	/// - Required fields are present
	/// - Field types are correct
	/// - Values meet any constraints (ranges, patterns, etc.)
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}
