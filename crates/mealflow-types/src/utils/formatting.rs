//! String formatting utilities.
//!
//! Provides functions for formatting identifiers for display, mainly
//! truncation for log readability.

/// Utility function to truncate an identifier for display purposes.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
/// Identifiers are free-form caller-supplied strings, so the cut falls on
/// a character boundary rather than a byte offset.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(8) {
		Some((cut, _)) => format!("{}..", &id[..cut]),
		None => id.to_string(),
	}
}
