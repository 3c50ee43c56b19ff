//! Error types for history manipulation.

use thiserror::Error;

/// Errors raised by programmatic navigation.
#[derive(Debug, Error)]
pub enum NavError {
	/// No history is attached (non-browser host); navigation is unavailable.
	#[error("no history attached to this navigation bus")]
	NoHistory,

	/// The target could not be resolved against the current location.
	#[error("invalid navigation target {target:?}: {source}")]
	InvalidUrl {
		/// The target as passed by the caller.
		target: String,
		/// The underlying parse error.
		#[source]
		source: url::ParseError,
	},

	/// The target resolves to a different origin than the current page.
	#[error("navigation target {target:?} leaves origin {origin}")]
	CrossOrigin {
		/// The resolved target URL.
		target: String,
		/// The origin of the current page.
		origin: String,
	},
}

/// Result type for navigation operations.
pub type Result<T> = std::result::Result<T, NavError>;
