//! Error types for route tables and lazy views.

use thiserror::Error;

/// Errors raised while building a [`RouteTable`](crate::RouteTable).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
	/// Two entries were registered for the same pathname.
	#[error("duplicate route pattern {0:?}")]
	DuplicatePattern(String),

	/// A pattern is not an absolute, normalized pathname.
	#[error("invalid route pattern {pattern:?}: {reason}")]
	InvalidPattern {
		/// The offending pattern.
		pattern: String,
		/// Why it was rejected.
		reason: &'static str,
	},
}

/// Errors raised while fetching a lazy view.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewLoadError {
	/// The chunk could not be fetched.
	#[error("failed to load view {view}: {reason}")]
	Chunk {
		/// Name of the view being fetched.
		view: String,
		/// Transport-specific failure description.
		reason: String,
	},

	/// The fetch task panicked or was cancelled.
	#[error("loading view {view} aborted: {message}")]
	Panicked {
		/// Name of the view being fetched.
		view: String,
		/// Panic payload or cancellation note.
		message: String,
	},
}
