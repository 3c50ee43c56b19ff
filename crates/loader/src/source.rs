use async_trait::async_trait;
use thiserror::Error;

use crate::action::RecordId;

/// Errors surfaced by a record fetch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
	/// The backend has no record with this id.
	#[error("record {0} not found")]
	NotFound(RecordId),

	/// The request failed in transit or the backend rejected it.
	#[error("request failed: {0}")]
	Transport(String),

	/// The fetch task panicked or was torn down.
	#[error("fetch aborted: {0}")]
	Aborted(String),
}

/// Transport used by a bound view to load the record for an id.
#[async_trait]
pub trait RecordSource: Send + Sync + 'static {
	type Record: Clone + Send + Sync + 'static;

	async fn fetch(&self, id: &RecordId) -> Result<Self::Record, FetchError>;
}
