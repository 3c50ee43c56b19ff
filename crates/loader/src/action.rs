use std::fmt;
use std::sync::Arc;

use wayfinder_nav::query_param;

/// Identifier of a record, as carried in the query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(Arc<str>);

impl RecordId {
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for RecordId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for RecordId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for RecordId {
	fn from(id: String) -> Self {
		Self::new(id)
	}
}

/// What a bound view should do after observing a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
	/// The id did not change.
	NoOp,
	/// A different id is now current; fetch it.
	LoadNew(RecordId),
	/// No id is present; reset to a blank create form.
	ClearToCreateMode,
}

/// Decides how to react to the id currently in the URL.
pub fn sync(current: Option<&RecordId>, previous: Option<&RecordId>) -> Action {
	match current {
		None => Action::ClearToCreateMode,
		Some(id) if previous == Some(id) => Action::NoOp,
		Some(id) => Action::LoadNew(id.clone()),
	}
}

/// Reads the record id stored under `key` in `search`. Empty values count as absent.
pub fn id_from_search(search: &str, key: &str) -> Option<RecordId> {
	query_param(search, key).filter(|id| !id.is_empty()).map(RecordId::from)
}
