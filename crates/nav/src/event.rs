use std::fmt;
use std::sync::Arc;

use url::Url;

/// Snapshot of the page location at the moment it was observed.
///
/// `search` follows `location.search`: it carries the leading `?` when a
/// non-empty query is present and is empty otherwise. The fragment is not
/// part of the event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationEvent {
	pathname: Arc<str>,
	search: Arc<str>,
}

impl NavigationEvent {
	/// Builds an event from raw parts. A bare query without `?` is prefixed.
	pub fn new(pathname: impl Into<Arc<str>>, search: impl AsRef<str>) -> Self {
		let search = search.as_ref();
		let search: Arc<str> = match search {
			"" | "?" => Arc::from(""),
			s if s.starts_with('?') => Arc::from(s),
			s => Arc::from(format!("?{s}")),
		};
		Self {
			pathname: pathname.into(),
			search,
		}
	}

	pub(crate) fn from_url(url: &Url) -> Self {
		Self::new(url.path(), url.query().unwrap_or_default())
	}

	pub fn pathname(&self) -> &str {
		&self.pathname
	}

	pub fn search(&self) -> &str {
		&self.search
	}

	/// Returns the first decoded value for `key` in the query string.
	pub fn query(&self, key: &str) -> Option<String> {
		query_param(&self.search, key)
	}
}

impl fmt::Display for NavigationEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}", self.pathname, self.search)
	}
}

/// Returns the first form-urlencoded value for `key` in `search`.
///
/// Accepts the query with or without its leading `?`.
pub fn query_param(search: &str, key: &str) -> Option<String> {
	let query = search.strip_prefix('?').unwrap_or(search);
	url::form_urlencoded::parse(query.as_bytes())
		.find(|(k, _)| k == key)
		.map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn search_is_normalized_to_location_semantics() {
		assert_eq!(NavigationEvent::new("/a", "").search(), "");
		assert_eq!(NavigationEvent::new("/a", "?").search(), "");
		assert_eq!(NavigationEvent::new("/a", "id=3").search(), "?id=3");
		assert_eq!(NavigationEvent::new("/a", "?id=3").search(), "?id=3");
	}

	#[test]
	fn from_url_drops_fragment() {
		let url = Url::parse("http://localhost/vendors/edit?id=7#notes").unwrap();
		let event = NavigationEvent::from_url(&url);
		assert_eq!(event.pathname(), "/vendors/edit");
		assert_eq!(event.search(), "?id=7");
		assert_eq!(event.to_string(), "/vendors/edit?id=7");
	}

	#[test]
	fn query_decodes_and_takes_first_value() {
		let event = NavigationEvent::new("/users", "?name=Ada%20L&id=4&id=5");
		assert_eq!(event.query("name").as_deref(), Some("Ada L"));
		assert_eq!(event.query("id").as_deref(), Some("4"));
		assert_eq!(event.query("missing"), None);
	}

	#[test]
	fn empty_value_is_still_present() {
		assert_eq!(query_param("?id=", "id").as_deref(), Some(""));
		assert_eq!(query_param("id=9", "id").as_deref(), Some("9"));
	}
}
