//! Static route table.

use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::RouteTableError;
use crate::lazy::LazyView;
use crate::path::normalize;
use crate::view::{NotFoundView, PlaceholderView, ViewHandle};

/// Where a descriptor's view comes from.
#[derive(Clone)]
pub enum ViewSource {
	/// Available immediately.
	Eager(ViewHandle),
	/// Fetched on first use.
	Lazy(Arc<LazyView>),
}

/// The unit of renderable content a pathname resolves to.
#[derive(Clone)]
pub struct ViewDescriptor {
	title: Arc<str>,
	source: ViewSource,
	fallback: bool,
}

impl ViewDescriptor {
	pub fn eager(title: impl Into<Arc<str>>, view: ViewHandle) -> Self {
		Self {
			title: title.into(),
			source: ViewSource::Eager(view),
			fallback: false,
		}
	}

	pub fn lazy(title: impl Into<Arc<str>>, view: Arc<LazyView>) -> Self {
		Self {
			title: title.into(),
			source: ViewSource::Lazy(view),
			fallback: false,
		}
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn source(&self) -> &ViewSource {
		&self.source
	}

	pub fn is_eager(&self) -> bool {
		matches!(self.source, ViewSource::Eager(_))
	}

	/// True for the built-in descriptor returned for unmatched pathnames.
	pub fn is_not_found(&self) -> bool {
		self.fallback
	}
}

impl std::fmt::Debug for ViewDescriptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViewDescriptor")
			.field("title", &self.title)
			.field("eager", &self.is_eager())
			.field("not_found", &self.fallback)
			.finish()
	}
}

/// One row of the table: an exact pathname and what it renders.
#[derive(Debug, Clone)]
pub struct RouteEntry {
	pub pattern: Arc<str>,
	pub descriptor: ViewDescriptor,
}

/// Exact-match mapping from pathname to view. Read-only once built.
pub struct RouteTable {
	routes: IndexMap<Arc<str>, ViewDescriptor>,
	not_found: ViewDescriptor,
	placeholder: ViewHandle,
}

impl RouteTable {
	pub fn builder() -> RouteTableBuilder {
		RouteTableBuilder::default()
	}

	/// Resolves `pathname` after normalization. Unmatched pathnames resolve to
	/// the built-in not-found descriptor.
	pub fn resolve(&self, pathname: &str) -> &ViewDescriptor {
		let key = normalize(pathname);
		match self.routes.get(key) {
			Some(descriptor) => descriptor,
			None => {
				tracing::debug!(pathname, "router.resolve.unmatched");
				&self.not_found
			}
		}
	}

	/// Title of the route registered for `pathname`, if any.
	pub fn title_for(&self, pathname: &str) -> Option<&str> {
		self.routes.get(normalize(pathname)).map(ViewDescriptor::title)
	}

	pub fn contains(&self, pathname: &str) -> bool {
		self.routes.contains_key(normalize(pathname))
	}

	/// The view rendered while a lazy view is pending.
	pub fn placeholder(&self) -> &ViewHandle {
		&self.placeholder
	}

	pub fn not_found(&self) -> &ViewDescriptor {
		&self.not_found
	}

	/// Registered patterns in registration order.
	pub fn patterns(&self) -> impl Iterator<Item = &str> {
		self.routes.keys().map(|k| &**k)
	}

	pub fn len(&self) -> usize {
		self.routes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

impl std::fmt::Debug for RouteTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteTable").field("routes", &self.routes.keys().collect::<Vec<_>>()).finish()
	}
}

/// Collects entries and validates them into a [`RouteTable`].
#[derive(Default)]
pub struct RouteTableBuilder {
	entries: Vec<RouteEntry>,
	not_found: Option<ViewHandle>,
	placeholder: Option<ViewHandle>,
}

impl RouteTableBuilder {
	pub fn route(mut self, pattern: impl Into<Arc<str>>, descriptor: ViewDescriptor) -> Self {
		self.entries.push(RouteEntry {
			pattern: pattern.into(),
			descriptor,
		});
		self
	}

	pub fn eager(self, pattern: impl Into<Arc<str>>, title: impl Into<Arc<str>>, view: ViewHandle) -> Self {
		self.route(pattern, ViewDescriptor::eager(title, view))
	}

	pub fn lazy(self, pattern: impl Into<Arc<str>>, title: impl Into<Arc<str>>, view: &Arc<LazyView>) -> Self {
		self.route(pattern, ViewDescriptor::lazy(title, Arc::clone(view)))
	}

	/// Overrides the view rendered for unmatched pathnames.
	pub fn not_found(mut self, view: ViewHandle) -> Self {
		self.not_found = Some(view);
		self
	}

	/// Overrides the view rendered while lazy views load.
	pub fn placeholder(mut self, view: ViewHandle) -> Self {
		self.placeholder = Some(view);
		self
	}

	pub fn build(self) -> Result<RouteTable, RouteTableError> {
		let mut routes = IndexMap::with_capacity(self.entries.len());
		for RouteEntry { pattern, descriptor } in self.entries {
			validate_pattern(&pattern)?;
			match routes.entry(pattern) {
				Entry::Occupied(slot) => return Err(RouteTableError::DuplicatePattern(slot.key().to_string())),
				Entry::Vacant(slot) => {
					slot.insert(descriptor);
				}
			}
		}

		let not_found = self.not_found.unwrap_or_else(|| Arc::new(NotFoundView));
		Ok(RouteTable {
			routes,
			not_found: ViewDescriptor {
				title: Arc::from("Not found"),
				source: ViewSource::Eager(not_found),
				fallback: true,
			},
			placeholder: self.placeholder.unwrap_or_else(|| Arc::new(PlaceholderView)),
		})
	}
}

fn validate_pattern(pattern: &str) -> Result<(), RouteTableError> {
	let reason = if !pattern.starts_with('/') {
		"must start with '/'"
	} else if normalize(pattern) != pattern {
		"must not end with '/'"
	} else if pattern.contains(['?', '#']) {
		"must be a bare pathname"
	} else {
		return Ok(());
	};
	Err(RouteTableError::InvalidPattern {
		pattern: pattern.to_string(),
		reason,
	})
}
