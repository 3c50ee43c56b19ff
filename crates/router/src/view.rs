use std::sync::Arc;

use wayfinder_nav::{NavigationBus, NavigationEvent};

/// A renderable screen.
///
/// Rendering is deliberately minimal: a view turns the location it is shown
/// at into text. Views that hold per-screen state (forms bound to a record id)
/// use `mount`/`unmount` to attach to and detach from the navigation bus.
pub trait View: Send + Sync + 'static {
	/// Short name used in logs and error messages.
	fn name(&self) -> &str;

	fn render(&self, location: &NavigationEvent) -> String;

	/// Called when the outlet starts showing this view.
	fn mount(&self, _bus: &NavigationBus) {}

	/// Called when the outlet stops showing this view.
	fn unmount(&self) {}
}

/// Shared handle to a view.
pub type ViewHandle = Arc<dyn View>;

/// Returns true if both handles point at the same view instance.
pub fn same_view(a: &ViewHandle, b: &ViewHandle) -> bool {
	std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Rendered for pathnames that have no table entry.
#[derive(Debug, Default)]
pub struct NotFoundView;

impl View for NotFoundView {
	fn name(&self) -> &str {
		"not-found"
	}

	fn render(&self, location: &NavigationEvent) -> String {
		format!("not found: {}", location.pathname())
	}
}

/// Shown while a lazy view's code is still being fetched.
#[derive(Debug, Default)]
pub struct PlaceholderView;

impl View for PlaceholderView {
	fn name(&self) -> &str {
		"placeholder"
	}

	fn render(&self, _location: &NavigationEvent) -> String {
		"loading…".to_string()
	}
}

/// Shown when fetching a lazy view failed.
#[derive(Debug)]
pub(crate) struct LoadFailedView {
	pub(crate) message: String,
}

impl View for LoadFailedView {
	fn name(&self) -> &str {
		"load-failed"
	}

	fn render(&self, _location: &NavigationEvent) -> String {
		self.message.clone()
	}
}
