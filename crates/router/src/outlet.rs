//! The outlet: keeps the rendered view in step with the navigation bus.
//!
//! Every [`NavigationEvent`] is resolved against the [`RouteTable`]. Eager
//! views and already loaded lazy views are shown at once; a pending lazy view
//! shows the table's placeholder until its fetch settles. The mounted view is
//! only swapped (unmount old, mount new) when the resolved view instance
//! changes, so routes that share one view keep it mounted across navigation.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::watch;
use wayfinder_nav::{NavigationBus, NavigationEvent, Subscription};

use crate::error::ViewLoadError;
use crate::table::{RouteTable, ViewSource};
use crate::view::{LoadFailedView, ViewHandle, same_view};

/// What kind of content a frame shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
	/// The resolved view itself.
	View,
	/// The placeholder for a lazy view still loading.
	Placeholder,
	/// The built-in view for an unmatched pathname.
	NotFound,
	/// The lazy view failed to load.
	LoadFailed,
}

/// The outlet's current content.
#[derive(Clone)]
pub struct Frame {
	location: NavigationEvent,
	title: Arc<str>,
	kind: FrameKind,
	view: ViewHandle,
}

impl Frame {
	pub fn location(&self) -> &NavigationEvent {
		&self.location
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn kind(&self) -> FrameKind {
		self.kind
	}

	pub fn view(&self) -> &ViewHandle {
		&self.view
	}

	pub fn render(&self) -> String {
		self.view.render(&self.location)
	}
}

impl std::fmt::Debug for Frame {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Frame")
			.field("location", &self.location)
			.field("title", &self.title)
			.field("kind", &self.kind)
			.field("view", &self.view.name())
			.finish()
	}
}

#[derive(Default)]
struct OutletState {
	/// Bumped on every navigation; lazy completions carry the value they were requested under.
	seq: u64,
	mounted: Option<ViewHandle>,
}

struct OutletInner {
	table: Arc<RouteTable>,
	bus: NavigationBus,
	state: Mutex<OutletState>,
	frames: watch::Sender<Option<Frame>>,
}

impl OutletInner {
	fn on_navigate(self: &Arc<Self>, event: &NavigationEvent) {
		let seq = {
			let mut state = self.state.lock();
			state.seq += 1;
			state.seq
		};
		let descriptor = self.table.resolve(event.pathname());
		let title: Arc<str> = Arc::from(descriptor.title());
		tracing::debug!(location = %event, title = %title, seq, "router.outlet.resolve");

		match descriptor.source() {
			ViewSource::Eager(view) => {
				let kind = if descriptor.is_not_found() { FrameKind::NotFound } else { FrameKind::View };
				self.show(event.clone(), title, kind, Arc::clone(view));
			}
			ViewSource::Lazy(lazy) => {
				let weak = Arc::downgrade(self);
				let location = event.clone();
				let pending_title = Arc::clone(&title);
				let loaded = lazy.load(move |result| {
					if let Some(inner) = weak.upgrade() {
						inner.on_chunk(seq, location, pending_title, result);
					}
				});
				match loaded {
					Some(view) => self.show(event.clone(), title, FrameKind::View, view),
					None => {
						let placeholder = Arc::clone(self.table.placeholder());
						self.show(event.clone(), title, FrameKind::Placeholder, placeholder);
					}
				}
			}
		}
	}

	fn on_chunk(&self, seq: u64, location: NavigationEvent, title: Arc<str>, result: &Result<ViewHandle, ViewLoadError>) {
		if self.state.lock().seq != seq {
			tracing::debug!(location = %location, seq, "router.outlet.chunk_superseded");
			return;
		}
		match result {
			Ok(view) => self.show(location, title, FrameKind::View, Arc::clone(view)),
			Err(err) => {
				let failed: ViewHandle = Arc::new(LoadFailedView { message: err.to_string() });
				self.show(location, title, FrameKind::LoadFailed, failed);
			}
		}
	}

	fn show(&self, location: NavigationEvent, title: Arc<str>, kind: FrameKind, view: ViewHandle) {
		let swap = {
			let mut state = self.state.lock();
			match &state.mounted {
				Some(current) if same_view(current, &view) => None,
				_ => Some(state.mounted.replace(Arc::clone(&view))),
			}
		};

		if let Some(previous) = swap {
			if let Some(previous) = previous {
				tracing::trace!(view = previous.name(), "router.outlet.unmount");
				previous.unmount();
			}
			tracing::trace!(view = view.name(), "router.outlet.mount");
			view.mount(&self.bus);
		}

		self.frames.send_replace(Some(Frame { location, title, kind, view }));
	}

	fn unmount_current(&self) {
		let mounted = self.state.lock().mounted.take();
		if let Some(view) = mounted {
			view.unmount();
		}
	}
}

/// Renders whatever the current location resolves to.
pub struct Outlet {
	inner: Arc<OutletInner>,
	subscription: Option<Subscription>,
}

impl Outlet {
	/// Attaches a new outlet to `bus`. The current location is resolved immediately.
	pub fn new(table: Arc<RouteTable>, bus: &NavigationBus) -> Self {
		let (frames, _) = watch::channel(None);
		let inner = Arc::new(OutletInner {
			table,
			bus: bus.clone(),
			state: Mutex::new(OutletState::default()),
			frames,
		});

		let weak: Weak<OutletInner> = Arc::downgrade(&inner);
		let subscription = bus.observe(move |event| {
			if let Some(inner) = weak.upgrade() {
				inner.on_navigate(event);
			}
		});

		Self {
			inner,
			subscription: Some(subscription),
		}
	}

	pub fn table(&self) -> &Arc<RouteTable> {
		&self.inner.table
	}

	/// The frame currently shown, if any navigation has been observed.
	pub fn frame(&self) -> Option<Frame> {
		self.inner.frames.borrow().clone()
	}

	/// Receiver notified on every frame change.
	pub fn frames(&self) -> watch::Receiver<Option<Frame>> {
		self.inner.frames.subscribe()
	}

	/// Renders the current frame. Before the first event (or forever, on a
	/// detached bus) the table's placeholder is rendered instead.
	pub fn render(&self) -> String {
		match self.frame() {
			Some(frame) => frame.render(),
			None => self.inner.table.placeholder().render(&NavigationEvent::new("/", "")),
		}
	}
}

impl Drop for Outlet {
	fn drop(&mut self) {
		if let Some(subscription) = self.subscription.take() {
			self.inner.bus.unobserve(&subscription);
		}
		self.inner.unmount_current();
	}
}
