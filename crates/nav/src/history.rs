//! In-process model of a browser page history.
//!
//! [`History`] keeps the entry stack and cursor, a list of `popstate`
//! listeners, and the two native entry points that perform programmatic
//! navigation. The entry points live in swappable slots so they can be
//! decorated once by [`install_interception`](crate::install_interception).
//!
//! As in a browser, traversal (`back`/`forward`/`go`) dispatches `popstate`,
//! while the undecorated `push_state`/`replace_state` change the location
//! silently.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use url::Url;

use crate::error::{NavError, Result};
use crate::event::NavigationEvent;
use crate::guard::PatchGuard;

const PAGE_ORIGIN: &str = "http://localhost/";

/// A native programmatic-navigation entry point.
pub struct NativeEntry(Box<dyn Fn(&History, &str) -> Result<()> + Send + Sync>);

impl NativeEntry {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&History, &str) -> Result<()> + Send + Sync + 'static,
	{
		Self(Box::new(f))
	}

	pub fn call(&self, history: &History, target: &str) -> Result<()> {
		(self.0)(history, target)
	}
}

/// Handle identifying one `popstate` listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type PopStateListener = Arc<dyn Fn(&History) + Send + Sync>;

struct Entries {
	stack: Vec<Url>,
	cursor: usize,
}

impl Entries {
	fn current(&self) -> &Url {
		&self.stack[self.cursor]
	}
}

/// Session history of one page.
pub struct History {
	entries: Mutex<Entries>,
	push_state: ArcSwap<NativeEntry>,
	replace_state: ArcSwap<NativeEntry>,
	listeners: Mutex<Vec<(ListenerId, PopStateListener)>>,
	next_listener: AtomicU64,
	patch_guard: PatchGuard,
}

impl History {
	/// Creates a history whose single entry is `initial`, resolved against the page origin.
	pub fn new(initial: &str) -> Result<Self> {
		let origin = page_origin();
		let url = resolve_against(&origin, initial)?;
		Ok(Self::with_url(url))
	}

	fn with_url(url: Url) -> Self {
		Self {
			entries: Mutex::new(Entries { stack: vec![url], cursor: 0 }),
			push_state: ArcSwap::from_pointee(NativeEntry::new(History::native_push)),
			replace_state: ArcSwap::from_pointee(NativeEntry::new(History::native_replace)),
			listeners: Mutex::new(Vec::new()),
			next_listener: AtomicU64::new(0),
			patch_guard: PatchGuard::new(),
		}
	}

	/// The history of the process-wide page, starting at `/`.
	pub fn global() -> &'static Arc<History> {
		static GLOBAL: OnceLock<Arc<History>> = OnceLock::new();
		GLOBAL.get_or_init(|| Arc::new(History::with_url(page_origin())))
	}

	/// Current location.
	pub fn location(&self) -> NavigationEvent {
		NavigationEvent::from_url(self.entries.lock().current())
	}

	/// Number of entries in the session history.
	pub fn len(&self) -> usize {
		self.entries.lock().stack.len()
	}

	/// Always false: a history has at least its initial entry.
	pub fn is_empty(&self) -> bool {
		false
	}

	/// Index of the current entry.
	pub fn index(&self) -> usize {
		self.entries.lock().cursor
	}

	/// Pushes a new entry through the (possibly decorated) push entry point.
	pub fn push_state(&self, target: &str) -> Result<()> {
		let entry = self.push_state.load_full();
		entry.call(self, target)
	}

	/// Replaces the current entry through the (possibly decorated) replace entry point.
	pub fn replace_state(&self, target: &str) -> Result<()> {
		let entry = self.replace_state.load_full();
		entry.call(self, target)
	}

	pub fn back(&self) -> bool {
		self.go(-1)
	}

	pub fn forward(&self) -> bool {
		self.go(1)
	}

	/// Moves the cursor by `delta` entries and dispatches `popstate`.
	///
	/// Out-of-range traversal is ignored and returns false.
	pub fn go(&self, delta: isize) -> bool {
		let moved = {
			let mut entries = self.entries.lock();
			match entries.cursor.checked_add_signed(delta) {
				Some(next) if delta != 0 && next < entries.stack.len() => {
					entries.cursor = next;
					true
				}
				_ => false,
			}
		};
		if moved {
			self.dispatch_popstate();
		}
		moved
	}

	pub fn add_popstate_listener<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&History) + Send + Sync + 'static,
	{
		let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
		self.listeners.lock().push((id, Arc::new(listener)));
		id
	}

	/// Removes a listener; returns false if it was not registered.
	pub fn remove_popstate_listener(&self, id: ListenerId) -> bool {
		let mut listeners = self.listeners.lock();
		let before = listeners.len();
		listeners.retain(|(lid, _)| *lid != id);
		listeners.len() != before
	}

	/// Invokes every `popstate` listener registered at the time of the call.
	pub fn dispatch_popstate(&self) {
		let listeners: Vec<PopStateListener> = self.listeners.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
		for listener in listeners {
			listener(self);
		}
	}

	pub fn patch_guard(&self) -> &PatchGuard {
		&self.patch_guard
	}

	/// Replaces both entry points with decorations of their current values.
	pub(crate) fn decorate_entry_points<F>(&self, decorate: F)
	where
		F: Fn(Arc<NativeEntry>) -> NativeEntry,
	{
		self.push_state.store(Arc::new(decorate(self.push_state.load_full())));
		self.replace_state.store(Arc::new(decorate(self.replace_state.load_full())));
	}

	fn native_push(&self, target: &str) -> Result<()> {
		let mut entries = self.entries.lock();
		let url = resolve_same_origin(entries.current(), target)?;
		let keep = entries.cursor + 1;
		entries.stack.truncate(keep);
		entries.stack.push(url);
		entries.cursor = keep;
		Ok(())
	}

	fn native_replace(&self, target: &str) -> Result<()> {
		let mut entries = self.entries.lock();
		let url = resolve_same_origin(entries.current(), target)?;
		let cursor = entries.cursor;
		entries.stack[cursor] = url;
		Ok(())
	}
}

fn page_origin() -> Url {
	Url::parse(PAGE_ORIGIN).expect("page origin constant is a valid URL")
}

fn resolve_against(base: &Url, target: &str) -> Result<Url> {
	base.join(target).map_err(|source| NavError::InvalidUrl {
		target: target.to_string(),
		source,
	})
}

fn resolve_same_origin(current: &Url, target: &str) -> Result<Url> {
	let url = resolve_against(current, target)?;
	if url.origin() != current.origin() {
		return Err(NavError::CrossOrigin {
			target: url.to_string(),
			origin: current.origin().ascii_serialization(),
		});
	}
	Ok(url)
}

#[cfg(test)]
mod tests;
