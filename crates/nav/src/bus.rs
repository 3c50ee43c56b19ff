//! The navigation bus.
//!
//! [`NavigationBus`] turns every location change of a [`History`] into one
//! [`NavigationEvent`], whether it came from a traversal (`back`/`forward`) or
//! from programmatic navigation through the intercepted entry points.
//!
//! # Delivery
//!
//! Events are delivered synchronously, to subscribers in registration order.
//! The subscriber list is snapshotted per event, so a subscriber added while an
//! event is being delivered only sees later events. A navigation triggered from
//! inside a callback is queued and delivered after the current event reaches
//! every subscriber, so observers always see navigations in the order they
//! happened.
//!
//! A panicking callback is caught, logged, and counted; the remaining
//! subscribers still receive the event.

use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;

use crate::error::{NavError, Result};
use crate::event::NavigationEvent;
use crate::history::{History, ListenerId};
use crate::intercept::install_interception;

type Callback = Arc<dyn Fn(&NavigationEvent) + Send + Sync>;

/// Identifier of one registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Registration handle returned by [`NavigationBus::observe`].
///
/// Owned by the observing component. Dropping it releases the registration;
/// releasing an already released handle is a no-op.
#[must_use = "dropping a Subscription immediately unsubscribes the callback"]
pub struct Subscription {
	id: SubscriptionId,
	bus: Weak<BusInner>,
}

impl Subscription {
	pub fn id(&self) -> SubscriptionId {
		self.id
	}

	/// Returns true while the callback is registered with a live bus.
	pub fn is_active(&self) -> bool {
		self.bus.upgrade().is_some_and(|bus| bus.is_registered(self.id))
	}

	/// Releases the registration. Equivalent to dropping the handle.
	pub fn release(self) {}

	fn detach(&self) {
		if let Some(bus) = self.bus.upgrade() {
			bus.remove(self.id);
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.detach();
	}
}

impl std::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscription").field("id", &self.id).field("active", &self.is_active()).finish()
	}
}

#[derive(Default)]
struct Dispatch {
	pending: VecDeque<NavigationEvent>,
	/// Event being delivered; set only while `delivering`.
	current: Option<NavigationEvent>,
	delivering: bool,
}

struct BusInner {
	history: Option<Arc<History>>,
	listener: OnceLock<ListenerId>,
	subscribers: Mutex<Vec<(SubscriptionId, Callback)>>,
	dispatch: Mutex<Dispatch>,
	next_id: AtomicU64,
	delivered: AtomicU64,
	faults: AtomicU64,
}

impl BusInner {
	fn is_registered(&self, id: SubscriptionId) -> bool {
		self.subscribers.lock().iter().any(|(sid, _)| *sid == id)
	}

	fn remove(&self, id: SubscriptionId) -> bool {
		let mut subscribers = self.subscribers.lock();
		let before = subscribers.len();
		subscribers.retain(|(sid, _)| *sid != id);
		subscribers.len() != before
	}

	fn callback(&self, id: SubscriptionId) -> Option<Callback> {
		self.subscribers.lock().iter().find(|(sid, _)| *sid == id).map(|(_, cb)| Arc::clone(cb))
	}

	fn publish(&self, event: NavigationEvent) {
		{
			let mut dispatch = self.dispatch.lock();
			dispatch.pending.push_back(event);
			if dispatch.delivering {
				tracing::trace!(queued = dispatch.pending.len(), "nav.bus.queued");
				return;
			}
			dispatch.delivering = true;
		}

		loop {
			let next = {
				let mut dispatch = self.dispatch.lock();
				match dispatch.pending.pop_front() {
					Some(event) => {
						dispatch.current = Some(event.clone());
						event
					}
					None => {
						dispatch.current = None;
						dispatch.delivering = false;
						break;
					}
				}
			};
			self.deliver(&next);
		}
	}

	fn deliver(&self, event: &NavigationEvent) {
		let targets: Vec<SubscriptionId> = self.subscribers.lock().iter().map(|(id, _)| *id).collect();
		tracing::trace!(pathname = event.pathname(), search = event.search(), subscribers = targets.len(), "nav.bus.deliver");
		for id in targets {
			// Unsubscribed by an earlier callback for this same event.
			let Some(callback) = self.callback(id) else {
				continue;
			};
			self.invoke(id, &callback, event);
		}
		self.delivered.fetch_add(1, Ordering::Relaxed);
	}

	fn invoke(&self, id: SubscriptionId, callback: &Callback, event: &NavigationEvent) {
		if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(event))) {
			self.faults.fetch_add(1, Ordering::Relaxed);
			let message = payload
				.downcast_ref::<&'static str>()
				.map(|s| (*s).to_string())
				.or_else(|| payload.downcast_ref::<String>().cloned())
				.unwrap_or_else(|| "non-string panic payload".to_string());
			tracing::warn!(subscription = id.0, location = %event, panic = %message, "navigation subscriber panicked");
		}
	}
}

impl Drop for BusInner {
	fn drop(&mut self) {
		if let (Some(history), Some(listener)) = (&self.history, self.listener.get()) {
			history.remove_popstate_listener(*listener);
		}
	}
}

/// One ordered stream of navigation events for a page.
#[derive(Clone)]
pub struct NavigationBus {
	inner: Arc<BusInner>,
}

impl NavigationBus {
	/// Creates a bus bound to `history` and installs the navigation interception
	/// on it if no one has yet.
	pub fn new(history: Arc<History>) -> Self {
		install_interception(&history);
		let bus = Self::build(Some(Arc::clone(&history)));

		let weak = Arc::downgrade(&bus.inner);
		let listener = history.add_popstate_listener(move |history| {
			if let Some(inner) = weak.upgrade() {
				inner.publish(history.location());
			}
		});
		let _ = bus.inner.listener.set(listener);
		bus
	}

	/// Creates a bus with no history. Observers register normally but are never
	/// called, and navigation requests fail with [`NavError::NoHistory`].
	pub fn detached() -> Self {
		Self::build(None)
	}

	fn build(history: Option<Arc<History>>) -> Self {
		Self {
			inner: Arc::new(BusInner {
				history,
				listener: OnceLock::new(),
				subscribers: Mutex::new(Vec::new()),
				dispatch: Mutex::new(Dispatch::default()),
				next_id: AtomicU64::new(0),
				delivered: AtomicU64::new(0),
				faults: AtomicU64::new(0),
			}),
		}
	}

	/// The process-wide bus, bound to [`History::global`].
	pub fn global() -> &'static NavigationBus {
		static GLOBAL: OnceLock<NavigationBus> = OnceLock::new();
		GLOBAL.get_or_init(|| NavigationBus::new(Arc::clone(History::global())))
	}

	/// Registers `callback`, calls it once with the current location, and again
	/// on every later navigation until the returned handle is released.
	///
	/// Registering from inside a callback calls it with the event being
	/// delivered; navigations queued behind that event follow in order.
	pub fn observe<F>(&self, callback: F) -> Subscription
	where
		F: Fn(&NavigationEvent) + Send + Sync + 'static,
	{
		let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
		let callback: Callback = Arc::new(callback);
		self.inner.subscribers.lock().push((id, Arc::clone(&callback)));
		tracing::trace!(subscription = id.0, "nav.bus.observe");

		if let Some(history) = &self.inner.history {
			let delivering = self.inner.dispatch.lock().current.clone();
			let initial = delivering.unwrap_or_else(|| history.location());
			self.inner.invoke(id, &callback, &initial);
		}

		Subscription {
			id,
			bus: Arc::downgrade(&self.inner),
		}
	}

	/// Releases `subscription`. Unknown or already released handles are ignored.
	pub fn unobserve(&self, subscription: &Subscription) {
		if subscription.bus.ptr_eq(&Arc::downgrade(&self.inner)) && self.inner.remove(subscription.id) {
			tracing::trace!(subscription = subscription.id.0, "nav.bus.unobserve");
		}
	}

	/// Pushes `target` onto the history through the intercepted entry point.
	pub fn navigate(&self, target: &str) -> Result<()> {
		self.history()?.push_state(target)
	}

	/// Replaces the current history entry with `target`.
	pub fn redirect(&self, target: &str) -> Result<()> {
		self.history()?.replace_state(target)
	}

	pub fn back(&self) -> Result<bool> {
		Ok(self.history()?.back())
	}

	pub fn forward(&self) -> Result<bool> {
		Ok(self.history()?.forward())
	}

	/// The current location, if a history is attached.
	pub fn current(&self) -> Option<NavigationEvent> {
		self.inner.history.as_ref().map(|history| history.location())
	}

	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.lock().len()
	}

	/// Number of events delivered so far.
	pub fn delivered(&self) -> u64 {
		self.inner.delivered.load(Ordering::Relaxed)
	}

	/// Number of subscriber callbacks that panicked.
	pub fn faults(&self) -> u64 {
		self.inner.faults.load(Ordering::Relaxed)
	}

	fn history(&self) -> Result<&Arc<History>> {
		self.inner.history.as_ref().ok_or(NavError::NoHistory)
	}
}

impl std::fmt::Debug for NavigationBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NavigationBus")
			.field("attached", &self.inner.history.is_some())
			.field("subscribers", &self.subscriber_count())
			.field("delivered", &self.delivered())
			.finish()
	}
}
