//! [`IdBoundViewLoader`]: the record half of an "edit by id" form.
//!
//! The loader observes the navigation bus, reads its id key from every event's
//! query string, and runs [`sync`] against the previously seen id. A changed id
//! starts a fetch tagged with a fresh generation; only the completion whose
//! generation is still the latest gets committed to the view model, so a slow
//! response for an id the user already navigated away from is dropped.

use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::watch;
use wayfinder_nav::{NavigationBus, NavigationEvent, Subscription};
use wayfinder_worker::{GenerationClock, GenerationToken, TaskClass, join_error_panic_message, spawn};

use crate::action::{Action, RecordId, id_from_search, sync};
use crate::model::ViewModel;
use crate::source::{FetchError, RecordSource};

/// Query parameter read when no key is given.
pub const DEFAULT_ID_KEY: &str = "id";

#[derive(Default)]
struct LoaderState {
	previous: Option<RecordId>,
	last_action: Option<Action>,
	in_flight: Vec<GenerationToken>,
	subscription: Option<Subscription>,
}

struct LoaderInner<S: RecordSource> {
	key: Arc<str>,
	source: Arc<S>,
	clock: GenerationClock,
	state: Mutex<LoaderState>,
	model: watch::Sender<ViewModel<S::Record>>,
	stale_discards: AtomicU64,
}

impl<S: RecordSource> LoaderInner<S> {
	fn on_navigate(self: &Arc<Self>, event: &NavigationEvent) {
		let current = id_from_search(event.search(), &self.key);
		let mut state = self.state.lock();
		let action = sync(current.as_ref(), state.previous.as_ref());
		state.previous = current;
		state.last_action = Some(action.clone());
		tracing::debug!(key = %self.key, location = %event, ?action, "loader.sync");

		match action {
			Action::NoOp => {}
			Action::ClearToCreateMode => {
				self.clock.next();
				self.model.send_replace(ViewModel::create());
			}
			Action::LoadNew(id) => {
				let token = GenerationToken::new(self.clock.next());
				state.in_flight.push(token.clone());
				self.model.send_replace(ViewModel::loading(id.clone()));
				drop(state);
				self.start_fetch(id, token);
			}
		}
	}

	fn start_fetch(self: &Arc<Self>, id: RecordId, token: GenerationToken) {
		let source = Arc::clone(&self.source);
		let fetch_id = id.clone();
		let work = spawn(TaskClass::Interactive, async move { source.fetch(&fetch_id).await });
		let abort = work.abort_handle();
		let weak: Weak<Self> = Arc::downgrade(self);

		spawn(TaskClass::Interactive, async move {
			let outcome = tokio::select! {
				joined = work => match joined {
					Ok(outcome) => outcome,
					Err(err) => Err(FetchError::Aborted(
						join_error_panic_message(err).unwrap_or_else(|| "fetch task cancelled".to_string()),
					)),
				},
				_ = token.cancelled() => {
					abort.abort();
					tracing::debug!(%id, generation = token.generation(), "loader.fetch_cancelled");
					return;
				}
			};
			if let Some(inner) = weak.upgrade() {
				inner.commit(token.generation(), id, outcome);
			}
		});
	}

	fn commit(&self, generation: u64, id: RecordId, outcome: Result<S::Record, FetchError>) {
		let mut state = self.state.lock();
		state.in_flight.retain(|t| t.generation() != generation);

		if !self.clock.is_current(generation) {
			self.stale_discards.fetch_add(1, Ordering::Relaxed);
			tracing::debug!(%id, generation, latest = self.clock.latest(), "loader.stale_fetch_discarded");
			return;
		}

		let model = match outcome {
			Ok(record) => ViewModel {
				id: Some(id),
				record: Some(record),
				loading: false,
				error: None,
			},
			Err(err) => {
				tracing::warn!(%id, error = %err, "loader.fetch_failed");
				ViewModel {
					id: Some(id),
					record: None,
					loading: false,
					error: Some(err.to_string()),
				}
			}
		};
		self.model.send_replace(model);
	}

	/// Drops the subscription, invalidates outstanding fetches, and resets the model.
	fn detach(&self) -> Option<Subscription> {
		let mut state = self.state.lock();
		self.clock.next();
		for token in state.in_flight.drain(..) {
			token.cancel();
		}
		state.previous = None;
		self.model.send_replace(ViewModel::create());
		state.subscription.take()
	}
}

impl<S: RecordSource> Drop for LoaderInner<S> {
	fn drop(&mut self) {
		for token in self.state.get_mut().in_flight.drain(..) {
			token.cancel();
		}
	}
}

/// Binds a view's record to an id in the URL query.
///
/// Cloning yields another handle to the same loader.
pub struct IdBoundViewLoader<S: RecordSource> {
	inner: Arc<LoaderInner<S>>,
}

impl<S: RecordSource> Clone for IdBoundViewLoader<S> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<S: RecordSource> IdBoundViewLoader<S> {
	/// Creates a loader reading [`DEFAULT_ID_KEY`].
	pub fn new(source: S) -> Self {
		Self::with_key(DEFAULT_ID_KEY, source)
	}

	pub fn with_key(key: impl Into<Arc<str>>, source: S) -> Self {
		Self::from_shared(key, Arc::new(source))
	}

	/// Creates a loader over a source shared with other loaders.
	pub fn from_shared(key: impl Into<Arc<str>>, source: Arc<S>) -> Self {
		let (model, _) = watch::channel(ViewModel::create());
		Self {
			inner: Arc::new(LoaderInner {
				key: key.into(),
				source,
				clock: GenerationClock::new(),
				state: Mutex::new(LoaderState::default()),
				model,
				stale_discards: AtomicU64::new(0),
			}),
		}
	}

	pub fn key(&self) -> &str {
		&self.inner.key
	}

	/// Starts observing `bus`. The current location is synced immediately.
	/// Attaching again first detaches from the previous bus.
	pub fn attach(&self, bus: &NavigationBus) {
		self.detach();
		let weak = Arc::downgrade(&self.inner);
		let subscription = bus.observe(move |event| {
			if let Some(inner) = weak.upgrade() {
				inner.on_navigate(event);
			}
		});
		self.inner.state.lock().subscription = Some(subscription);
	}

	/// Stops observing and cancels outstanding fetches. Idempotent.
	pub fn detach(&self) {
		// Released outside the state lock.
		let subscription = self.inner.detach();
		drop(subscription);
	}

	pub fn is_attached(&self) -> bool {
		self.inner.state.lock().subscription.as_ref().is_some_and(Subscription::is_active)
	}

	/// Snapshot of the current view model.
	pub fn model(&self) -> ViewModel<S::Record> {
		self.inner.model.borrow().clone()
	}

	/// Receiver notified on every view model change.
	pub fn subscribe(&self) -> watch::Receiver<ViewModel<S::Record>> {
		self.inner.model.subscribe()
	}

	/// Clears a surfaced fetch error, keeping the rest of the state.
	pub fn dismiss_error(&self) {
		self.inner.model.send_if_modified(|model| model.error.take().is_some());
	}

	/// The action computed for the most recent navigation.
	pub fn last_action(&self) -> Option<Action> {
		self.inner.state.lock().last_action.clone()
	}

	/// Number of fetch results dropped because a newer id had been requested.
	pub fn stale_discards(&self) -> u64 {
		self.inner.stale_discards.load(Ordering::Relaxed)
	}

	/// Number of fetches started and not yet settled.
	pub fn pending_fetches(&self) -> usize {
		self.inner.state.lock().in_flight.len()
	}
}

impl<S: RecordSource> std::fmt::Debug for IdBoundViewLoader<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("IdBoundViewLoader")
			.field("key", &self.inner.key)
			.field("attached", &self.is_attached())
			.field("pending_fetches", &self.pending_fetches())
			.finish()
	}
}
