//! Views whose code is fetched on first use.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::BoxFuture;
use parking_lot::Mutex;
use wayfinder_worker::{TaskClass, join_error_panic_message, spawn};

use crate::error::ViewLoadError;
use crate::view::ViewHandle;

type Fetch = Box<dyn Fn() -> BoxFuture<'static, Result<ViewHandle, ViewLoadError>> + Send + Sync>;
type Waiter = Box<dyn FnOnce(&Result<ViewHandle, ViewLoadError>) + Send>;

enum LazyState {
	Idle,
	Loading { waiters: Vec<Waiter> },
	Ready(ViewHandle),
	Failed(ViewLoadError),
}

/// Observable state of a lazy view.
#[derive(Clone)]
pub enum LazyStatus {
	Idle,
	Pending,
	Ready(ViewHandle),
	Failed(ViewLoadError),
}

/// A view fetched on first use and cached afterwards.
///
/// At most one fetch is in flight at a time: callers arriving while a fetch is
/// pending are attached to it instead of starting another. A failed fetch is
/// retried by the next [`LazyView::load`].
pub struct LazyView {
	name: Arc<str>,
	fetch: Fetch,
	state: Mutex<LazyState>,
	fetches: AtomicUsize,
}

impl LazyView {
	pub fn new<F, Fut>(name: impl Into<Arc<str>>, fetch: F) -> Arc<Self>
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<ViewHandle, ViewLoadError>> + Send + 'static,
	{
		Arc::new(Self {
			name: name.into(),
			fetch: Box::new(move || Box::pin(fetch())),
			state: Mutex::new(LazyState::Idle),
			fetches: AtomicUsize::new(0),
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn status(&self) -> LazyStatus {
		match &*self.state.lock() {
			LazyState::Idle => LazyStatus::Idle,
			LazyState::Loading { .. } => LazyStatus::Pending,
			LazyState::Ready(view) => LazyStatus::Ready(Arc::clone(view)),
			LazyState::Failed(err) => LazyStatus::Failed(err.clone()),
		}
	}

	/// Number of fetches started so far.
	pub fn fetch_count(&self) -> usize {
		self.fetches.load(Ordering::Relaxed)
	}

	/// Returns the view if it is loaded. Otherwise registers `on_done` to run
	/// when the pending fetch settles, starting the fetch if none is running.
	pub fn load<F>(self: &Arc<Self>, on_done: F) -> Option<ViewHandle>
	where
		F: FnOnce(&Result<ViewHandle, ViewLoadError>) + Send + 'static,
	{
		let start = {
			let mut state = self.state.lock();
			match &mut *state {
				LazyState::Ready(view) => return Some(Arc::clone(view)),
				LazyState::Loading { waiters } => {
					waiters.push(Box::new(on_done));
					false
				}
				LazyState::Idle | LazyState::Failed(_) => {
					*state = LazyState::Loading {
						waiters: vec![Box::new(on_done)],
					};
					true
				}
			}
		};

		if start {
			self.start_fetch();
		} else {
			tracing::trace!(view = %self.name, "router.lazy.join_in_flight");
		}
		None
	}

	fn start_fetch(self: &Arc<Self>) {
		let attempt = self.fetches.fetch_add(1, Ordering::Relaxed) + 1;
		tracing::debug!(view = %self.name, attempt, "router.lazy.fetch");
		let work = spawn(TaskClass::ViewChunk, (self.fetch)());
		let this = Arc::clone(self);
		spawn(TaskClass::ViewChunk, async move {
			let result = match work.await {
				Ok(result) => result,
				Err(err) => Err(ViewLoadError::Panicked {
					view: this.name.to_string(),
					message: join_error_panic_message(err).unwrap_or_else(|| "fetch task cancelled".to_string()),
				}),
			};
			this.complete(result);
		});
	}

	fn complete(&self, result: Result<ViewHandle, ViewLoadError>) {
		let waiters = {
			let mut state = self.state.lock();
			let next = match &result {
				Ok(view) => LazyState::Ready(Arc::clone(view)),
				Err(err) => LazyState::Failed(err.clone()),
			};
			match std::mem::replace(&mut *state, next) {
				LazyState::Loading { waiters } => waiters,
				_ => Vec::new(),
			}
		};

		match &result {
			Ok(_) => tracing::debug!(view = %self.name, waiters = waiters.len(), "router.lazy.ready"),
			Err(err) => tracing::warn!(view = %self.name, error = %err, "router.lazy.failed"),
		}
		for waiter in waiters {
			waiter(&result);
		}
	}
}

impl std::fmt::Debug for LazyView {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LazyView").field("name", &self.name).field("fetches", &self.fetch_count()).finish()
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use tokio::sync::{Notify, oneshot};
	use wayfinder_nav::NavigationEvent;

	use super::*;
	use crate::view::View;

	struct Static(&'static str);

	impl View for Static {
		fn name(&self) -> &str {
			self.0
		}

		fn render(&self, _location: &NavigationEvent) -> String {
			self.0.to_string()
		}
	}

	fn gated(gate: Arc<Notify>) -> Arc<LazyView> {
		LazyView::new("audits", move || {
			let gate = Arc::clone(&gate);
			async move {
				gate.notified().await;
				Ok::<_, ViewLoadError>(Arc::new(Static("audits")) as ViewHandle)
			}
		})
	}

	#[tokio::test]
	async fn concurrent_loads_share_one_fetch() {
		let gate = Arc::new(Notify::new());
		let lazy = gated(Arc::clone(&gate));
		let (tx1, rx1) = oneshot::channel();
		let (tx2, rx2) = oneshot::channel();

		assert!(lazy.load(move |r| drop(tx1.send(r.is_ok()))).is_none());
		assert!(lazy.load(move |r| drop(tx2.send(r.is_ok()))).is_none());
		assert!(matches!(lazy.status(), LazyStatus::Pending));

		gate.notify_one();
		assert_eq!(rx1.await.ok(), Some(true));
		assert_eq!(rx2.await.ok(), Some(true));
		assert_eq!(lazy.fetch_count(), 1);
		assert!(lazy.load(|_| {}).is_some());
		assert_eq!(lazy.fetch_count(), 1);
	}

	#[tokio::test]
	async fn failed_fetch_is_retried_on_next_load() {
		let attempts = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&attempts);
		let lazy = LazyView::new("flaky", move || {
			let n = counter.fetch_add(1, Ordering::SeqCst);
			async move {
				if n == 0 {
					Err(ViewLoadError::Chunk {
						view: "flaky".into(),
						reason: "connection reset".into(),
					})
				} else {
					Ok(Arc::new(Static("flaky")) as ViewHandle)
				}
			}
		});

		let (tx, rx) = oneshot::channel();
		lazy.load(move |r| drop(tx.send(r.is_err())));
		assert_eq!(rx.await.ok(), Some(true));
		assert!(matches!(lazy.status(), LazyStatus::Failed(_)));

		let (tx, rx) = oneshot::channel();
		lazy.load(move |r| drop(tx.send(r.is_ok())));
		assert_eq!(rx.await.ok(), Some(true));
		assert_eq!(lazy.fetch_count(), 2);
	}

	#[tokio::test]
	async fn panicking_fetch_settles_as_failure() {
		let lazy = LazyView::new("broken", || async {
			tokio::time::sleep(Duration::from_millis(1)).await;
			let explode = true;
			if explode {
				panic!("chunk exploded");
			}
			Ok::<_, ViewLoadError>(Arc::new(Static("broken")) as ViewHandle)
		});
		let (tx, rx) = oneshot::channel();
		lazy.load(move |r: &Result<ViewHandle, ViewLoadError>| drop(tx.send(r.as_ref().err().map(ToString::to_string))));
		let message = rx.await.ok().flatten().unwrap_or_default();
		assert!(message.contains("chunk exploded"), "got: {message}");
	}
}
