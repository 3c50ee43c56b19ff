//! Navigation core for the dashboard.
//!
//! * [`History`]: the page's session history, with swappable native entry points
//! * [`install_interception`]: one-time decoration making programmatic navigation observable
//! * [`NavigationBus`]: one ordered stream of [`NavigationEvent`]s per page

mod bus;
mod error;
mod event;
mod guard;
mod history;
mod intercept;

pub use bus::{NavigationBus, Subscription, SubscriptionId};
pub use error::{NavError, Result};
pub use event::{NavigationEvent, query_param};
pub use guard::PatchGuard;
pub use history::{History, ListenerId, NativeEntry};
pub use intercept::install_interception;
