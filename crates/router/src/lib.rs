//! Route table and outlet for the dashboard.
//!
//! The table maps exact, normalized pathnames to [`ViewDescriptor`]s. The
//! [`Outlet`] subscribes to a [`NavigationBus`](wayfinder_nav::NavigationBus)
//! and re-resolves on every event.

mod error;
mod lazy;
mod outlet;
mod path;
mod table;
mod view;

pub use error::{RouteTableError, ViewLoadError};
pub use lazy::{LazyStatus, LazyView};
pub use outlet::{Frame, FrameKind, Outlet};
pub use path::normalize;
pub use table::{RouteEntry, RouteTable, RouteTableBuilder, ViewDescriptor, ViewSource};
pub use view::{NotFoundView, PlaceholderView, View, ViewHandle, same_view};
