//! Breadcrumb trail derived from the current pathname.

use std::sync::Arc;

use parking_lot::Mutex;
use wayfinder_nav::{NavigationBus, Subscription};
use wayfinder_router::{RouteTable, normalize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
	pub path: String,
	pub title: String,
}

/// Crumbs for every prefix of `pathname`, starting at `/`.
///
/// Prefixes with a table entry use the entry's title; others fall back to the
/// raw segment.
pub fn trail(table: &RouteTable, pathname: &str) -> Vec<Crumb> {
	let path = normalize(pathname);
	let mut crumbs = vec![Crumb {
		path: "/".to_string(),
		title: table.title_for("/").unwrap_or("/").to_string(),
	}];

	let mut prefix = String::new();
	for segment in path.split('/').filter(|s| !s.is_empty()) {
		prefix.push('/');
		prefix.push_str(segment);
		let title = table.title_for(&prefix).unwrap_or(segment);
		crumbs.push(Crumb {
			path: prefix.clone(),
			title: title.to_string(),
		});
	}
	crumbs
}

/// Keeps a breadcrumb trail in step with the bus.
pub struct Breadcrumb {
	crumbs: Arc<Mutex<Vec<Crumb>>>,
	_subscription: Subscription,
}

impl Breadcrumb {
	pub fn attach(table: Arc<RouteTable>, bus: &NavigationBus) -> Self {
		let crumbs = Arc::new(Mutex::new(Vec::new()));
		let sink = Arc::clone(&crumbs);
		let subscription = bus.observe(move |event| {
			*sink.lock() = trail(&table, event.pathname());
		});
		Self {
			crumbs,
			_subscription: subscription,
		}
	}

	pub fn crumbs(&self) -> Vec<Crumb> {
		self.crumbs.lock().clone()
	}

	pub fn render(&self) -> String {
		let crumbs = self.crumbs.lock();
		let titles: Vec<&str> = crumbs.iter().map(|c| c.title.as_str()).collect();
		titles.join(" › ")
	}
}
