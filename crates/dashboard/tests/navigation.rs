//! End-to-end navigation: bus, outlet, and id-bound loading together.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use tokio::sync::Notify;
use wayfinder_dashboard::{App, DashboardConfig, Step};
use wayfinder_loader::{Action, FetchError, IdBoundViewLoader, RecordId, RecordSource};
use wayfinder_nav::{History, NavigationBus, NavigationEvent};
use wayfinder_router::{FrameKind, Outlet, RouteTable, View, ViewHandle};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn wait_until(what: &str, mut done: impl FnMut() -> bool) {
	let polled = tokio::time::timeout(TIMEOUT, async {
		while !done() {
			tokio::time::sleep(Duration::from_millis(1)).await;
		}
	})
	.await;
	assert!(polled.is_ok(), "timed out waiting for {what}");
}

/// Fetches park until the test releases their id.
#[derive(Default)]
struct GatedSource {
	gates: Mutex<HashMap<String, Arc<Notify>>>,
	calls: Mutex<Vec<String>>,
}

impl GatedSource {
	fn gate(&self, id: &str) -> Arc<Notify> {
		Arc::clone(self.gates.lock().entry(id.to_string()).or_default())
	}

	fn release(&self, id: &str) {
		self.gate(id).notify_one();
	}
}

#[async_trait]
impl RecordSource for GatedSource {
	type Record = String;

	async fn fetch(&self, id: &RecordId) -> Result<String, FetchError> {
		self.calls.lock().push(id.to_string());
		self.gate(id.as_str()).notified().await;
		Ok(format!("record {id}"))
	}
}

struct Labeled(&'static str);

impl View for Labeled {
	fn name(&self) -> &str {
		self.0
	}

	fn render(&self, _location: &NavigationEvent) -> String {
		self.0.to_string()
	}
}

/// A screen whose record follows the `id` query parameter.
struct BoundView {
	loader: IdBoundViewLoader<GatedSource>,
}

impl View for BoundView {
	fn name(&self) -> &str {
		"view-a"
	}

	fn render(&self, _location: &NavigationEvent) -> String {
		let model = self.loader.model();
		format!("view-a {:?}", model.record)
	}

	fn mount(&self, bus: &NavigationBus) {
		self.loader.attach(bus);
	}

	fn unmount(&self) {
		self.loader.detach();
	}
}

#[tokio::test]
async fn outlet_and_loader_follow_one_navigation_stream() {
	let source = Arc::new(GatedSource::default());
	let view_a = Arc::new(BoundView {
		loader: IdBoundViewLoader::from_shared("id", Arc::clone(&source)),
	});
	let table = RouteTable::builder()
		.eager("/", "Dashboard", Arc::new(Labeled("dashboard")))
		.eager("/a", "View A", Arc::clone(&view_a) as ViewHandle)
		.build()
		.unwrap();

	let bus = NavigationBus::new(Arc::new(History::new("/").unwrap()));
	let outlet = Outlet::new(Arc::new(table), &bus);
	assert_eq!(outlet.render(), "dashboard");

	bus.navigate("/a/").unwrap();
	assert_eq!(outlet.frame().map(|f| f.title().to_string()).as_deref(), Some("View A"));
	assert!(view_a.loader.is_attached());

	bus.navigate("/missing").unwrap();
	let frame = outlet.frame().unwrap();
	assert_eq!(frame.kind(), FrameKind::NotFound);
	assert_eq!(frame.render(), "not found: /missing");
	assert!(!view_a.loader.is_attached());

	bus.navigate("/a").unwrap();
	let before = bus.delivered();
	bus.navigate("/a?id=3").unwrap();
	bus.navigate("/a?id=4").unwrap();
	assert_eq!(bus.delivered() - before, 2);
	assert_eq!(view_a.loader.last_action(), Some(Action::LoadNew(RecordId::from("4"))));

	wait_until("both fetches to start", || source.calls.lock().len() == 2).await;
	source.release("4");
	wait_until("record 4", || view_a.loader.model().record.is_some()).await;
	source.release("3");
	wait_until("late 3 to be discarded", || view_a.loader.stale_discards() == 1).await;

	let model = view_a.loader.model();
	assert_eq!(model.id, Some(RecordId::from("4")));
	assert_eq!(model.record.as_deref(), Some("record 4"));
	assert_eq!(outlet.render(), "view-a Some(\"record 4\")");
}

#[tokio::test]
async fn navigations_are_observed_in_order() {
	let app = App::new(&DashboardConfig::default()).unwrap();
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&seen);
	let _subscription = app.bus().observe(move |event| sink.lock().push(event.to_string()));

	for url in ["/audits", "/vendors?page=2", "/users"] {
		app.apply(&Step::Push(url.to_string())).await.unwrap();
	}
	app.apply(&Step::Back).await.unwrap();

	assert_eq!(*seen.lock(), ["/", "/audits", "/vendors?page=2", "/users", "/vendors?page=2"]);
}

async fn idle(app: &App) {
	wait_until("dashboard to settle", || !app.is_busy()).await;
}

#[tokio::test]
async fn vendor_form_switches_between_create_and_edit() {
	let app = App::new(&DashboardConfig::default()).unwrap();
	assert!(app.render().contains("Dashboard"));

	app.apply(&Step::Push("/vendors/add".to_string())).await.unwrap();
	idle(&app).await;
	let screen = app.render();
	assert!(screen.starts_with("[Dashboard › Vendors › New vendor]  /vendors/add"), "{screen}");
	assert!(screen.contains("New vendor"), "{screen}");

	app.apply(&Step::Push("/vendors/edit?id=2".to_string())).await.unwrap();
	idle(&app).await;
	let screen = app.render();
	assert!(screen.contains("Edit vendor #2"), "{screen}");
	assert!(screen.contains("Globex Hosting"), "{screen}");

	app.apply(&Step::Push("/vendors/edit?id=9".to_string())).await.unwrap();
	idle(&app).await;
	let screen = app.render();
	assert!(screen.contains("error: record 9 not found"), "{screen}");
	assert!(!screen.contains("Globex"), "{screen}");

	app.apply(&Step::Dismiss).await.unwrap();
	assert!(!app.render().contains("error:"));

	app.apply(&Step::Back).await.unwrap();
	idle(&app).await;
	assert!(app.render().contains("Globex Hosting"));
}

#[tokio::test]
async fn lazy_screens_show_placeholder_until_loaded() {
	let config = DashboardConfig {
		lazy_latency_ms: 20,
		..DashboardConfig::default()
	};
	let app = App::new(&config).unwrap();

	app.apply(&Step::Push("/policies".to_string())).await.unwrap();
	assert_eq!(app.outlet().frame().map(|f| f.kind()), Some(FrameKind::Placeholder));
	assert!(app.render().ends_with("loading…"));

	app.apply(&Step::Wait(Duration::from_millis(40))).await.unwrap();
	idle(&app).await;
	let screen = app.render();
	assert!(screen.contains("Data retention"), "{screen}");
}

#[tokio::test]
async fn unknown_paths_render_not_found() {
	let app = App::new(&DashboardConfig::default()).unwrap();
	app.apply(&Step::Push("/nowhere/".to_string())).await.unwrap();
	assert!(app.render().ends_with("not found: /nowhere/"));
	assert_eq!(app.breadcrumb().render(), "Dashboard › nowhere");
}

#[tokio::test]
async fn cross_origin_push_is_rejected() {
	let app = App::new(&DashboardConfig::default()).unwrap();
	assert!(app.apply(&Step::Push("https://example.com/".to_string())).await.is_err());
	assert_eq!(app.bus().current().map(|e| e.to_string()).as_deref(), Some("/"));
}
