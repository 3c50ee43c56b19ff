//! The dashboard's screens and the route table that maps them.
//!
//! `/` is registered eagerly; every other screen is fetched on first visit.
//! The add and edit entries of one record kind share a single lazily loaded
//! [`FormView`], so moving between them keeps the form mounted and leaves the
//! record reload to its [`IdBoundViewLoader`].

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use wayfinder_loader::{FormMode, IdBoundViewLoader};
use wayfinder_nav::{NavigationBus, NavigationEvent};
use wayfinder_router::{LazyView, RouteTable, RouteTableError, View, ViewHandle, ViewLoadError};

use crate::config::DashboardConfig;
use crate::records::{KindSource, RecordKind, RecordService};

/// Landing page: one line per record collection.
pub struct HomeView {
	service: Arc<RecordService>,
}

impl View for HomeView {
	fn name(&self) -> &str {
		"home"
	}

	fn render(&self, _location: &NavigationEvent) -> String {
		let mut out = String::from("Dashboard");
		for kind in RecordKind::ALL {
			let _ = write!(out, "\n  {:<10} {:>3}  /{}", kind.plural_title(), self.service.count(kind), kind.segment());
		}
		out.push_str("\n  Training        /training");
		out
	}
}

/// Table of every record of one kind.
pub struct ListView {
	kind: RecordKind,
	service: Arc<RecordService>,
}

impl View for ListView {
	fn name(&self) -> &str {
		self.kind.segment()
	}

	fn render(&self, _location: &NavigationEvent) -> String {
		let mut out = String::from(self.kind.plural_title());
		let records = self.service.list(self.kind);
		if records.is_empty() {
			out.push_str("\n  (none)");
		}
		for record in records {
			let _ = write!(out, "\n  {record}");
		}
		let _ = write!(out, "\n  + /{}/add", self.kind.segment());
		out
	}
}

pub struct TrainingView;

impl View for TrainingView {
	fn name(&self) -> &str {
		"training"
	}

	fn render(&self, _location: &NavigationEvent) -> String {
		"Training\n  Security awareness 2026   due 2026-12-01\n  Vendor risk basics        completed".to_string()
	}
}

/// Create/edit form for one record kind.
///
/// Mounting attaches the form's loader to the bus; unmounting detaches it, so
/// a form that is not on screen never fetches.
pub struct FormView {
	kind: RecordKind,
	loader: IdBoundViewLoader<KindSource>,
}

impl FormView {
	pub fn new(kind: RecordKind, id_param: &str, service: Arc<RecordService>) -> Self {
		Self {
			kind,
			loader: IdBoundViewLoader::with_key(id_param, KindSource::new(kind, service)),
		}
	}

	pub fn kind(&self) -> RecordKind {
		self.kind
	}

	pub fn loader(&self) -> &IdBoundViewLoader<KindSource> {
		&self.loader
	}

	/// Clears a fetch error the form is showing.
	pub fn dismiss_error(&self) {
		self.loader.dismiss_error();
	}

	/// True while the form is mounted and waiting for its record.
	pub fn is_loading(&self) -> bool {
		self.loader.is_attached() && self.loader.model().loading
	}
}

impl View for FormView {
	fn name(&self) -> &str {
		self.kind.noun()
	}

	fn render(&self, _location: &NavigationEvent) -> String {
		let model = self.loader.model();
		let mut out = match (&model.id, model.mode()) {
			(Some(id), FormMode::Edit) => format!("Edit {} #{id}", self.kind),
			_ => format!("New {}", self.kind),
		};
		if model.loading {
			out.push_str("\n  loading record…");
		} else if let Some(error) = &model.error {
			let _ = write!(out, "\n  error: {error}");
		} else {
			let (name, status) = model.record.as_ref().map(|r| (r.name.as_str(), r.status.as_str())).unwrap_or_default();
			let _ = write!(out, "\n  name:   {name}\n  status: {status}");
		}
		out
	}

	fn mount(&self, bus: &NavigationBus) {
		self.loader.attach(bus);
	}

	fn unmount(&self) {
		self.loader.detach();
	}
}

/// The built route table plus the forms it serves.
pub struct Screens {
	pub table: RouteTable,
	pub forms: Vec<Arc<FormView>>,
}

/// Wraps an already built view as a lazily fetched chunk.
fn chunk(name: &str, view: ViewHandle, latency: Duration) -> Arc<LazyView> {
	LazyView::new(name, move || {
		let view = Arc::clone(&view);
		async move {
			if !latency.is_zero() {
				tokio::time::sleep(latency).await;
			}
			Ok::<_, ViewLoadError>(view)
		}
	})
}

/// Builds every dashboard screen against `service`.
pub fn build(config: &DashboardConfig, service: &Arc<RecordService>) -> Result<Screens, RouteTableError> {
	let latency = config.lazy_latency();
	let home: ViewHandle = Arc::new(HomeView {
		service: Arc::clone(service),
	});
	let mut builder = RouteTable::builder().eager("/", "Dashboard", home);
	let mut forms = Vec::new();

	for kind in RecordKind::ALL {
		let segment = kind.segment();
		let list = chunk(
			segment,
			Arc::new(ListView {
				kind,
				service: Arc::clone(service),
			}),
			latency,
		);
		let form = Arc::new(FormView::new(kind, &config.id_param, Arc::clone(service)));
		let form_chunk = chunk(&format!("{segment}-form"), Arc::clone(&form) as ViewHandle, latency);
		forms.push(form);

		builder = builder
			.lazy(format!("/{segment}"), kind.plural_title(), &list)
			.lazy(format!("/{segment}/add"), format!("New {kind}"), &form_chunk)
			.lazy(format!("/{segment}/edit"), format!("Edit {kind}"), &form_chunk);
	}

	let training = chunk("training", Arc::new(TrainingView), latency);
	let table = builder.lazy("/training", "Training", &training).build()?;
	Ok(Screens { table, forms })
}
