//! Wires history, bus, outlet, and breadcrumb into one dashboard page.

use std::sync::Arc;

use thiserror::Error;
use wayfinder_nav::{History, NavError, NavigationBus};
use wayfinder_router::{FrameKind, Outlet, RouteTableError};

use crate::breadcrumb::Breadcrumb;
use crate::config::DashboardConfig;
use crate::records::RecordService;
use crate::screens::{self, FormView};
use crate::script::Step;

/// Upper bound on scheduler yields while waiting for zero-latency work.
const SETTLE_ROUNDS: usize = 16;

/// Errors raised while assembling or driving the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
	#[error(transparent)]
	Routes(#[from] RouteTableError),

	#[error(transparent)]
	Nav(#[from] NavError),
}

pub struct App {
	bus: NavigationBus,
	service: Arc<RecordService>,
	forms: Vec<Arc<FormView>>,
	breadcrumb: Breadcrumb,
	outlet: Outlet,
}

impl App {
	/// Builds the page at `config.initial_path`. The outlet resolves the
	/// initial location immediately; must be called inside a tokio runtime so
	/// lazy screens load on it.
	pub fn new(config: &DashboardConfig) -> Result<Self, AppError> {
		let history = Arc::new(History::new(&config.initial_path)?);
		let bus = NavigationBus::new(history);
		let service = Arc::new(RecordService::seeded(config.fetch_latency()));
		let screens = screens::build(config, &service)?;
		let table = Arc::new(screens.table);

		let breadcrumb = Breadcrumb::attach(Arc::clone(&table), &bus);
		let outlet = Outlet::new(table, &bus);
		tracing::info!(initial = %config.initial_path, routes = outlet.table().len(), "dashboard.ready");

		Ok(Self {
			bus,
			service,
			forms: screens.forms,
			breadcrumb,
			outlet,
		})
	}

	pub fn bus(&self) -> &NavigationBus {
		&self.bus
	}

	pub fn outlet(&self) -> &Outlet {
		&self.outlet
	}

	pub fn service(&self) -> &Arc<RecordService> {
		&self.service
	}

	pub fn breadcrumb(&self) -> &Breadcrumb {
		&self.breadcrumb
	}

	/// Runs one script step, then lets zero-latency work spawned by it settle.
	pub async fn apply(&self, step: &Step) -> Result<(), AppError> {
		tracing::debug!(%step, "dashboard.step");
		match step {
			Step::Push(url) => self.bus.navigate(url)?,
			Step::Replace(url) => self.bus.redirect(url)?,
			Step::Back => {
				if !self.bus.back()? {
					tracing::info!("already at the oldest entry");
				}
			}
			Step::Forward => {
				if !self.bus.forward()? {
					tracing::info!("already at the newest entry");
				}
			}
			Step::Wait(duration) => tokio::time::sleep(*duration).await,
			Step::Dismiss => self.forms.iter().for_each(|form| form.dismiss_error()),
			Step::Show => {}
		}
		self.settle().await;
		Ok(())
	}

	/// True while a lazy screen or a form record is still loading.
	pub fn is_busy(&self) -> bool {
		let placeholder = self.outlet.frame().is_some_and(|frame| frame.kind() == FrameKind::Placeholder);
		placeholder || self.forms.iter().any(|form| form.is_loading())
	}

	async fn settle(&self) {
		for _ in 0..SETTLE_ROUNDS {
			if !self.is_busy() {
				break;
			}
			tokio::task::yield_now().await;
		}
	}

	/// Breadcrumb line, current location, and the rendered frame.
	pub fn render(&self) -> String {
		let location = self.bus.current().map(|event| event.to_string()).unwrap_or_default();
		format!("[{}]  {location}\n{}", self.breadcrumb.render(), self.outlet.render())
	}
}
