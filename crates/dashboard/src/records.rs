//! In-memory record service backing the dashboard forms.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use wayfinder_loader::{FetchError, RecordId, RecordSource};

/// The record collections the dashboard manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
	Audit,
	Vendor,
	User,
	Policy,
}

impl RecordKind {
	pub const ALL: [RecordKind; 4] = [RecordKind::Audit, RecordKind::Vendor, RecordKind::User, RecordKind::Policy];

	/// Singular noun used in form titles.
	pub const fn noun(self) -> &'static str {
		match self {
			Self::Audit => "audit",
			Self::Vendor => "vendor",
			Self::User => "user",
			Self::Policy => "policy",
		}
	}

	/// Path segment of the screen listing this kind.
	pub const fn segment(self) -> &'static str {
		match self {
			Self::Audit => "audits",
			Self::Vendor => "vendors",
			Self::User => "users",
			Self::Policy => "policies",
		}
	}

	pub const fn plural_title(self) -> &'static str {
		match self {
			Self::Audit => "Audits",
			Self::Vendor => "Vendors",
			Self::User => "Users",
			Self::Policy => "Policies",
		}
	}
}

impl fmt::Display for RecordKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.noun())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
	pub kind: RecordKind,
	pub id: RecordId,
	pub name: String,
	pub status: String,
}

impl fmt::Display for Record {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{} {} ({})", self.id, self.name, self.status)
	}
}

/// Shared store of every record, with an artificial per-request latency.
#[derive(Debug)]
pub struct RecordService {
	records: RwLock<BTreeMap<(RecordKind, String), Record>>,
	latency: Duration,
}

impl RecordService {
	pub fn new(latency: Duration) -> Self {
		Self {
			records: RwLock::new(BTreeMap::new()),
			latency,
		}
	}

	/// A service pre-filled with a few records of every kind.
	pub fn seeded(latency: Duration) -> Self {
		let service = Self::new(latency);
		let seed: [(RecordKind, &str, &str, &str); 10] = [
			(RecordKind::Audit, "1", "Q1 access review", "in progress"),
			(RecordKind::Audit, "2", "SOC 2 readiness", "planned"),
			(RecordKind::Vendor, "1", "Acme Supplies", "active"),
			(RecordKind::Vendor, "2", "Globex Hosting", "under review"),
			(RecordKind::Vendor, "3", "Initech Payroll", "offboarded"),
			(RecordKind::User, "1", "Dana Reyes", "admin"),
			(RecordKind::User, "2", "Sam Okafor", "auditor"),
			(RecordKind::Policy, "1", "Acceptable use", "published"),
			(RecordKind::Policy, "2", "Incident response", "draft"),
			(RecordKind::Policy, "3", "Data retention", "published"),
		];
		for (kind, id, name, status) in seed {
			service.insert(Record {
				kind,
				id: RecordId::from(id),
				name: name.to_string(),
				status: status.to_string(),
			});
		}
		service
	}

	/// Inserts or replaces a record.
	pub fn insert(&self, record: Record) {
		let key = (record.kind, record.id.as_str().to_string());
		self.records.write().insert(key, record);
	}

	/// Records of `kind`, ordered by id.
	pub fn list(&self, kind: RecordKind) -> Vec<Record> {
		self.records.read().values().filter(|r| r.kind == kind).cloned().collect()
	}

	pub fn count(&self, kind: RecordKind) -> usize {
		self.records.read().keys().filter(|(k, _)| *k == kind).count()
	}

	pub async fn get(&self, kind: RecordKind, id: &RecordId) -> Result<Record, FetchError> {
		if !self.latency.is_zero() {
			tokio::time::sleep(self.latency).await;
		}
		let found = self.records.read().get(&(kind, id.as_str().to_string())).cloned();
		tracing::debug!(%kind, %id, found = found.is_some(), "dashboard.records.get");
		found.ok_or_else(|| FetchError::NotFound(id.clone()))
	}
}

/// The slice of a [`RecordService`] one form edits.
#[derive(Debug, Clone)]
pub struct KindSource {
	kind: RecordKind,
	service: Arc<RecordService>,
}

impl KindSource {
	pub fn new(kind: RecordKind, service: Arc<RecordService>) -> Self {
		Self { kind, service }
	}
}

#[async_trait]
impl RecordSource for KindSource {
	type Record = Record;

	async fn fetch(&self, id: &RecordId) -> Result<Record, FetchError> {
		self.service.get(self.kind, id).await
	}
}
