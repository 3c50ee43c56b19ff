use crate::action::RecordId;

/// Whether a bound form is creating a new record or editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
	Create,
	Edit,
}

/// State a bound view renders from.
///
/// `record` is only ever the record for `id`; while a new id loads, or after
/// its fetch failed, `record` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel<R> {
	pub id: Option<RecordId>,
	pub record: Option<R>,
	pub loading: bool,
	pub error: Option<String>,
}

impl<R> ViewModel<R> {
	/// Blank create-mode state.
	pub fn create() -> Self {
		Self {
			id: None,
			record: None,
			loading: false,
			error: None,
		}
	}

	pub(crate) fn loading(id: RecordId) -> Self {
		Self {
			id: Some(id),
			record: None,
			loading: true,
			error: None,
		}
	}

	pub fn mode(&self) -> FormMode {
		if self.id.is_some() { FormMode::Edit } else { FormMode::Create }
	}
}

impl<R> Default for ViewModel<R> {
	fn default() -> Self {
		Self::create()
	}
}
