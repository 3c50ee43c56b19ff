//! Id-bound record loading for edit forms.
//!
//! Forms that edit an existing record read their target id through an
//! [`IdBoundViewLoader`] instead of parsing the query string once at mount
//! time, so in-place navigation from "add" to "edit id=7" (or from id 7 to
//! id 9) reloads the record and never shows one id's data under another.

mod action;
mod loader;
mod model;
mod source;

pub use action::{Action, RecordId, id_from_search, sync};
pub use loader::{DEFAULT_ID_KEY, IdBoundViewLoader};
pub use model::{FormMode, ViewModel};
pub use source::{FetchError, RecordSource};
