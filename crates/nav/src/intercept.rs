use crate::history::{History, NativeEntry};

/// Decorates the push/replace entry points of `history` so that, after the
/// native navigation succeeds, they dispatch `popstate` like a traversal does.
///
/// Installation happens at most once per history; later calls see the patch
/// guard already set and leave the entry points alone. Returns true for the
/// call that installed the decoration.
pub fn install_interception(history: &History) -> bool {
	if !history.patch_guard().claim() {
		tracing::trace!("nav.intercept.already_installed");
		return false;
	}

	history.decorate_entry_points(|native| {
		NativeEntry::new(move |history, target| {
			native.call(history, target)?;
			history.dispatch_popstate();
			Ok(())
		})
	});
	tracing::debug!("nav.intercept.installed");
	true
}
