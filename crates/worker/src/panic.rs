use tokio::task::JoinError;

/// Extracts the panic payload message from a failed task, if it panicked.
///
/// Returns `None` for cancelled tasks and for payloads that are neither
/// `&'static str` nor `String`.
pub fn join_error_panic_message(err: JoinError) -> Option<String> {
	let payload = err.try_into_panic().ok()?;
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		return Some((*msg).to_string());
	}
	payload.downcast_ref::<String>().cloned()
}

#[cfg(test)]
mod tests;
