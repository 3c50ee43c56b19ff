use std::panic::panic_any;

use super::join_error_panic_message;
use crate::{TaskClass, spawn};

#[tokio::test]
async fn panicking_fetch_reports_its_message() {
	let handle = spawn(TaskClass::ViewChunk, async {
		let chunk = "vendors";
		if !chunk.is_empty() {
			panic!("chunk {chunk} failed to evaluate");
		}
	});
	let err = handle.await.unwrap_err();
	assert_eq!(join_error_panic_message(err).as_deref(), Some("chunk vendors failed to evaluate"));
}

#[tokio::test]
async fn literal_payload_is_reported_verbatim() {
	let handle = spawn(TaskClass::Interactive, async {
		let gone = true;
		if gone {
			panic!("record source gone");
		}
	});
	let err = handle.await.unwrap_err();
	assert_eq!(join_error_panic_message(err).as_deref(), Some("record source gone"));
}

#[tokio::test]
async fn non_string_payload_has_no_message() {
	let handle = spawn(TaskClass::Interactive, async {
		let status = 503_u16;
		if status >= 500 {
			panic_any(status);
		}
	});
	let err = handle.await.unwrap_err();
	assert!(err.is_panic());
	assert_eq!(join_error_panic_message(err), None);
}

#[tokio::test]
async fn aborted_fetch_has_no_message() {
	let gate = std::sync::Arc::new(tokio::sync::Notify::new());
	let wait = std::sync::Arc::clone(&gate);
	let handle = spawn(TaskClass::Interactive, async move { wait.notified().await });
	handle.abort();
	let err = handle.await.unwrap_err();
	assert!(err.is_cancelled());
	assert_eq!(join_error_panic_message(err), None);
}
