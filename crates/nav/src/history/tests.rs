use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

fn counting_listener(history: &History) -> Arc<AtomicUsize> {
	let count = Arc::new(AtomicUsize::new(0));
	let seen = Arc::clone(&count);
	history.add_popstate_listener(move |_| {
		seen.fetch_add(1, Ordering::SeqCst);
	});
	count
}

#[test]
fn push_and_replace_are_silent_without_interception() {
	let history = History::new("/").unwrap();
	let count = counting_listener(&history);

	history.push_state("/audits").unwrap();
	history.replace_state("/audits?page=2").unwrap();

	assert_eq!(count.load(Ordering::SeqCst), 0);
	assert_eq!(history.location().to_string(), "/audits?page=2");
	assert_eq!(history.len(), 2);
}

#[test]
fn traversal_dispatches_popstate() {
	let history = History::new("/").unwrap();
	history.push_state("/a").unwrap();
	let count = counting_listener(&history);

	assert!(history.back());
	assert_eq!(history.location().pathname(), "/");
	assert!(!history.back());
	assert!(history.forward());
	assert_eq!(history.location().pathname(), "/a");
	assert!(!history.forward());

	assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn push_after_back_truncates_forward_entries() {
	let history = History::new("/").unwrap();
	history.push_state("/a").unwrap();
	history.push_state("/b").unwrap();
	history.back();
	history.push_state("/c").unwrap();

	assert_eq!(history.len(), 3);
	assert_eq!(history.index(), 2);
	assert!(!history.forward());
	assert_eq!(history.location().pathname(), "/c");
}

#[test]
fn relative_targets_resolve_against_current_location() {
	let history = History::new("/vendors/add").unwrap();
	history.push_state("edit?id=7").unwrap();
	assert_eq!(history.location().to_string(), "/vendors/edit?id=7");
	history.push_state("?id=9").unwrap();
	assert_eq!(history.location().to_string(), "/vendors/edit?id=9");
}

#[test]
fn cross_origin_push_is_rejected() {
	let history = History::new("/").unwrap();
	let err = history.push_state("https://example.com/").unwrap_err();
	assert!(matches!(err, NavError::CrossOrigin { .. }));
	assert_eq!(history.len(), 1);
}

#[test]
fn removed_listener_is_not_invoked() {
	let history = History::new("/").unwrap();
	history.push_state("/a").unwrap();
	let count = Arc::new(AtomicUsize::new(0));
	let seen = Arc::clone(&count);
	let id = history.add_popstate_listener(move |_| {
		seen.fetch_add(1, Ordering::SeqCst);
	});
	assert!(history.remove_popstate_listener(id));
	assert!(!history.remove_popstate_listener(id));
	history.back();
	assert_eq!(count.load(Ordering::SeqCst), 0);
}
