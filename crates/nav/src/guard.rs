use std::sync::atomic::{AtomicBool, Ordering};

/// One-shot flag guarding installation of the navigation interception.
///
/// Starts unset; [`PatchGuard::claim`] flips it exactly once and it is never
/// reset for the lifetime of the owning page.
#[derive(Debug, Default)]
pub struct PatchGuard {
	set: AtomicBool,
}

impl PatchGuard {
	pub const fn new() -> Self {
		Self { set: AtomicBool::new(false) }
	}

	/// Returns true for the single caller that flips the flag.
	pub fn claim(&self) -> bool {
		self.set.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
	}

	pub fn is_set(&self) -> bool {
		self.set.load(Ordering::Acquire)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_first_claim_wins() {
		let guard = PatchGuard::new();
		assert!(!guard.is_set());
		assert!(guard.claim());
		assert!(!guard.claim());
		assert!(!guard.claim());
		assert!(guard.is_set());
	}
}
