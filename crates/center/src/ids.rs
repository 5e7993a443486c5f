use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identifier for a tracked notification entry.
///
/// Stable for the entry's lifetime and unique among all entries the owning
/// center has handed out while the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
	/// Returns the raw id value.
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for NotificationId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Shared monotonic id source, starting at 1.
///
/// Clones hand out ids from the same counter, so producers that pre-assign
/// an id (the runtime's fire-and-forget `notify`) can never collide with
/// ids assigned by the center itself.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
	next: Arc<AtomicU64>,
}

impl IdAllocator {
	/// Creates an allocator whose first id is 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next id.
	pub fn next_id(&self) -> NotificationId {
		NotificationId(self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ids_start_at_one_and_increase() {
		let ids = IdAllocator::new();
		assert_eq!(ids.next_id().get(), 1);
		assert_eq!(ids.next_id().get(), 2);
		assert_eq!(ids.next_id().get(), 3);
	}

	#[test]
	fn clones_share_the_counter() {
		let ids = IdAllocator::new();
		let other = ids.clone();
		let a = ids.next_id();
		let b = other.next_id();
		assert_ne!(a, b);
	}
}
