use std::collections::HashSet;
use std::fmt;

use crate::config::CenterConfig;
use crate::ids::{IdAllocator, NotificationId};
use crate::notification::{Notification, NotificationEntry, NotificationPatch};

/// Token returned by [`NotificationCenter::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Subscriber = Box<dyn FnMut(&[NotificationEntry]) + Send>;

/// Mutation applied to the entry collection.
///
/// Public operations fold into this tagged dispatch; keeping it private
/// leaves `push`/`update`/`dismiss`/`remove` as the only mutation entry
/// points.
enum Action {
	Push(NotificationEntry),
	Update {
		id: NotificationId,
		patch: NotificationPatch,
	},
	Dismiss {
		id: Option<NotificationId>,
	},
	Remove {
		id: Option<NotificationId>,
	},
}

/// Bounded, ordered collection of notification entries.
///
/// Entries are kept newest-first. The center owns the only two pieces of
/// shared mutable state in the system: the entry list and the set of ids
/// whose removal has already been scheduled. It never performs I/O and none
/// of its operations can fail; references to unknown ids are silent no-ops.
pub struct NotificationCenter {
	config: CenterConfig,
	ids: IdAllocator,
	/// Newest first; eviction pops from the tail.
	entries: Vec<NotificationEntry>,
	/// Ids with a removal already scheduled, so a second dismiss of the
	/// same entry never schedules a second timer.
	pending_removal: HashSet<NotificationId>,
	subscribers: Vec<(SubscriberId, Subscriber)>,
	next_subscriber: u64,
}

impl Default for NotificationCenter {
	fn default() -> Self {
		Self::new(CenterConfig::default())
	}
}

impl NotificationCenter {
	/// Creates an empty center. A zero capacity is treated as 1.
	pub fn new(mut config: CenterConfig) -> Self {
		config.capacity = config.capacity.max(1);
		Self {
			config,
			ids: IdAllocator::new(),
			entries: Vec::new(),
			pending_removal: HashSet::new(),
			subscribers: Vec::new(),
			next_subscriber: 0,
		}
	}

	/// Returns the active configuration.
	pub fn config(&self) -> &CenterConfig {
		&self.config
	}

	/// Returns a clone of the id source, for producers that assign ids
	/// before reaching the center.
	pub fn ids(&self) -> IdAllocator {
		self.ids.clone()
	}

	/// Current entries, newest first. Includes closing entries that have
	/// not yet been removed.
	pub fn entries(&self) -> &[NotificationEntry] {
		&self.entries
	}

	/// Looks up a tracked entry.
	pub fn get(&self, id: NotificationId) -> Option<&NotificationEntry> {
		self.entries.iter().find(|entry| entry.id == id)
	}

	/// Number of tracked entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true when no entries are tracked.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Enqueues a new open entry and returns its id.
	///
	/// The entry is prepended; anything beyond capacity is evicted from the
	/// oldest end.
	pub fn push(&mut self, notification: Notification) -> NotificationId {
		let id = self.ids.next_id();
		self.insert(id, notification);
		id
	}

	/// Enqueues a new open entry under a pre-assigned id.
	///
	/// The id must come from this center's [`IdAllocator`] for the
	/// uniqueness invariant to hold.
	pub fn insert(&mut self, id: NotificationId, notification: Notification) {
		let entry =
			NotificationEntry::from_request(id, notification, self.config.default_duration());
		tracing::debug!(id = id.get(), "center.push");
		self.apply(Action::Push(entry));
	}

	/// Shallow-merges `patch` into the entry, preserving unspecified
	/// fields. Unknown ids are ignored. Never reschedules the expiry timer.
	pub fn update(&mut self, id: NotificationId, patch: NotificationPatch) {
		self.apply(Action::Update { id, patch });
	}

	/// Begins the closing transition for one entry.
	///
	/// Returns the ids whose removal became newly scheduled: the caller is
	/// expected to arrange one removal per returned id after the grace
	/// delay. Dismissing an unknown or already-closing entry returns
	/// nothing, so removal scheduling stays idempotent.
	pub fn dismiss(&mut self, id: NotificationId) -> Vec<NotificationId> {
		self.apply(Action::Dismiss { id: Some(id) })
	}

	/// Begins the closing transition for every tracked entry.
	///
	/// Same return contract as [`Self::dismiss`].
	pub fn dismiss_all(&mut self) -> Vec<NotificationId> {
		self.apply(Action::Dismiss { id: None })
	}

	/// Permanently deletes an entry. Unknown ids are ignored.
	pub fn remove(&mut self, id: NotificationId) {
		self.apply(Action::Remove { id: Some(id) });
	}

	/// Permanently deletes every entry, scheduled or not.
	pub fn remove_all(&mut self) {
		self.apply(Action::Remove { id: None });
	}

	/// Registers an observer invoked synchronously with the newest-first
	/// entry list after every effective mutation.
	pub fn subscribe(
		&mut self,
		subscriber: impl FnMut(&[NotificationEntry]) + Send + 'static,
	) -> SubscriberId {
		let id = SubscriberId(self.next_subscriber);
		self.next_subscriber += 1;
		self.subscribers.push((id, Box::new(subscriber)));
		id
	}

	/// Drops a previously registered observer.
	pub fn unsubscribe(&mut self, id: SubscriberId) {
		self.subscribers.retain(|(sid, _)| *sid != id);
	}

	/// Folds one action into the collection and publishes to subscribers
	/// when the state changed. Returns ids whose removal became newly
	/// scheduled (non-empty only for dismissals).
	fn apply(&mut self, action: Action) -> Vec<NotificationId> {
		let mut scheduled = Vec::new();
		match action {
			Action::Push(entry) => {
				self.entries.insert(0, entry);
				while self.entries.len() > self.config.capacity {
					if let Some(evicted) = self.entries.pop() {
						self.pending_removal.remove(&evicted.id);
						tracing::debug!(id = evicted.id.get(), "center.evict");
					}
				}
			}
			Action::Update { id, patch } => {
				let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
					tracing::trace!(id = id.get(), "center.update_unknown");
					return scheduled;
				};
				entry.apply(patch);
				tracing::trace!(id = id.get(), "center.update");
			}
			Action::Dismiss { id: Some(id) } => {
				let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
					tracing::trace!(id = id.get(), "center.dismiss_unknown");
					return scheduled;
				};
				entry.open = false;
				if self.pending_removal.insert(id) {
					scheduled.push(id);
				}
				tracing::debug!(id = id.get(), "center.dismiss");
			}
			Action::Dismiss { id: None } => {
				if self.entries.is_empty() {
					return scheduled;
				}
				for entry in &mut self.entries {
					entry.open = false;
					if self.pending_removal.insert(entry.id) {
						scheduled.push(entry.id);
					}
				}
				tracing::debug!(count = self.entries.len(), "center.dismiss_all");
			}
			Action::Remove { id: Some(id) } => {
				let before = self.entries.len();
				self.entries.retain(|entry| entry.id != id);
				self.pending_removal.remove(&id);
				if self.entries.len() == before {
					tracing::trace!(id = id.get(), "center.remove_unknown");
					return scheduled;
				}
				tracing::debug!(id = id.get(), "center.remove");
			}
			Action::Remove { id: None } => {
				if self.entries.is_empty() {
					return scheduled;
				}
				self.entries.clear();
				self.pending_removal.clear();
				tracing::debug!("center.remove_all");
			}
		}
		self.publish();
		scheduled
	}

	fn publish(&mut self) {
		for (_, subscriber) in &mut self.subscribers {
			subscriber(&self.entries);
		}
	}
}

impl fmt::Debug for NotificationCenter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NotificationCenter")
			.field("entries", &self.entries)
			.field("pending_removal", &self.pending_removal)
			.field("subscribers", &self.subscribers.len())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{Arc, Mutex};
	use std::time::Duration;

	use pretty_assertions::assert_eq;

	use super::*;
	use crate::notification::Variant;

	fn center() -> NotificationCenter {
		NotificationCenter::default()
	}

	fn titled(title: &str) -> Notification {
		Notification::new().title(title)
	}

	fn titles(center: &NotificationCenter) -> Vec<String> {
		center
			.entries()
			.iter()
			.map(|entry| entry.title.clone().unwrap_or_default())
			.collect()
	}

	#[test]
	fn entries_are_ordered_newest_first() {
		let mut center = center();
		center.push(titled("A"));
		center.push(titled("B"));
		center.push(titled("C"));
		assert_eq!(titles(&center), ["C", "B", "A"]);
	}

	#[test]
	fn capacity_is_never_exceeded_and_oldest_is_evicted() {
		let mut center = center();
		for i in 0..6 {
			center.push(titled(&format!("n{i}")));
			assert!(center.len() <= 5);
		}
		assert_eq!(titles(&center), ["n5", "n4", "n3", "n2", "n1"]);
	}

	#[test]
	fn ids_are_unique_and_stable() {
		let mut center = center();
		let a = center.push(titled("a"));
		let b = center.push(titled("b"));
		assert_ne!(a, b);
		assert_eq!(center.get(a).unwrap().id, a);
		assert_eq!(center.get(b).unwrap().id, b);
	}

	#[test]
	fn push_applies_the_default_duration() {
		let mut center = center();
		let id = center.push(titled("x"));
		assert_eq!(center.get(id).unwrap().duration, Duration::from_millis(5_000));
	}

	#[test]
	fn push_respects_a_custom_duration() {
		let mut center = center();
		let id = center.push(titled("x").duration(Duration::from_millis(100)));
		assert_eq!(center.get(id).unwrap().duration, Duration::from_millis(100));
	}

	#[test]
	fn update_preserves_unspecified_fields() {
		let mut center = center();
		let id = center.push(titled("A").description("B"));
		center.update(id, NotificationPatch::new().description("C"));

		let entry = center.get(id).unwrap();
		assert_eq!(entry.title.as_deref(), Some("A"));
		assert_eq!(entry.description.as_deref(), Some("C"));
		assert_eq!(entry.variant, Variant::Default);
		assert!(entry.open);
	}

	#[test]
	fn update_can_replace_every_field() {
		let mut center = center();
		let id = center.push(titled("old"));
		center.update(
			id,
			NotificationPatch::new()
				.title("new")
				.description("details")
				.variant(Variant::Destructive)
				.duration(Duration::from_secs(9))
				.open(false),
		);

		let entry = center.get(id).unwrap();
		assert_eq!(entry.title.as_deref(), Some("new"));
		assert_eq!(entry.description.as_deref(), Some("details"));
		assert_eq!(entry.variant, Variant::Destructive);
		assert_eq!(entry.duration, Duration::from_secs(9));
		assert!(!entry.open);
	}

	#[test]
	fn update_with_unknown_id_changes_nothing() {
		let mut center = center();
		let id = center.push(titled("keep"));
		let stranger = center.ids().next_id();
		center.update(stranger, NotificationPatch::new().title("clobber"));

		assert_eq!(center.len(), 1);
		assert_eq!(center.get(id).unwrap().title.as_deref(), Some("keep"));
		assert!(center.get(stranger).is_none());
	}

	#[test]
	fn dismiss_closes_the_entry_but_keeps_it_tracked() {
		let mut center = center();
		let id = center.push(titled("x"));
		let scheduled = center.dismiss(id);

		assert_eq!(scheduled, [id]);
		let entry = center.get(id).unwrap();
		assert!(!entry.open);
	}

	#[test]
	fn second_dismiss_schedules_no_second_removal() {
		let mut center = center();
		let id = center.push(titled("x"));
		assert_eq!(center.dismiss(id), [id]);
		assert!(center.dismiss(id).is_empty());
	}

	#[test]
	fn dismiss_with_unknown_id_is_a_noop() {
		let mut center = center();
		center.push(titled("keep"));
		let stranger = center.ids().next_id();

		assert!(center.dismiss(stranger).is_empty());
		assert_eq!(center.len(), 1);
		assert!(center.entries()[0].open);
	}

	#[test]
	fn dismiss_all_closes_every_entry_once() {
		let mut center = center();
		let a = center.push(titled("a"));
		let b = center.push(titled("b"));
		let c = center.push(titled("c"));

		let mut scheduled = center.dismiss_all();
		scheduled.sort();
		assert_eq!(scheduled, [a, b, c]);
		assert!(center.entries().iter().all(|entry| !entry.open));

		// Entries already closing are not scheduled again.
		assert!(center.dismiss_all().is_empty());
	}

	#[test]
	fn remove_deletes_exactly_once() {
		let mut center = center();
		let id = center.push(titled("x"));
		center.dismiss(id);
		center.remove(id);
		assert!(center.is_empty());

		// A late duplicate removal finds nothing to delete.
		center.remove(id);
		assert!(center.is_empty());
	}

	#[test]
	fn remove_all_clears_the_collection() {
		let mut center = center();
		center.push(titled("a"));
		center.push(titled("b"));
		center.remove_all();
		assert!(center.is_empty());
	}

	#[test]
	fn evicting_a_closing_entry_forgets_its_pending_removal() {
		let mut center = center();
		let oldest = center.push(titled("n0"));
		center.dismiss(oldest);
		for i in 1..6 {
			center.push(titled(&format!("n{i}")));
		}
		assert!(center.get(oldest).is_none());

		// The removal timer for the evicted id fires later and finds nothing;
		// a fresh dismiss of the stale id schedules nothing either.
		center.remove(oldest);
		assert!(center.dismiss(oldest).is_empty());
		assert_eq!(center.len(), 5);
	}

	#[test]
	fn expiry_firing_after_removal_is_a_noop() {
		let mut center = center();
		let id = center.push(titled("x"));
		center.dismiss(id);
		center.remove(id);

		// The auto-expiry timer is never cancelled; its late firing maps to
		// a dismiss of an id that no longer exists.
		assert!(center.dismiss(id).is_empty());
		assert!(center.is_empty());
	}

	#[test]
	fn subscribers_observe_every_effective_mutation() {
		let mut center = center();
		let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
		let sink = Arc::clone(&seen);
		center.subscribe(move |entries| {
			let snapshot = entries
				.iter()
				.map(|entry| entry.title.clone().unwrap_or_default())
				.collect();
			sink.lock().unwrap().push(snapshot);
		});

		let id = center.push(titled("a"));
		center.push(titled("b"));
		center.dismiss(id);
		center.remove(id);

		let seen = seen.lock().unwrap();
		assert_eq!(
			*seen,
			vec![
				vec!["a".to_string()],
				vec!["b".to_string(), "a".to_string()],
				vec!["b".to_string(), "a".to_string()],
				vec!["b".to_string()],
			]
		);
	}

	#[test]
	fn noop_mutations_are_not_published() {
		let mut center = center();
		let stranger = center.ids().next_id();
		let calls = Arc::new(Mutex::new(0usize));
		let sink = Arc::clone(&calls);
		center.subscribe(move |_| *sink.lock().unwrap() += 1);

		center.update(stranger, NotificationPatch::new().title("x"));
		center.dismiss(stranger);
		center.remove(stranger);
		center.dismiss_all();
		center.remove_all();

		assert_eq!(*calls.lock().unwrap(), 0);
	}

	#[test]
	fn unsubscribe_stops_deliveries() {
		let mut center = center();
		let calls = Arc::new(Mutex::new(0usize));
		let sink = Arc::clone(&calls);
		let token = center.subscribe(move |_| *sink.lock().unwrap() += 1);

		center.push(titled("a"));
		center.unsubscribe(token);
		center.push(titled("b"));

		assert_eq!(*calls.lock().unwrap(), 1);
	}

	#[test]
	fn zero_capacity_is_clamped() {
		let mut center = NotificationCenter::new(CenterConfig {
			capacity: 0,
			..CenterConfig::default()
		});
		center.push(titled("x"));
		assert_eq!(center.len(), 1);
	}
}
