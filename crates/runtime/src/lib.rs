//! Tokio driver for the herald notification center.
//!
//! Wraps a [`herald_center::NotificationCenter`] in a single actor task that
//! serializes every mutation, and schedules the two one-shot timers each
//! entry needs: auto-expiry (creation to closing) and the removal grace
//! delay (closing to deletion). Producers hold a cloneable [`Notifier`] and
//! never need a reply: ids are pre-assigned from the center's shared
//! allocator, so [`Notifier::notify`] is synchronous and usable from any
//! task, callback, or completion handler.
//!
//! Timer firings re-enter the same mailbox as caller commands, so a timer
//! that outlives its entry (early dismissal, capacity eviction) lands on an
//! unknown id and is a guarded no-op.

mod driver;
mod handle;

pub use driver::Notifier;
pub use handle::NotificationHandle;
pub use herald_center::{
	CenterConfig, Notification, NotificationAction, NotificationEntry, NotificationId,
	NotificationPatch, Variant,
};
