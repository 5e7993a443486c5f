//! Bounded, time-aware notification state machine.
//!
//! This crate is the synchronous core of the herald notification system:
//! an ordered, capacity-bounded collection of [`NotificationEntry`] records
//! addressable by [`NotificationId`], with creation, patch-merge update,
//! dismissal, and guarded removal. It performs no I/O and schedules no
//! timers of its own; `herald-runtime` drives the time-based transitions.
//!
//! # Lifecycle
//!
//! An entry is created open, visible to subscribers in newest-first order.
//! Dismissing it (explicitly or via the runtime's expiry timer) flips
//! `open` to false and marks it pending removal; the removal itself is a
//! separate, idempotently scheduled step so a closing entry can still be
//! read and updated until the grace delay elapses.

mod center;
mod config;
mod ids;
mod notification;

pub use center::{NotificationCenter, SubscriberId};
pub use config::{
	CenterConfig, ConfigError, DEFAULT_CAPACITY, DEFAULT_DURATION_MS, DEFAULT_REMOVE_DELAY_MS,
};
pub use ids::{IdAllocator, NotificationId};
pub use notification::{
	Notification, NotificationAction, NotificationEntry, NotificationPatch, Variant,
};
