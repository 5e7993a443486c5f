use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::ids::NotificationId;

/// Display category of a notification.
///
/// Opaque to the center beyond storage and forwarding; presentation layers
/// decide what each variant looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Variant {
	/// Neutral informational notification (default).
	#[default]
	Default,
	/// Notification for a failed or destructive operation.
	Destructive,
}

/// Optional follow-up action attached to a notification.
///
/// A label plus an optional callback, forwarded unchanged; the center never
/// invokes the callback itself.
#[derive(Clone)]
pub struct NotificationAction {
	label: String,
	on_activate: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl NotificationAction {
	/// Creates an action with a label and no callback.
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			on_activate: None,
		}
	}

	/// Sets the callback invoked when the action is activated.
	#[must_use]
	pub fn on_activate(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
		self.on_activate = Some(Arc::new(callback));
		self
	}

	/// Returns the action label.
	pub fn label(&self) -> &str {
		&self.label
	}

	/// Invokes the callback, if one was attached.
	pub fn activate(&self) {
		if let Some(callback) = &self.on_activate {
			callback();
		}
	}
}

impl fmt::Debug for NotificationAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NotificationAction")
			.field("label", &self.label)
			.field("on_activate", &self.on_activate.is_some())
			.finish()
	}
}

/// Request payload for a new notification.
///
/// All fields are optional; empty payloads are accepted as-is since content
/// is a display-layer concern. Built with chained setters:
///
/// ```
/// use herald_center::{Notification, Variant};
///
/// let request = Notification::new()
/// 	.title("Upload failed")
/// 	.description("The file exceeds the size limit.")
/// 	.variant(Variant::Destructive);
/// assert_eq!(request.variant, Variant::Destructive);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Notification {
	pub title: Option<String>,
	pub description: Option<String>,
	pub variant: Variant,
	pub duration: Option<Duration>,
	pub action: Option<NotificationAction>,
}

impl Notification {
	/// Creates an empty request with the default variant.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the title.
	#[must_use]
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Sets the description.
	#[must_use]
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Sets the display variant.
	#[must_use]
	pub fn variant(mut self, variant: Variant) -> Self {
		self.variant = variant;
		self
	}

	/// Overrides the time-to-live before auto-dismissal.
	#[must_use]
	pub fn duration(mut self, duration: Duration) -> Self {
		self.duration = Some(duration);
		self
	}

	/// Attaches a follow-up action.
	#[must_use]
	pub fn action(mut self, action: NotificationAction) -> Self {
		self.action = Some(action);
		self
	}
}

/// Partial overwrite of an existing entry's fields.
///
/// Fields left `None` are preserved. Patching `duration` never reschedules
/// the expiry timer already running for the entry.
#[derive(Debug, Clone, Default)]
pub struct NotificationPatch {
	pub title: Option<String>,
	pub description: Option<String>,
	pub variant: Option<Variant>,
	pub duration: Option<Duration>,
	pub action: Option<NotificationAction>,
	pub open: Option<bool>,
}

impl NotificationPatch {
	/// Creates a patch that changes nothing.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overwrites the title.
	#[must_use]
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Overwrites the description.
	#[must_use]
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Overwrites the display variant.
	#[must_use]
	pub fn variant(mut self, variant: Variant) -> Self {
		self.variant = Some(variant);
		self
	}

	/// Overwrites the stored time-to-live.
	#[must_use]
	pub fn duration(mut self, duration: Duration) -> Self {
		self.duration = Some(duration);
		self
	}

	/// Overwrites the follow-up action.
	#[must_use]
	pub fn action(mut self, action: NotificationAction) -> Self {
		self.action = Some(action);
		self
	}

	/// Overwrites the open flag.
	#[must_use]
	pub fn open(mut self, open: bool) -> Self {
		self.open = Some(open);
		self
	}
}

/// One notification record tracked by a center.
#[derive(Debug, Clone)]
pub struct NotificationEntry {
	pub id: NotificationId,
	pub title: Option<String>,
	pub description: Option<String>,
	pub variant: Variant,
	pub action: Option<NotificationAction>,
	/// True while visible; false once the closing transition has begun.
	pub open: bool,
	/// Effective time-to-live from creation to auto-dismissal.
	pub duration: Duration,
	pub created_at: Instant,
}

impl NotificationEntry {
	pub(crate) fn from_request(
		id: NotificationId,
		notification: Notification,
		default_duration: Duration,
	) -> Self {
		Self {
			id,
			title: notification.title,
			description: notification.description,
			variant: notification.variant,
			action: notification.action,
			open: true,
			duration: notification.duration.unwrap_or(default_duration),
			created_at: Instant::now(),
		}
	}

	/// Shallow-merges the patch, keeping unspecified fields.
	pub(crate) fn apply(&mut self, patch: NotificationPatch) {
		if let Some(title) = patch.title {
			self.title = Some(title);
		}
		if let Some(description) = patch.description {
			self.description = Some(description);
		}
		if let Some(variant) = patch.variant {
			self.variant = variant;
		}
		if let Some(duration) = patch.duration {
			self.duration = duration;
		}
		if let Some(action) = patch.action {
			self.action = Some(action);
		}
		if let Some(open) = patch.open {
			self.open = open;
		}
	}
}
