use herald_center::{NotificationId, NotificationPatch};
use tokio::sync::mpsc;

use crate::driver::Command;

/// Convenience handle bound to one notification.
///
/// Returned by [`Notifier::notify`](crate::Notifier::notify); dismiss and
/// update go through the same mailbox as the owning notifier, so the handle
/// stays usable for streaming updates (progress messages) until the entry
/// is removed, after which its operations become no-ops.
#[derive(Debug, Clone)]
pub struct NotificationHandle {
	id: NotificationId,
	commands: mpsc::UnboundedSender<Command>,
}

impl NotificationHandle {
	pub(crate) fn new(id: NotificationId, commands: mpsc::UnboundedSender<Command>) -> Self {
		Self { id, commands }
	}

	/// Id of the entry this handle refers to.
	pub fn id(&self) -> NotificationId {
		self.id
	}

	/// Begins the closing transition for this entry.
	pub fn dismiss(&self) {
		let _ = self.commands.send(Command::Dismiss { id: self.id });
	}

	/// Shallow-merges `patch` into this entry, preserving unspecified
	/// fields.
	pub fn update(&self, patch: NotificationPatch) {
		let _ = self.commands.send(Command::Update {
			id: self.id,
			patch,
		});
	}
}
