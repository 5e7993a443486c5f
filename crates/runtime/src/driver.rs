use std::sync::OnceLock;
use std::time::Duration;

use herald_center::{
	CenterConfig, IdAllocator, Notification, NotificationCenter, NotificationEntry,
	NotificationId, NotificationPatch,
};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::handle::NotificationHandle;

/// Mailbox protocol of the center actor.
///
/// Caller operations and timer firings share this one channel, which is
/// what serializes all mutations.
pub(crate) enum Command {
	Push {
		id: NotificationId,
		notification: Notification,
	},
	Update {
		id: NotificationId,
		patch: NotificationPatch,
	},
	Dismiss {
		id: NotificationId,
	},
	DismissAll,
	Remove {
		id: NotificationId,
	},
}

/// Cloneable front door to a running notification center.
///
/// One `Notifier` is created at application start via [`Notifier::spawn`]
/// and passed to whatever needs to surface notifications; clones share the
/// same center. All operations are fire-and-forget sends into the actor
/// mailbox and cannot fail; after [`Notifier::shutdown`] they degrade to
/// logged no-ops.
#[derive(Debug, Clone)]
pub struct Notifier {
	commands: mpsc::UnboundedSender<Command>,
	ids: IdAllocator,
	snapshot: watch::Receiver<Vec<NotificationEntry>>,
	shutdown: CancellationToken,
}

impl Notifier {
	/// Spawns the center actor and returns the handle to it.
	///
	/// Works inside any tokio runtime; outside one, the actor and its
	/// timers run on a lazily-built process-global runtime.
	pub fn spawn(config: CenterConfig) -> Self {
		let center = NotificationCenter::new(config);
		let ids = center.ids();
		let (commands, mailbox) = mpsc::unbounded_channel();
		let (publish, snapshot) = watch::channel(Vec::new());
		let shutdown = CancellationToken::new();

		runtime_handle().spawn(run(
			center,
			mailbox,
			commands.clone(),
			publish,
			shutdown.clone(),
		));

		Self {
			commands,
			ids,
			snapshot,
			shutdown,
		}
	}

	/// Enqueues a notification and returns its handle.
	///
	/// The entry becomes visible once the actor processes the command; the
	/// returned [`NotificationHandle`] is valid immediately.
	pub fn notify(&self, notification: Notification) -> NotificationHandle {
		let id = self.ids.next_id();
		tracing::debug!(id = id.get(), "notifier.notify");
		self.send(Command::Push { id, notification });
		NotificationHandle::new(id, self.commands.clone())
	}

	/// Shallow-merges `patch` into an entry; unknown ids are ignored.
	pub fn update(&self, id: NotificationId, patch: NotificationPatch) {
		self.send(Command::Update { id, patch });
	}

	/// Begins the closing transition for one entry.
	pub fn dismiss(&self, id: NotificationId) {
		self.send(Command::Dismiss { id });
	}

	/// Begins the closing transition for every tracked entry.
	pub fn dismiss_all(&self) {
		self.send(Command::DismissAll);
	}

	/// Most recent newest-first snapshot of the tracked entries.
	pub fn entries(&self) -> Vec<NotificationEntry> {
		self.snapshot.borrow().clone()
	}

	/// Returns a watch receiver over entry snapshots, for render loops that
	/// want to await changes instead of polling.
	pub fn subscribe(&self) -> watch::Receiver<Vec<NotificationEntry>> {
		self.snapshot.clone()
	}

	/// Stops the actor. Commands sent afterwards are dropped; pending
	/// timers fire into a closed mailbox and are discarded.
	pub fn shutdown(&self) {
		self.shutdown.cancel();
	}

	fn send(&self, command: Command) {
		if self.commands.send(command).is_err() {
			tracing::debug!("notifier.closed");
		}
	}
}

/// Actor loop: exclusively owns the center and folds mailbox commands into
/// it, publishing a snapshot after each one.
async fn run(
	mut center: NotificationCenter,
	mut mailbox: mpsc::UnboundedReceiver<Command>,
	feedback: mpsc::UnboundedSender<Command>,
	publish: watch::Sender<Vec<NotificationEntry>>,
	shutdown: CancellationToken,
) {
	let remove_delay = center.config().remove_delay();
	loop {
		let command = tokio::select! {
			biased;
			_ = shutdown.cancelled() => break,
			command = mailbox.recv() => match command {
				Some(command) => command,
				None => break,
			},
		};

		match command {
			Command::Push { id, notification } => {
				center.insert(id, notification);
				if let Some(entry) = center.get(id) {
					// Expiry is never cancelled; a firing that outlives the
					// entry dismisses an unknown id, which is a no-op.
					schedule(&feedback, entry.duration, Command::Dismiss { id });
				}
			}
			Command::Update { id, patch } => center.update(id, patch),
			Command::Dismiss { id } => {
				for id in center.dismiss(id) {
					schedule(&feedback, remove_delay, Command::Remove { id });
				}
			}
			Command::DismissAll => {
				for id in center.dismiss_all() {
					schedule(&feedback, remove_delay, Command::Remove { id });
				}
			}
			Command::Remove { id } => center.remove(id),
		}

		let _ = publish.send(center.entries().to_vec());
	}
	tracing::debug!("notifier.stopped");
}

/// Arms a fire-once timer that re-enters the mailbox.
///
/// The center's pending-removal set guarantees at most one removal timer
/// per id; expiry timers are armed exactly once per push.
fn schedule(feedback: &mpsc::UnboundedSender<Command>, delay: Duration, command: Command) {
	let feedback = feedback.clone();
	tokio::spawn(async move {
		tokio::time::sleep(delay).await;
		let _ = feedback.send(command);
	});
}

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("herald-notifier")
			.build()
			.expect("failed to build herald global tokio runtime")
	});
	runtime.handle().clone()
}

#[cfg(test)]
mod tests {
	use herald_center::Notification;
	use pretty_assertions::assert_eq;

	use super::*;

	#[tokio::test(start_paused = true)]
	async fn notifier_is_cloneable_and_clones_share_the_center() {
		let notifier = Notifier::spawn(CenterConfig::default());
		let clone = notifier.clone();

		clone.notify(Notification::new().title("from clone"));
		tokio::task::yield_now().await;

		assert_eq!(notifier.entries().len(), 1);
		notifier.shutdown();
	}

	#[tokio::test(start_paused = true)]
	async fn commands_after_shutdown_are_dropped() {
		let notifier = Notifier::spawn(CenterConfig::default());
		notifier.notify(Notification::new().title("kept"));
		tokio::task::yield_now().await;

		notifier.shutdown();
		tokio::task::yield_now().await;

		notifier.notify(Notification::new().title("dropped"));
		tokio::task::yield_now().await;

		let entries = notifier.entries();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].title.as_deref(), Some("kept"));
	}
}
