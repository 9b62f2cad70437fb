//! Sync policies and the background sync worker.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Controls when the document gets written to disk.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Only write when `synchronize()` is called.
    #[default]
    Manual,
    /// Rewrite the whole file after every mutation.
    Immediate,
    /// Background thread writes on a timer and shortly after mutations.
    Periodic(Duration),
}

/// Background thread that runs a sync closure on a timer or when nudged.
///
/// The thread exits once every [`SyncTrigger`] is gone, running the closure
/// one last time on the way out. Dropping the worker joins the thread.
pub struct SyncWorker {
    join_handle: Option<thread::JoinHandle<()>>,
}

/// Sender half used by the store to nudge the worker after a mutation.
pub type SyncTrigger = mpsc::SyncSender<()>;

impl SyncWorker {
    /// Spawn the worker. Keep the returned trigger alive for as long as the
    /// worker should run.
    pub fn spawn<F>(interval: Duration, sync_fn: F) -> (Self, SyncTrigger)
    where
        F: Fn() + Send + 'static,
    {
        // Capacity 1: one pending nudge is enough, the write covers all
        // changes made before it.
        let (tx, rx) = mpsc::sync_channel::<()>(1);
        let join_handle = thread::Builder::new()
            .name("user-defaults-sync".into())
            .spawn(move || loop {
                match rx.recv_timeout(interval) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Timeout) => sync_fn(),
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        sync_fn();
                        break;
                    }
                }
            });

        let join_handle = match join_handle {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn sync thread; periodic sync disabled");
                None
            }
        };
        (Self { join_handle }, tx)
    }

    /// `true` while the background thread is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.join_handle
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.join();
        }
    }
}

impl std::fmt::Debug for SyncWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncWorker")
            .field("running", &self.is_running())
            .finish()
    }
}
