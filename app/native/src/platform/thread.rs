//! Named threads and the UI-affine serial queue.
//!
//! Frame publication and animation state mutation must happen on a single
//! execution context. [`SerialQueue`] is that context when no host UI thread
//! is available; a host can supply its own [`Dispatcher`] instead (for
//! example one that forwards to the main thread's run loop).

use std::sync::mpsc::{self, Sender};
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

use crate::constants::APP_NAME;

/// Unit of work executed on a [`Dispatcher`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub fn spawn_named_thread<F>(name: &str, task: F) -> Option<ThreadId>
where F: FnOnce() + Send + 'static {
    let thread_name = format!("{APP_NAME}-{name}");

    match thread::Builder::new().name(thread_name.clone()).spawn(task) {
        Ok(handle) => Some(handle.thread().id()),
        Err(err) => {
            tracing::error!(thread = %thread_name, error = %err, "failed to spawn thread");
            None
        }
    }
}

/// An execution context that runs tasks one at a time, in submission order.
pub trait Dispatcher: Send + Sync {
    /// Schedules `task` to run on this context. Never blocks on the task itself.
    fn dispatch(&self, task: Task);

    /// Returns `true` when called from within this context.
    fn is_current(&self) -> bool { false }
}

/// Runs `f` on `dispatcher` and waits for its result.
///
/// Runs inline when already on the dispatcher's context. Returns `None` if the
/// dispatcher dropped the task without running it.
pub fn run_sync<D, F, R>(dispatcher: &D, f: F) -> Option<R>
where
    D: Dispatcher + ?Sized,
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    if dispatcher.is_current() {
        return Some(f());
    }

    let (tx, rx) = mpsc::channel();
    dispatcher.dispatch(Box::new(move || {
        let _ = tx.send(f());
    }));
    rx.recv().ok()
}

/// A dedicated thread draining a FIFO of tasks.
///
/// The thread exits once the queue is dropped and the pending tasks have run.
pub struct SerialQueue {
    sender: Mutex<Option<Sender<Task>>>,
    thread_id: Option<ThreadId>,
}

impl SerialQueue {
    /// Spawns the worker thread, named `parrotbar-{name}`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let (tx, rx) = mpsc::channel::<Task>();

        let thread_id = spawn_named_thread(name, move || {
            while let Ok(task) = rx.recv() {
                task();
            }
            tracing::trace!("serial queue drained, exiting");
        });

        Self {
            sender: Mutex::new(thread_id.map(|_| tx)),
            thread_id,
        }
    }

    /// Stops accepting new tasks. Already queued tasks still run.
    pub fn close(&self) { self.sender.lock().take(); }
}

impl Dispatcher for SerialQueue {
    fn dispatch(&self, task: Task) {
        let guard = self.sender.lock();
        let Some(sender) = guard.as_ref() else {
            tracing::debug!("dispatch on a closed serial queue ignored");
            return;
        };

        if sender.send(task).is_err() {
            tracing::warn!("serial queue worker is gone, task dropped");
        }
    }

    fn is_current(&self) -> bool { self.thread_id == Some(thread::current().id()) }
}

impl Drop for SerialQueue {
    fn drop(&mut self) { self.close(); }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[test]
    fn spawn_named_thread_executes_task() {
        let executed = Arc::new(AtomicBool::new(false));
        let executed_clone = Arc::clone(&executed);

        spawn_named_thread("test-task", move || {
            executed_clone.store(true, Ordering::SeqCst);
        });

        // Give the thread time to execute
        thread::sleep(Duration::from_millis(100));

        assert!(executed.load(Ordering::SeqCst));
    }

    #[test]
    fn spawn_named_thread_uses_correct_prefix() {
        let (tx, rx) = mpsc::channel();

        spawn_named_thread("name-test", move || {
            let name = thread::current().name().unwrap_or("").to_string();
            tx.send(name).unwrap();
        });

        let thread_name = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(thread_name, "parrotbar-name-test");
    }

    #[test]
    fn serial_queue_runs_tasks_in_order() {
        let queue = SerialQueue::new("order-test");
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..20 {
            let seen = Arc::clone(&seen);
            queue.dispatch(Box::new(move || seen.lock().push(i)));
        }

        run_sync(&queue, || ()).unwrap();
        assert_eq!(*seen.lock(), (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn serial_queue_runs_on_its_own_thread() {
        let queue = SerialQueue::new("affinity-test");
        assert!(!queue.is_current());

        let name = run_sync(&queue, || thread::current().name().map(str::to_string)).unwrap();
        assert_eq!(name.as_deref(), Some("parrotbar-affinity-test"));
    }

    #[test]
    fn run_sync_is_reentrant_on_the_queue() {
        let queue = Arc::new(SerialQueue::new("reentrant-test"));
        let inner = Arc::clone(&queue);

        let value = run_sync(&*queue, move || run_sync(&*inner, || 7)).unwrap();
        assert_eq!(value, Some(7));
    }

    #[test]
    fn closed_queue_drops_new_tasks() {
        let queue = SerialQueue::new("closed-test");
        queue.close();

        assert_eq!(run_sync(&queue, || 1), None);
    }
}
