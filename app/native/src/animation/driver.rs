//! Dedicated thread hosting the cadence runtime.

use std::sync::mpsc;

use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;

use crate::error::ParrotBarError;
use crate::platform::spawn_named_thread;

/// A current-thread tokio runtime running on its own `parrotbar-cadence` thread.
///
/// The runtime keeps driving spawned tasks until the driver is dropped.
pub struct CadenceDriver {
    handle: Handle,
    shutdown: Option<oneshot::Sender<()>>,
}

impl CadenceDriver {
    /// Starts the thread and waits until its runtime is ready.
    ///
    /// # Errors
    ///
    /// Returns [`ParrotBarError::RuntimeError`] if the thread or the runtime cannot be created.
    pub fn spawn() -> Result<Self, ParrotBarError> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<Handle, String>>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let spawned = spawn_named_thread("cadence", move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = ready_tx.send(Err(err.to_string()));
                    return;
                }
            };

            let _ = ready_tx.send(Ok(runtime.handle().clone()));
            runtime.block_on(async {
                let _ = shutdown_rx.await;
            });
            tracing::debug!("cadence runtime stopped");
        });

        if spawned.is_none() {
            return Err(ParrotBarError::RuntimeError("failed to spawn the cadence thread".to_string()));
        }

        let handle = ready_rx
            .recv()
            .map_err(|_| {
                ParrotBarError::RuntimeError("cadence thread exited before starting".to_string())
            })?
            .map_err(ParrotBarError::RuntimeError)?;

        tracing::debug!("cadence runtime started");
        Ok(Self { handle, shutdown: Some(shutdown_tx) })
    }

    /// Handle for spawning tasks on the cadence runtime.
    #[must_use]
    pub const fn handle(&self) -> &Handle { &self.handle }
}

impl Drop for CadenceDriver {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_spawned_tasks_run_on_cadence_thread() {
        let driver = CadenceDriver::spawn().unwrap();
        let (tx, rx) = mpsc::channel();

        driver.handle().spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let name = std::thread::current().name().map(str::to_string);
            let _ = tx.send(name);
        });

        let name = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(name.as_deref(), Some("parrotbar-cadence"));
    }

    #[test]
    fn test_drop_stops_pending_tasks() {
        let driver = CadenceDriver::spawn().unwrap();
        let (tx, rx) = mpsc::channel::<()>();

        driver.handle().spawn(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            let _ = tx.send(());
        });
        drop(driver);

        // The task is dropped with the runtime, which drops the sender.
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_err());
    }
}
