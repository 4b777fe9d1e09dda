//! Background driver for the auto-send task.
//!
//! Runs the task whenever a connectivity trigger arrives, and again on a
//! fixed interval for as long as the last run asked to be retried.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::broadcast;

use super::task::AutoSendTask;

pub struct AutoSendScheduler {
    task: Arc<AutoSendTask>,
    retry_interval: Duration,
    shutdown: Arc<AtomicBool>,
    retry_pending: Arc<AtomicBool>,
}

impl AutoSendScheduler {
    pub fn new(task: Arc<AutoSendTask>, retry_interval: Duration) -> Self {
        Self {
            task,
            retry_interval,
            shutdown: Arc::new(AtomicBool::new(false)),
            retry_pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts the loop on a background thread. Each message on `trigger_rx`
    /// (typically a connectivity change) runs the task once.
    pub fn start(&self, mut trigger_rx: broadcast::Receiver<()>) -> JoinHandle<()> {
        let task = Arc::clone(&self.task);
        let shutdown = Arc::clone(&self.shutdown);
        let retry_pending = Arc::clone(&self.retry_pending);
        let retry_interval = self.retry_interval;

        std::thread::spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to start auto-send runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async {
                let mut retry_timer = tokio::time::interval(retry_interval);
                retry_timer.tick().await; // skip immediate first tick

                loop {
                    if shutdown.load(Ordering::Acquire) {
                        break;
                    }

                    tokio::select! {
                        _ = retry_timer.tick() => {
                            if !retry_pending.load(Ordering::Acquire) {
                                continue;
                            }
                            log::debug!("Retrying auto-send");
                        },
                        Ok(()) = trigger_rx.recv() => {
                            log::debug!("Auto-send triggered");
                        },
                    }

                    if shutdown.load(Ordering::Acquire) {
                        break;
                    }

                    let done = task.run().await;
                    retry_pending.store(!done, Ordering::Release);
                }
            });
        })
    }

    /// Whether the last run asked to be retried.
    pub fn is_retry_pending(&self) -> bool {
        self.retry_pending.load(Ordering::Acquire)
    }

    /// Signals the scheduler to stop.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Release);
    }
}
