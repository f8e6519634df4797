use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{debug, trace};

use crate::band::{lock, Session};

/// The thread that ticks a session's scheduler every `interval`.
///
/// The running flag is checked before every tick, so once [`stop`] returns
/// no further events are dispatched.
///
/// [`stop`]: TickDriver::stop
#[derive(Debug)]
pub(crate) struct TickDriver {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl TickDriver {
    pub(crate) fn spawn(session: Arc<Mutex<Session>>, interval: Duration) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let thread = thread::spawn(move || {
            debug!(?interval, "tick thread started");
            while flag.load(Ordering::Acquire) {
                {
                    let mut session = lock(&session);
                    // Re-check under the lock: stop may have landed while we waited
                    if !flag.load(Ordering::Acquire) {
                        break;
                    }
                    let now = session.now();
                    let report = session.tick(now);
                    if !report.onsets.is_empty() {
                        trace!(onsets = report.onsets.len(), "tick");
                    }
                }
                thread::sleep(interval);
            }
            debug!("tick thread stopped");
        });

        Self {
            running,
            thread: Some(thread),
        }
    }

    pub(crate) fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
