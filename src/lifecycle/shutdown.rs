//! Shutdown coordination.
//!
//! A `watch` flag rather than a one-shot message: a server started after
//! the signal (or a test that subscribes late) still sees that shutdown was
//! requested and stops at once.

use tokio::sync::watch;

/// Receiving side handed to servers.
pub type ShutdownSignal = watch::Receiver<bool>;

pub struct Shutdown {
    flag: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self { flag }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        self.flag.subscribe()
    }

    /// Request shutdown. Idempotent.
    pub fn trigger(&self) {
        self.flag.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.flag.borrow()
    }

    /// Servers still holding a [`ShutdownSignal`].
    pub fn receiver_count(&self) -> usize {
        self.flag.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once shutdown is requested or the coordinator is dropped.
pub async fn wait_for(mut signal: ShutdownSignal) {
    let _ = signal.wait_for(|requested| *requested).await;
}
