use crate::clock::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

pub const INITIAL_PHRASES: [&str; 4] = [
    "Initializing Veo 3.1...",
    "Analyzing performance...",
    "Focusing facial anatomy...",
    "Rendering masterpiece...",
];

pub const EXTENSION_PHRASES: [&str; 4] = [
    "Synchronizing frames...",
    "Extending mouth movements...",
    "Rendering next sequence...",
    "Optimizing lip-sync...",
];

/// Rotates status phrases until dropped or aborted.
pub(crate) struct StatusTicker {
    handle: JoinHandle<()>,
}

impl StatusTicker {
    pub(crate) fn start(
        phrases: &'static [&'static str; 4],
        interval: Duration,
        clock: Arc<dyn Clock>,
        status: Arc<watch::Sender<String>>,
    ) -> Self {
        status.send_replace(phrases[0].to_string());

        let handle = tokio::spawn(async move {
            let mut index = 0;
            loop {
                clock.sleep(interval).await;
                index = (index + 1) % phrases.len();
                status.send_replace(phrases[index].to_string());
            }
        });

        Self { handle }
    }

    pub(crate) fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }
}

impl Drop for StatusTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
