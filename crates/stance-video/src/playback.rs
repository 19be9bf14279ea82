use std::sync::Arc;
use tokio::sync::watch;

/// Start/Stop control shared between the UI and the acquisition loop.
///
/// Cloned handles observe the same state. Playback starts stopped.
#[derive(Clone, Debug)]
pub struct Playback {
    state: Arc<watch::Sender<bool>>,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            state: Arc::new(tx),
        }
    }

    pub fn start(&self) {
        if !self.state.send_replace(true) {
            log::info!("playback started");
        }
    }

    pub fn stop(&self) {
        if self.state.send_replace(false) {
            log::info!("playback stopped");
        }
    }

    pub fn is_playing(&self) -> bool {
        *self.state.borrow()
    }

    /// Receiver that is notified on every Start/Stop change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}
