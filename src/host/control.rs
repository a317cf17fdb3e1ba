//! Transport control shared between a UI thread and the decode thread

use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct ControlState {
    stop: bool,
    seek: Option<u32>,
}

/// Stop and seek requests for a running session.
///
/// Clones share state, so one clone can live with the user interface while
/// the host transport polls another from the decode thread. A newer seek
/// request replaces an unconsumed older one.
#[derive(Debug, Clone, Default)]
pub struct TransportControl {
    state: Arc<Mutex<ControlState>>,
}

impl TransportControl {
    /// Create a control with no pending requests
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the session to stop at the next loop iteration
    pub fn request_stop(&self) {
        self.state.lock().stop = true;
    }

    /// Ask the session to seek to `target_ms`
    pub fn request_seek(&self, target_ms: u32) {
        self.state.lock().seek = Some(target_ms);
    }

    /// Whether a stop was requested
    pub fn stop_requested(&self) -> bool {
        self.state.lock().stop
    }

    /// Consume the pending seek request
    pub fn take_seek(&self) -> Option<u32> {
        self.state.lock().seek.take()
    }

    /// Clear all requests, for reuse with the next track
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.stop = false;
        state.seek = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_seek_is_consumed_once() {
        let control = TransportControl::new();
        control.request_seek(1200);
        assert_eq!(control.take_seek(), Some(1200));
        assert_eq!(control.take_seek(), None);
    }

    #[test]
    fn test_latest_seek_wins() {
        let control = TransportControl::new();
        control.request_seek(1000);
        control.request_seek(3000);
        assert_eq!(control.take_seek(), Some(3000));
    }

    #[test]
    fn test_stop_from_other_thread() {
        let control = TransportControl::new();
        let remote = control.clone();
        thread::spawn(move || remote.request_stop()).join().unwrap();
        assert!(control.stop_requested());

        control.reset();
        assert!(!control.stop_requested());
    }
}
