//! Playback Session
//!
//! Per-file state of one playback: decode position, pending seek target and
//! the trailing-silence countdown the core consumes.

use crate::emulator::StreamInfo;

/// Initial value of the trailing-silence countdown
pub const TRAILING_SILENCE_BUDGET: u32 = 1000;

/// State of one playback, created at play start and dropped when it ends
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    /// Elapsed decode time, advanced only by delivered audio
    decode_position_ms: f64,
    /// Latest host seek target; `None` when no seek is pending
    pending_seek_ms: Option<u32>,
    trailing_silence: u32,
    stream: StreamInfo,
    frames_written: u64,
    restarts: u32,
    steps: u64,
}

impl PlaybackSession {
    /// Create a session at time zero with no seek pending
    pub fn new() -> Self {
        PlaybackSession {
            decode_position_ms: 0.0,
            pending_seek_ms: None,
            trailing_silence: TRAILING_SILENCE_BUDGET,
            stream: StreamInfo::new(0, 0),
            frames_written: 0,
            restarts: 0,
            steps: 0,
        }
    }

    /// Elapsed decode time in milliseconds
    pub fn decode_position_ms(&self) -> f64 {
        self.decode_position_ms
    }

    /// Pending seek target in milliseconds
    pub fn pending_seek_ms(&self) -> Option<u32> {
        self.pending_seek_ms
    }

    /// Remaining trailing-silence countdown
    pub fn trailing_silence(&self) -> u32 {
        self.trailing_silence
    }

    /// Mutable trailing-silence countdown, for the core
    pub fn trailing_silence_mut(&mut self) -> &mut u32 {
        &mut self.trailing_silence
    }

    /// Stream parameters reported by the core
    pub fn stream(&self) -> StreamInfo {
        self.stream
    }

    /// Set the stream parameters once the core has run the file
    pub fn set_stream(&mut self, stream: StreamInfo) {
        self.stream = stream;
    }

    /// Whether seeking to `target_ms` would go backwards in time
    pub fn is_backward_seek(&self, target_ms: u32) -> bool {
        (target_ms as f64) < self.decode_position_ms
    }

    /// Record a host seek request
    pub fn record_seek(&mut self, target_ms: u32) {
        self.pending_seek_ms = Some(target_ms);
    }

    /// Return to time zero after the core was closed and run again
    pub fn restart(&mut self) {
        self.decode_position_ms = 0.0;
        self.pending_seek_ms = None;
        self.restarts += 1;
    }

    /// Account for `byte_len` bytes of PCM delivered to the host.
    ///
    /// Returns the milliseconds the decode position moved.
    pub fn advance(&mut self, byte_len: usize) -> f64 {
        let elapsed = self.stream.duration_ms(byte_len);
        if self.stream.channels > 0 {
            self.frames_written += (byte_len / self.stream.frame_bytes()) as u64;
        }
        self.decode_position_ms += elapsed;
        elapsed
    }

    pub(crate) fn count_step(&mut self) {
        self.steps += 1;
    }

    /// Summary of the session so far
    pub fn report(&self) -> SessionReport {
        SessionReport {
            decode_position_ms: self.decode_position_ms,
            pending_seek_ms: self.pending_seek_ms,
            frames_written: self.frames_written,
            restarts: self.restarts,
            steps: self.steps,
        }
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a playback that ended through the host's stop request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionReport {
    /// Decode position when playback stopped
    pub decode_position_ms: f64,
    /// Seek target still recorded when playback stopped
    pub pending_seek_ms: Option<u32>,
    /// Interleaved frames handed to the host
    pub frames_written: u64,
    /// Close+run cycles caused by backward seeks
    pub restarts: u32,
    /// Emulation steps performed
    pub steps: u64,
}
