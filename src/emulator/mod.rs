//! Emulator Core Contract
//!
//! The GBA sound-engine emulator lives outside this crate. This module
//! defines the narrow surface the playback controller drives it through,
//! and the [`FrameSink`] the core writes its audio into during a step.

use crate::Result;
use std::path::Path;

/// Bytes per sample of the PCM the core produces (signed 16-bit).
pub const BYTES_PER_SAMPLE: u32 = 2;

/// Output stream parameters reported by the core after a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Interleaved channel count
    pub channels: u16,
}

impl StreamInfo {
    /// Create stream parameters
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        StreamInfo {
            sample_rate,
            channels,
        }
    }

    /// Bitrate reported to the host: rate * bytes per sample * channels.
    pub fn bitrate(&self) -> u32 {
        self.sample_rate
            .saturating_mul(BYTES_PER_SAMPLE)
            .saturating_mul(self.channels as u32)
    }

    /// Size in bytes of one interleaved frame (one sample per channel).
    pub fn frame_bytes(&self) -> usize {
        BYTES_PER_SAMPLE as usize * self.channels as usize
    }

    /// Playback time covered by `byte_len` bytes of interleaved PCM.
    ///
    /// Only whole frames count; a trailing partial frame adds nothing.
    pub fn duration_ms(&self, byte_len: usize) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        let frames = byte_len / self.frame_bytes();
        (frames as f64 * 1000.0) / self.sample_rate as f64
    }
}

/// Settings the core consumes, derived from the plugin preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreSettings {
    /// Keep looping instead of ending at the track length
    pub play_forever: bool,
    /// Ignore the length tag and use `default_length_ms`
    pub ignore_track_length: bool,
    /// Track length used when the file has none (or it is ignored)
    pub default_length_ms: u32,
    /// End the track after a stretch of silence
    pub detect_silence: bool,
    /// Silence stretch, in seconds, that ends the track
    pub silence_length_secs: u32,
    /// Enable the core's output low-pass filter
    pub low_pass_filter: bool,
}

/// Write path the core uses during [`EmulatorCore::step`].
///
/// Implemented by the playback controller over the current session. The
/// core may also read the pending seek target here to fast-forward, and
/// owns the trailing-silence countdown stored in the session.
pub trait FrameSink {
    /// Forward interleaved S16LE PCM to the host and advance the decode position.
    fn write_pcm(&mut self, pcm: &[u8]);

    /// Convenience for cores holding native `i16` samples.
    fn write_samples(&mut self, samples: &[i16]) {
        let mut pcm = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            pcm.extend_from_slice(&sample.to_le_bytes());
        }
        self.write_pcm(&pcm);
    }

    /// Seek target the host requested most recently, if any.
    fn pending_seek_ms(&self) -> Option<u32>;

    /// Elapsed decode time of the session in milliseconds.
    fn decode_position_ms(&self) -> f64;

    /// Trailing-silence countdown of the session.
    fn trailing_silence_mut(&mut self) -> &mut u32;

    /// Natural end-of-track notification. Carries no control action.
    fn end_of_track(&mut self) {}
}

/// External GBA sound-engine emulator core.
///
/// `run` opens the file and leaves the core ready to step; `close` releases
/// it. Close followed by run is the only way back to time zero.
pub trait EmulatorCore {
    /// Apply preference-derived settings before the next `run`.
    fn configure(&mut self, _settings: &CoreSettings) {}

    /// Open and initialize `path`, reporting the output stream parameters.
    fn run(&mut self, path: &Path) -> Result<StreamInfo>;

    /// Emulate one tick, writing zero or more frame buffers into `sink`.
    fn step(&mut self, sink: &mut dyn FrameSink);

    /// Release everything opened by `run`.
    fn close(&mut self);
}
