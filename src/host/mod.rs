//! Host Transport
//!
//! The media player side of a playback session: audio output, bitrate
//! display and the stop/seek predicates polled by the playback loop.

pub mod control;
#[cfg(feature = "wav-host")]
pub mod wav;

pub use control::TransportControl;
#[cfg(feature = "wav-host")]
pub use wav::WavHost;

use crate::Result;
use std::fmt;

/// PCM sample formats a host output can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Signed 16-bit little-endian
    S16Le,
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleFormat::S16Le => f.write_str("S16LE"),
        }
    }
}

/// Capabilities the host injects into a playback session.
///
/// All methods are called from the decode thread. `check_stop` and
/// `check_seek` are the only cross-thread surface; implementations make
/// them safe to call while another thread issues requests.
pub trait HostTransport {
    /// Open the audio output. An error means the format is not playable.
    fn open_audio(
        &mut self,
        format: SampleFormat,
        sample_rate: u32,
        channels: u16,
    ) -> Result<()>;

    /// Queue interleaved PCM in the format passed to `open_audio`.
    fn write_audio(&mut self, pcm: &[u8]);

    /// True once playback should end.
    fn check_stop(&mut self) -> bool;

    /// A pending seek target in milliseconds, if the user requested one.
    fn check_seek(&mut self) -> Option<u32>;

    /// Report the stream bitrate for display.
    fn set_bitrate(&mut self, _bits_per_second: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_format_display() {
        assert_eq!(SampleFormat::S16Le.to_string(), "S16LE");
    }
}
