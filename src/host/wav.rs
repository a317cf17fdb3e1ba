//! WAV rendering host
//!
//! A [`HostTransport`] that writes the session's audio to a WAV file instead
//! of a sound device. Useful for rendering tracks offline and for driving a
//! core outside a media player.

use super::{HostTransport, SampleFormat, TransportControl};
use crate::emulator::StreamInfo;
use crate::{GsfError, Result};
use hound::{WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Host transport rendering into a 16-bit PCM WAV file
pub struct WavHost {
    path: PathBuf,
    control: TransportControl,
    /// Stop once this much audio has been written
    limit_ms: Option<u32>,
    writer: Option<WavWriter<BufWriter<File>>>,
    stream: Option<StreamInfo>,
    frames_written: u64,
    bitrate: Option<u32>,
    /// Set after a write error; the session is asked to stop
    failed: bool,
}

impl WavHost {
    /// Create a host that will write to `path` once the session opens audio
    pub fn new(path: impl AsRef<Path>, control: TransportControl) -> Self {
        WavHost {
            path: path.as_ref().to_path_buf(),
            control,
            limit_ms: None,
            writer: None,
            stream: None,
            frames_written: 0,
            bitrate: None,
            failed: false,
        }
    }

    /// Request a stop after `limit_ms` milliseconds of audio
    pub fn with_limit_ms(mut self, limit_ms: u32) -> Self {
        self.limit_ms = Some(limit_ms);
        self
    }

    /// Frames written so far
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Bitrate the session reported, if any
    pub fn bitrate(&self) -> Option<u32> {
        self.bitrate
    }

    /// Milliseconds of audio written so far
    pub fn written_ms(&self) -> f64 {
        match self.stream {
            Some(stream) if stream.sample_rate > 0 => {
                self.frames_written as f64 * 1000.0 / stream.sample_rate as f64
            }
            _ => 0.0,
        }
    }

    /// Close the WAV file and return the number of frames it holds
    pub fn finalize(self) -> Result<u64> {
        if let Some(writer) = self.writer {
            writer.finalize().map_err(|e| {
                GsfError::Other(format!(
                    "Failed to finalize WAV file '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;
        }
        Ok(self.frames_written)
    }
}

impl HostTransport for WavHost {
    fn open_audio(
        &mut self,
        format: SampleFormat,
        sample_rate: u32,
        channels: u16,
    ) -> Result<()> {
        if sample_rate == 0 || channels == 0 {
            return Err(GsfError::Other(format!(
                "Cannot write {} WAV with {} Hz x{} channels",
                format, sample_rate, channels
            )));
        }

        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = WavWriter::create(&self.path, spec).map_err(|e| {
            GsfError::Other(format!(
                "Failed to create WAV file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        log::debug!(
            "WAV output '{}' opened: {} Hz x{}",
            self.path.display(),
            sample_rate,
            channels
        );
        self.writer = Some(writer);
        self.stream = Some(StreamInfo::new(sample_rate, channels));
        Ok(())
    }

    fn write_audio(&mut self, pcm: &[u8]) {
        let (Some(writer), Some(stream)) = (self.writer.as_mut(), self.stream) else {
            log::warn!("Audio written before the WAV output was opened; dropped");
            return;
        };
        if self.failed {
            return;
        }

        // Whole frames only, matching what the decode position counts
        let usable = pcm.len() - pcm.len() % stream.frame_bytes();
        for bytes in pcm[..usable].chunks_exact(2) {
            if let Err(e) = writer.write_sample(i16::from_le_bytes([bytes[0], bytes[1]])) {
                log::warn!("Failed to write sample to '{}': {}", self.path.display(), e);
                self.failed = true;
                return;
            }
        }
        self.frames_written += (usable / stream.frame_bytes()) as u64;
    }

    fn check_stop(&mut self) -> bool {
        if self.failed || self.control.stop_requested() {
            return true;
        }
        match self.limit_ms {
            Some(limit) => self.written_ms() >= limit as f64,
            None => false,
        }
    }

    fn check_seek(&mut self) -> Option<u32> {
        self.control.take_seek()
    }

    fn set_bitrate(&mut self, bits_per_second: u32) {
        self.bitrate = Some(bits_per_second);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_finalize() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("render.wav");
        let mut host = WavHost::new(&path, TransportControl::new());

        host.open_audio(SampleFormat::S16Le, 8000, 2).unwrap();
        host.write_audio(&[0x01, 0x00, 0xFF, 0xFF, 0x02, 0x00, 0xFE, 0xFF]);
        assert_eq!(host.frames_written(), 2);

        assert_eq!(host.finalize().unwrap(), 2);

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 8000);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![1, -1, 2, -2]);
    }

    #[test]
    fn test_limit_requests_stop() {
        let dir = tempdir().unwrap();
        let mut host = WavHost::new(dir.path().join("limit.wav"), TransportControl::new())
            .with_limit_ms(1);

        host.open_audio(SampleFormat::S16Le, 1000, 1).unwrap();
        assert!(!host.check_stop());
        host.write_audio(&[0, 0]);
        assert!(host.check_stop());
    }

    #[test]
    fn test_control_drives_predicates() {
        let dir = tempdir().unwrap();
        let control = TransportControl::new();
        let mut host = WavHost::new(dir.path().join("ctl.wav"), control.clone());

        control.request_seek(2500);
        assert_eq!(host.check_seek(), Some(2500));
        assert_eq!(host.check_seek(), None);

        control.request_stop();
        assert!(host.check_stop());
    }

    #[test]
    fn test_write_error_requests_stop() {
        let dir = tempdir().unwrap();
        let mut host = WavHost::new(dir.path().join("broken.wav"), TransportControl::new());

        host.open_audio(SampleFormat::S16Le, 8000, 1).unwrap();
        host.write_audio(&[0x10, 0x00]);
        assert!(!host.check_stop());

        // State left behind by a failed `write_sample`
        host.failed = true;
        assert!(host.check_stop());

        host.write_audio(&[0x20, 0x00, 0x30, 0x00]);
        assert_eq!(host.frames_written(), 1);
    }

    #[test]
    fn test_rejects_empty_stream() {
        let dir = tempdir().unwrap();
        let mut host = WavHost::new(dir.path().join("bad.wav"), TransportControl::new());
        assert!(host.open_audio(SampleFormat::S16Le, 0, 2).is_err());
    }
}
