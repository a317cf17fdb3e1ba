//! Playback Loop Controller
//!
//! Drives one playback from start to stop: runs the core, opens the host's
//! audio output, then steps emulation until the host asks to stop, turning
//! host seek requests into core restarts or pending seek targets.

pub mod session;

pub use session::{PlaybackSession, SessionReport, TRAILING_SILENCE_BUDGET};

use crate::emulator::{EmulatorCore, FrameSink, StreamInfo};
use crate::host::{HostTransport, SampleFormat};
use crate::{GsfError, Result};
use std::path::Path;

/// Core handle that is closed on every exit path once it has run.
struct OpenCore<'a, C: EmulatorCore + ?Sized> {
    core: &'a mut C,
    running: bool,
}

impl<'a, C: EmulatorCore + ?Sized> OpenCore<'a, C> {
    fn new(core: &'a mut C) -> Self {
        OpenCore {
            core,
            running: false,
        }
    }

    fn run(&mut self, path: &Path) -> Result<StreamInfo> {
        let stream = self.core.run(path)?;
        self.running = true;
        Ok(stream)
    }

    fn step(&mut self, sink: &mut dyn FrameSink) {
        self.core.step(sink);
    }

    fn close(&mut self) {
        if self.running {
            self.core.close();
            self.running = false;
        }
    }
}

impl<C: EmulatorCore + ?Sized> Drop for OpenCore<'_, C> {
    fn drop(&mut self) {
        self.close();
    }
}

/// The session's write path, handed to the core for one step
struct SessionSink<'a, H: HostTransport + ?Sized> {
    session: &'a mut PlaybackSession,
    host: &'a mut H,
}

impl<H: HostTransport + ?Sized> FrameSink for SessionSink<'_, H> {
    fn write_pcm(&mut self, pcm: &[u8]) {
        self.host.write_audio(pcm);
        self.session.advance(pcm.len());
    }

    fn pending_seek_ms(&self) -> Option<u32> {
        self.session.pending_seek_ms()
    }

    fn decode_position_ms(&self) -> f64 {
        self.session.decode_position_ms()
    }

    fn trailing_silence_mut(&mut self) -> &mut u32 {
        self.session.trailing_silence_mut()
    }

    fn end_of_track(&mut self) {
        log::debug!(
            "Core signalled end of track at {:.0} ms",
            self.session.decode_position_ms()
        );
    }
}

/// Play `path` on `core`, sending audio to `host` until the host stops.
///
/// Returns the session summary when playback ended through
/// [`HostTransport::check_stop`]. Fails with [`GsfError::LoadFailure`] if the
/// core cannot run the file, [`GsfError::AudioOpenFailure`] if the host
/// rejects the output format and [`GsfError::ReopenFailure`] if a restart
/// for a backward seek fails. The core is closed before returning in every
/// case where it was successfully run.
pub fn play<C, H>(core: &mut C, host: &mut H, path: impl AsRef<Path>) -> Result<SessionReport>
where
    C: EmulatorCore + ?Sized,
    H: HostTransport + ?Sized,
{
    let path = path.as_ref();
    let mut session = PlaybackSession::new();
    let mut core = OpenCore::new(core);

    let stream = core.run(path).map_err(|e| GsfError::LoadFailure {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    session.set_stream(stream);

    host.set_bitrate(stream.bitrate());
    host.open_audio(SampleFormat::S16Le, stream.sample_rate, stream.channels)
        .map_err(|e| GsfError::AudioOpenFailure {
            format: SampleFormat::S16Le,
            sample_rate: stream.sample_rate,
            channels: stream.channels,
            reason: e.to_string(),
        })?;

    log::info!(
        "Playing '{}' ({} Hz x{})",
        path.display(),
        stream.sample_rate,
        stream.channels
    );

    while !host.check_stop() {
        if let Some(target_ms) = host.check_seek() {
            if session.is_backward_seek(target_ms) {
                // The core only runs forwards; start over and fast-forward
                log::debug!(
                    "Backward seek to {} ms from {:.0} ms, restarting core",
                    target_ms,
                    session.decode_position_ms()
                );
                core.close();
                session.restart();
                let restarted = core.run(path).map_err(|e| GsfError::ReopenFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
                if restarted != stream {
                    log::warn!(
                        "Core restarted with {} Hz x{}, output stays at {} Hz x{}",
                        restarted.sample_rate,
                        restarted.channels,
                        stream.sample_rate,
                        stream.channels
                    );
                }
            } else {
                log::debug!("Forward seek to {} ms", target_ms);
            }
            session.record_seek(target_ms);
        }

        core.step(&mut SessionSink {
            session: &mut session,
            host: &mut *host,
        });
        session.count_step();
    }

    core.close();
    let report = session.report();
    log::info!(
        "Stopped '{}' at {:.0} ms after {} steps",
        path.display(),
        report.decode_position_ms,
        report.steps
    );
    Ok(report)
}
