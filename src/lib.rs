//! GSF/minigsf input plugin adapter
//!
//! Binds a Game Boy Advance sound-engine emulator core to a media player's
//! input-plugin surface. The crate owns no emulation: it drives an external
//! [`EmulatorCore`] step by step, forwards the PCM the core produces to a
//! [`HostTransport`], and maps PSF tags onto a [`TrackMetadata`] record.
//!
//! # Components
//! - [`playback`]: the play/seek/stop loop and the per-file session state
//! - [`emulator`]: the emulator core contract and the frame sink it writes into
//! - [`host`]: the host transport contract plus reference transports
//! - [`tags`] / [`metadata`]: tag access and tag-to-metadata mapping
//! - [`config`]: plugin preferences and the configuration store
//! - [`plugin`]: the plugin descriptor a host integration holds
//!
//! # Crate feature flags
//! - `wav-host` (default): [`host::WavHost`], a transport rendering to WAV files
//!
//! # Quick start
//! ```no_run
//! # fn demo<C: highly_advanced::EmulatorCore>(mut core: C) -> highly_advanced::Result<()> {
//! use highly_advanced::config::JsonConfigStore;
//! use highly_advanced::host::{TransportControl, WavHost};
//! use highly_advanced::tags::PsfTagReader;
//! use highly_advanced::GsfPlugin;
//!
//! let store = JsonConfigStore::open("gsf.json")?;
//! let plugin = GsfPlugin::init(store, PsfTagReader);
//!
//! let control = TransportControl::new();
//! let mut host = WavHost::new("out.wav", control.clone()).with_limit_ms(30_000);
//! let ok = plugin.play(&mut core, &mut host, "song.minigsf");
//! println!("played: {ok}, frames: {}", host.finalize()?);
//! plugin.cleanup()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config; // Preferences & Configuration Store
pub mod emulator; // Emulator Core Contract
pub mod host; // Host Transport
pub mod metadata; // Tag-to-Metadata Mapping
pub mod playback; // Playback Loop Controller
pub mod plugin; // Plugin Descriptor
pub mod tags; // PSF Tag Access

use std::path::PathBuf;

/// Error types for GSF playback operations
#[derive(thiserror::Error, Debug)]
pub enum GsfError {
    /// The emulator core could not run the file
    #[error("Failed to load '{}': {reason}", path.display())]
    LoadFailure {
        /// File that was being started
        path: PathBuf,
        /// Core-reported cause
        reason: String,
    },

    /// Restarting the core for a backward seek failed
    #[error("Failed to restart '{}' for backward seek: {reason}", path.display())]
    ReopenFailure {
        /// File that was being restarted
        path: PathBuf,
        /// Core-reported cause
        reason: String,
    },

    /// The host rejected the requested audio output format
    #[error("Host rejected audio output {format} {sample_rate} Hz x{channels}: {reason}")]
    AudioOpenFailure {
        /// Requested sample format
        format: host::SampleFormat,
        /// Requested sample rate in Hz
        sample_rate: u32,
        /// Requested channel count
        channels: u16,
        /// Host-reported cause
        reason: String,
    },

    /// Invalid configuration or configuration store failure
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Tag data could not be read
    #[error("Tag error: {0}")]
    TagError(String),

    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for GsfError {
    /// Converts a String into `GsfError::Other`.
    ///
    /// Prefer the specific variants where the failure kind is known; the
    /// playback controller relies on them to tell load, reopen and
    /// audio-open failures apart.
    fn from(msg: String) -> Self {
        GsfError::Other(msg)
    }
}

impl From<&str> for GsfError {
    /// Converts a string slice into `GsfError::Other`.
    fn from(msg: &str) -> Self {
        GsfError::Other(msg.to_string())
    }
}

/// Result type for plugin operations
pub type Result<T> = std::result::Result<T, GsfError>;

// Public API exports
pub use emulator::{CoreSettings, EmulatorCore, FrameSink, StreamInfo};
pub use config::{ConfigStore, JsonConfigStore, Preferences};
pub use host::{HostTransport, SampleFormat, TransportControl};
#[cfg(feature = "wav-host")]
pub use host::WavHost;
pub use metadata::{read_metadata, TrackMetadata};
pub use playback::{play, PlaybackSession, SessionReport};
pub use plugin::GsfPlugin;
pub use tags::{parse_length_ms, PsfTagReader, TagBlob, TagReader, TagSet};
