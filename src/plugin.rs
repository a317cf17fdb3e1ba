//! Plugin Descriptor
//!
//! What a host integration holds for the lifetime of the plugin: the
//! preferences loaded at init and saved at cleanup, the tag reader used for
//! playlist metadata, and the entry point that plays a file.

use crate::config::{ConfigStore, Preferences};
use crate::emulator::EmulatorCore;
use crate::host::HostTransport;
use crate::metadata::{read_metadata, TrackMetadata};
use crate::playback;
use crate::tags::TagReader;
use crate::Result;
use std::path::Path;

/// Display name of the plugin
pub const PLUGIN_NAME: &str = "Highly Advanced";

/// Translation domain of the plugin
pub const PLUGIN_DOMAIN: &str = "gsf";

/// About text
pub const ABOUT: &str = "Highly Advanced GSF player, version 1.0\n\n\
                         Plays GSF and minigsf files through a GBA sound-engine core.\n";

/// File extensions the plugin plays
pub const EXTENSIONS: &[&str] = &["gsf", "minigsf"];

/// GSF input plugin
pub struct GsfPlugin<S: ConfigStore, R: TagReader> {
    store: S,
    reader: R,
    preferences: Preferences,
}

impl<S: ConfigStore, R: TagReader> GsfPlugin<S, R> {
    /// Initialize the plugin, loading preferences from `store`
    pub fn init(mut store: S, reader: R) -> Self {
        let preferences = Preferences::load(&mut store);
        log::debug!("{} initialized with {:?}", PLUGIN_NAME, preferences);
        GsfPlugin {
            store,
            reader,
            preferences,
        }
    }

    /// Current preferences
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Replace the preferences; they apply from the next played track
    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    /// Write the preferences to the store without shutting down
    pub fn save_preferences(&mut self) -> Result<()> {
        self.preferences.save(&mut self.store);
        self.store.flush()
    }

    /// Whether `path` has one of the plugin's extensions
    pub fn handles_path(&self, path: impl AsRef<Path>) -> bool {
        handles_path(path.as_ref())
    }

    /// Play `path` until `host` stops it.
    ///
    /// Any failure is logged and reported as `false`, which hosts treat as
    /// "could not play this track".
    pub fn play<C, H>(&self, core: &mut C, host: &mut H, path: impl AsRef<Path>) -> bool
    where
        C: EmulatorCore + ?Sized,
        H: HostTransport + ?Sized,
    {
        let path = path.as_ref();
        core.configure(&self.preferences.core_settings());
        match playback::play(core, host, path) {
            Ok(_) => true,
            Err(e) => {
                log::error!("{}", e);
                false
            }
        }
    }

    /// Playlist metadata for `path`
    pub fn read_metadata(&self, path: impl AsRef<Path>) -> TrackMetadata {
        read_metadata(&self.reader, path)
    }

    /// Shut the plugin down, saving preferences.
    ///
    /// Returns the store so callers can inspect or reuse it.
    pub fn cleanup(mut self) -> Result<S> {
        log::debug!("{} cleanup", PLUGIN_NAME);
        self.save_preferences()?;
        Ok(self.store)
    }
}

/// Whether `path` has a GSF or minigsf extension (case-insensitive)
pub fn handles_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JsonConfigStore;
    use crate::tags::PsfTagReader;

    #[test]
    fn test_extensions() {
        assert!(handles_path(Path::new("song.gsf")));
        assert!(handles_path(Path::new("dir/01 Title.MINIGSF")));
        assert!(!handles_path(Path::new("set.gsflib")));
        assert!(!handles_path(Path::new("readme")));
    }

    #[test]
    fn test_init_and_cleanup_round_trip_preferences() {
        let plugin = GsfPlugin::init(JsonConfigStore::in_memory(), PsfTagReader);
        assert_eq!(*plugin.preferences(), Preferences::default());

        let mut plugin = plugin;
        plugin.set_preferences(Preferences {
            track_length: 60,
            ..Preferences::default()
        });
        let mut store = plugin.cleanup().unwrap();

        assert_eq!(Preferences::load(&mut store).track_length, 60);
    }
}
