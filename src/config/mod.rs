//! Preferences & Configuration Store
//!
//! The six plugin settings, their defaults, and how they are loaded from and
//! saved to the host's configuration store.

pub mod store;

pub use store::{ConfigStore, JsonConfigStore};

use crate::emulator::CoreSettings;

/// Configuration section holding the plugin settings
pub const CONFIG_SECTION: &str = "highlyadvanced";

const KEY_LOOP_FOREVER: &str = "loop_forever";
const KEY_IGNORE_TRACK_LENGTH: &str = "ignore_track_length";
const KEY_TRACK_LENGTH: &str = "track_length";
const KEY_DETECT_SILENCE: &str = "detect_silence";
const KEY_SILENCE_LENGTH: &str = "silence_length";
const KEY_LOW_PASS_FILTER: &str = "enable_low_pass_filter";

/// Stored defaults, in the store's string form
pub const DEFAULTS: &[(&str, &str)] = &[
    (KEY_LOW_PASS_FILTER, "1"),
    (KEY_DETECT_SILENCE, "1"),
    (KEY_SILENCE_LENGTH, "5"),
    (KEY_IGNORE_TRACK_LENGTH, "0"),
    (KEY_TRACK_LENGTH, "150"),
    (KEY_LOOP_FOREVER, "1"),
];

/// Plugin preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    /// Loop tracks instead of ending them
    pub loop_forever: bool,
    /// Use `track_length` even when the file has a length tag
    pub ignore_track_length: bool,
    /// Length of untagged tracks, in seconds
    pub track_length: u32,
    /// End tracks after `silence_length` seconds of silence
    pub detect_silence: bool,
    /// Silence that ends a track, in seconds
    pub silence_length: u32,
    /// Run the core's low-pass output filter
    pub enable_low_pass_filter: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            loop_forever: true,
            ignore_track_length: false,
            track_length: 150,
            detect_silence: true,
            silence_length: 5,
            enable_low_pass_filter: true,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn format_bool(value: bool) -> String {
    let flag = if value { "1" } else { "0" };
    flag.to_string()
}

fn read_value<S, T>(store: &S, key: &str, parse: impl Fn(&str) -> Option<T>, default: T) -> T
where
    S: ConfigStore + ?Sized,
{
    match store.get(CONFIG_SECTION, key) {
        Some(raw) => parse(&raw).unwrap_or_else(|| {
            log::warn!("Ignoring invalid value {:?} for '{}'", raw, key);
            default
        }),
        None => default,
    }
}

impl Preferences {
    /// Load preferences, writing missing defaults into `store` first.
    ///
    /// Values that do not parse fall back to their default.
    pub fn load<S: ConfigStore + ?Sized>(store: &mut S) -> Self {
        store.set_defaults(CONFIG_SECTION, DEFAULTS);

        let defaults = Preferences::default();
        let int = |raw: &str| raw.trim().parse::<u32>().ok();
        Preferences {
            loop_forever: read_value(store, KEY_LOOP_FOREVER, parse_bool, defaults.loop_forever),
            ignore_track_length: read_value(
                store,
                KEY_IGNORE_TRACK_LENGTH,
                parse_bool,
                defaults.ignore_track_length,
            ),
            track_length: read_value(store, KEY_TRACK_LENGTH, int, defaults.track_length),
            detect_silence: read_value(
                store,
                KEY_DETECT_SILENCE,
                parse_bool,
                defaults.detect_silence,
            ),
            silence_length: read_value(store, KEY_SILENCE_LENGTH, int, defaults.silence_length),
            enable_low_pass_filter: read_value(
                store,
                KEY_LOW_PASS_FILTER,
                parse_bool,
                defaults.enable_low_pass_filter,
            ),
        }
    }

    /// Write all preferences to `store`
    pub fn save<S: ConfigStore + ?Sized>(&self, store: &mut S) {
        store.set(CONFIG_SECTION, KEY_LOOP_FOREVER, format_bool(self.loop_forever));
        store.set(
            CONFIG_SECTION,
            KEY_IGNORE_TRACK_LENGTH,
            format_bool(self.ignore_track_length),
        );
        store.set(CONFIG_SECTION, KEY_TRACK_LENGTH, self.track_length.to_string());
        store.set(CONFIG_SECTION, KEY_DETECT_SILENCE, format_bool(self.detect_silence));
        store.set(CONFIG_SECTION, KEY_SILENCE_LENGTH, self.silence_length.to_string());
        store.set(
            CONFIG_SECTION,
            KEY_LOW_PASS_FILTER,
            format_bool(self.enable_low_pass_filter),
        );
    }

    /// Settings handed to the emulator core
    pub fn core_settings(&self) -> CoreSettings {
        CoreSettings::from(self)
    }
}

impl From<&Preferences> for CoreSettings {
    fn from(prefs: &Preferences) -> Self {
        CoreSettings {
            play_forever: prefs.loop_forever,
            ignore_track_length: prefs.ignore_track_length,
            default_length_ms: prefs.track_length.saturating_mul(1000),
            detect_silence: prefs.detect_silence,
            silence_length_secs: prefs.silence_length,
            low_pass_filter: prefs.enable_low_pass_filter,
        }
    }
}
