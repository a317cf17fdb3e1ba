//! Track metadata from PSF tags.
//!
//! Maps a file's tags onto the fields a media player shows in its playlist.
//! A missing tag leaves its field unset; nothing here is an error.

use crate::tags::{parse_length_ms, TagBlob, TagReader};
use std::path::{Path, PathBuf};

/// Codec label reported for every GSF track
pub const CODEC: &str = "GameBoy Advanced Audio (GSF)";

/// Quality label reported for every GSF track
pub const QUALITY: &str = "sequenced";

/// Fade time added to the tagged length
pub const FADE_LENGTH_MS: u32 = 0;

/// Playlist metadata for one GSF/minigsf file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    /// File the metadata was read from
    pub filename: PathBuf,
    /// Track title (`title`)
    pub title: Option<String>,
    /// Composer (`artist`)
    pub artist: Option<String>,
    /// Game the track comes from (`game`)
    pub album: Option<String>,
    /// Release year (`year`)
    pub date: Option<String>,
    /// Copyright holder (`copyright`)
    pub copyright: Option<String>,
    /// Who ripped/tagged the set (`tagger`)
    pub tagger: Option<String>,
    /// Track length plus fade (`length`)
    pub length_ms: Option<u32>,
    /// Free-form comment (`comment`)
    pub comment: Option<String>,
    /// Codec label
    pub codec: &'static str,
    /// Quality label
    pub quality: &'static str,
}

impl TrackMetadata {
    /// Metadata carrying only the filename and the constant labels
    pub fn bare(filename: impl Into<PathBuf>) -> Self {
        TrackMetadata {
            filename: filename.into(),
            title: None,
            artist: None,
            album: None,
            date: None,
            copyright: None,
            tagger: None,
            length_ms: None,
            comment: None,
            codec: CODEC,
            quality: QUALITY,
        }
    }

    /// Fill fields from a tag blob
    pub fn from_tags(filename: impl Into<PathBuf>, tags: &impl TagBlob, fade_ms: u32) -> Self {
        TrackMetadata {
            title: tags.get("title"),
            artist: tags.get("artist"),
            album: tags.get("game"),
            date: tags.get("year"),
            copyright: tags.get("copyright"),
            tagger: tags.get("tagger"),
            length_ms: tags
                .get_raw("length")
                .and_then(|raw| parse_length_ms(&raw))
                .map(|length| length.saturating_add(fade_ms)),
            comment: tags.get("comment"),
            ..TrackMetadata::bare(filename)
        }
    }
}

/// Read the metadata of `path` through `reader`.
///
/// An unreadable file yields [`TrackMetadata::bare`].
pub fn read_metadata<R: TagReader + ?Sized>(reader: &R, path: impl AsRef<Path>) -> TrackMetadata {
    let path = path.as_ref();
    match reader.read_tags(path) {
        Ok(tags) => TrackMetadata::from_tags(path, &tags, FADE_LENGTH_MS),
        Err(e) => {
            log::warn!("No tags for '{}': {}", path.display(), e);
            TrackMetadata::bare(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagSet;
    use crate::{GsfError, Result};

    struct FailingReader;

    impl TagReader for FailingReader {
        type Tags = TagSet;

        fn read_tags(&self, path: &Path) -> Result<TagSet> {
            Err(GsfError::TagError(format!("cannot open {}", path.display())))
        }
    }

    #[test]
    fn test_tag_mapping() {
        let tags = TagSet::parse(
            "title=Battle\nartist=Sakuraba\ngame=Golden Sun\nyear=2001\n\
             copyright=Camelot\ntagger=Caitsith2\nlength=1:30\ncomment=loop\n",
        );
        let meta = TrackMetadata::from_tags("gs.minigsf", &tags, 0);

        assert_eq!(meta.title.as_deref(), Some("Battle"));
        assert_eq!(meta.artist.as_deref(), Some("Sakuraba"));
        assert_eq!(meta.album.as_deref(), Some("Golden Sun"));
        assert_eq!(meta.date.as_deref(), Some("2001"));
        assert_eq!(meta.copyright.as_deref(), Some("Camelot"));
        assert_eq!(meta.tagger.as_deref(), Some("Caitsith2"));
        assert_eq!(meta.length_ms, Some(90_000));
        assert_eq!(meta.comment.as_deref(), Some("loop"));
        assert_eq!(meta.codec, CODEC);
        assert_eq!(meta.quality, QUALITY);
    }

    #[test]
    fn test_missing_tags_stay_unset() {
        let tags = TagSet::parse("title=Only Title\n");
        let meta = TrackMetadata::from_tags("x.gsf", &tags, 0);
        assert_eq!(meta.title.as_deref(), Some("Only Title"));
        assert_eq!(meta.artist, None);
        assert_eq!(meta.album, None);
        assert_eq!(meta.length_ms, None);
    }

    #[test]
    fn test_fade_is_added_to_length() {
        let tags = TagSet::parse("length=10\n");
        let meta = TrackMetadata::from_tags("x.gsf", &tags, 4000);
        assert_eq!(meta.length_ms, Some(14_000));
    }

    #[test]
    fn test_bad_length_is_ignored() {
        let tags = TagSet::parse("length=forever\nartist=Someone\n");
        let meta = TrackMetadata::from_tags("x.gsf", &tags, 0);
        assert_eq!(meta.length_ms, None);
        assert_eq!(meta.artist.as_deref(), Some("Someone"));
    }

    #[test]
    fn test_unreadable_file_gives_bare_metadata() {
        let meta = read_metadata(&FailingReader, "gone.minigsf");
        assert_eq!(meta, TrackMetadata::bare("gone.minigsf"));
    }
}
