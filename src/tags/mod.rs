//! PSF Tag Access
//!
//! Tags are `key=value` lines in the text block that follows a PSF file's
//! `[TAG]` marker. Keys are case-insensitive. A key repeated on several
//! lines forms one multi-line value.

pub mod length;
pub mod reader;

pub use length::parse_length_ms;
pub use reader::PsfTagReader;

use crate::Result;
use std::collections::HashMap;
use std::path::Path;

/// Read access to a file's tags
pub trait TagBlob {
    /// Decoded value: whitespace-trimmed, repeated lines joined with `\n`.
    fn get(&self, key: &str) -> Option<String>;

    /// First value for `key` exactly as written after `=`.
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Source of tag blobs for files
pub trait TagReader {
    /// Tag blob type produced by this reader
    type Tags: TagBlob;

    /// Read all tags of the file at `path`.
    fn read_tags(&self, path: &Path) -> Result<Self::Tags>;
}

/// Parsed tag text block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    /// Lower-cased key -> raw values in file order
    entries: HashMap<String, Vec<String>>,
}

impl TagSet {
    /// Create an empty tag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a tag text block.
    ///
    /// Lines without `=` or with an empty key are skipped.
    pub fn parse(text: &str) -> Self {
        let mut tags = TagSet::new();
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            tags.push(key, value.trim_end_matches('\r'));
        }
        tags
    }

    /// Append a value for `key`
    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.entries
            .entry(key.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no tags are present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn values(&self, key: &str) -> Option<&Vec<String>> {
        self.entries.get(&key.to_ascii_lowercase())
    }
}

impl TagBlob for TagSet {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values(key)?;
        let decoded: Vec<&str> = values.iter().map(|v| v.trim()).collect();
        Some(decoded.join("\n"))
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        self.values(key)?.first().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "title=  Kirby Dance \nArtist=Jun Ishikawa\ncomment=line one\n\
                          comment=line two\nlength=1:02.5 \njunk line\n=orphan\n";

    #[test]
    fn test_parse_and_lookup() {
        let tags = TagSet::parse(SAMPLE);
        assert_eq!(tags.len(), 4);
        assert_eq!(tags.get("title").as_deref(), Some("Kirby Dance"));
        assert_eq!(tags.get("ARTIST").as_deref(), Some("Jun Ishikawa"));
        assert_eq!(tags.get("missing"), None);
    }

    #[test]
    fn test_multiline_value() {
        let tags = TagSet::parse(SAMPLE);
        assert_eq!(tags.get("comment").as_deref(), Some("line one\nline two"));
        assert_eq!(tags.get_raw("comment").as_deref(), Some("line one"));
    }

    #[test]
    fn test_raw_keeps_whitespace() {
        let tags = TagSet::parse(SAMPLE);
        assert_eq!(tags.get_raw("title").as_deref(), Some("  Kirby Dance "));
        assert_eq!(tags.get_raw("length").as_deref(), Some("1:02.5 "));
    }

    #[test]
    fn test_crlf_lines() {
        let tags = TagSet::parse("game=Golden Sun\r\nyear=2001\r\n");
        assert_eq!(tags.get_raw("game").as_deref(), Some("Golden Sun"));
        assert_eq!(tags.get("year").as_deref(), Some("2001"));
    }
}
