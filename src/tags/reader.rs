//! PSF Tag Reader
//!
//! Reads the tag text block of a GSF/minigsf file from disk. The header
//! sizes are used only to find where the `[TAG]` block must start; the
//! reserved area and program data are left to the core.

use super::{TagReader, TagSet};
use crate::{GsfError, Result};
use std::fs;
use std::path::Path;

/// Signature at the start of every PSF-family file
pub const PSF_SIGNATURE: &[u8] = b"PSF";

/// Marker preceding the tag text block
pub const TAG_MARKER: &[u8] = b"[TAG]";

/// Header length: signature, version, reserved size, program size, CRC
pub const HEADER_LEN: usize = 16;

/// Largest tag text block read, in bytes
pub const MAX_TAG_BYTES: usize = 50_000;

fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Offset of the tag block: directly after the reserved area and program
fn tag_offset(data: &[u8]) -> Option<usize> {
    if data.len() < HEADER_LEN || !data.starts_with(PSF_SIGNATURE) {
        return None;
    }
    let reserved = usize::try_from(read_u32_le(data, 4)?).ok()?;
    let program = usize::try_from(read_u32_le(data, 8)?).ok()?;
    HEADER_LEN.checked_add(reserved)?.checked_add(program)
}

/// Reads tags from PSF-family files on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct PsfTagReader;

impl PsfTagReader {
    /// Extract the tag set from raw file contents.
    ///
    /// The `[TAG]` marker is only recognized right after the program data.
    /// Non-PSF data, truncated headers and files without a marker at that
    /// offset have no tags.
    pub fn parse_bytes(data: &[u8]) -> TagSet {
        let Some(start) = tag_offset(data) else {
            return TagSet::new();
        };
        let Some(block) = data.get(start..) else {
            return TagSet::new();
        };
        let Some(text) = block.strip_prefix(TAG_MARKER) else {
            return TagSet::new();
        };

        let text = &text[..text.len().min(MAX_TAG_BYTES)];
        TagSet::parse(&String::from_utf8_lossy(text))
    }
}

impl TagReader for PsfTagReader {
    type Tags = TagSet;

    fn read_tags(&self, path: &Path) -> Result<TagSet> {
        let data = fs::read(path).map_err(|e| {
            GsfError::TagError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Ok(Self::parse_bytes(&data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagBlob;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn psf_bytes(reserved: &[u8], program: &[u8], trailer: &[u8]) -> Vec<u8> {
        let mut data = b"PSF\x22".to_vec();
        data.extend_from_slice(&(reserved.len() as u32).to_le_bytes());
        data.extend_from_slice(&(program.len() as u32).to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        data.extend_from_slice(reserved);
        data.extend_from_slice(program);
        data.extend_from_slice(trailer);
        data
    }

    fn minigsf_bytes(tag_text: &str) -> Vec<u8> {
        let mut trailer = TAG_MARKER.to_vec();
        trailer.extend_from_slice(tag_text.as_bytes());
        psf_bytes(&[], &[], &trailer)
    }

    #[test]
    fn test_parse_bytes_after_marker() {
        let tags = PsfTagReader::parse_bytes(&minigsf_bytes("title=Opening\ngame=Mother 3\n"));
        assert_eq!(tags.get("title").as_deref(), Some("Opening"));
        assert_eq!(tags.get("game").as_deref(), Some("Mother 3"));
    }

    #[test]
    fn test_no_marker_means_no_tags() {
        let tags = PsfTagReader::parse_bytes(b"PSF\x22\x00\x00\x00\x00");
        assert!(tags.is_empty());
    }

    #[test]
    fn test_marker_after_reserved_and_program() {
        let data = psf_bytes(b"\x01\x02\x03", b"\x78\x9c\x00", b"[TAG]title=Battle\n");
        let tags = PsfTagReader::parse_bytes(&data);
        assert_eq!(tags.get("title").as_deref(), Some("Battle"));
    }

    #[test]
    fn test_marker_inside_program_is_ignored() {
        let data = psf_bytes(&[], b"xx[TAG]title=Wrong\n\0\x01", b"[TAG]title=Right\n");
        let tags = PsfTagReader::parse_bytes(&data);
        assert_eq!(tags.get("title").as_deref(), Some("Right"));

        let data = psf_bytes(&[], b"xx[TAG]title=Wrong\n\0\x01", b"");
        assert!(PsfTagReader::parse_bytes(&data).is_empty());
    }

    #[test]
    fn test_truncated_header() {
        assert!(PsfTagReader::parse_bytes(b"").is_empty());
        assert!(PsfTagReader::parse_bytes(b"PSF").is_empty());
        assert!(PsfTagReader::parse_bytes(b"PSF\x22\x00\x00\x00\x00\x05").is_empty());
    }

    #[test]
    fn test_sizes_past_end_of_file() {
        let mut data = minigsf_bytes("title=Lost\n");
        data[8..12].copy_from_slice(&u32::MAX.to_le_bytes());
        data[4..8].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(PsfTagReader::parse_bytes(&data).is_empty());

        let mut data = minigsf_bytes("title=Lost\n");
        data[8..12].copy_from_slice(&1000u32.to_le_bytes());
        assert!(PsfTagReader::parse_bytes(&data).is_empty());
    }

    #[test]
    fn test_non_psf_data_has_no_tags() {
        let mut data = minigsf_bytes("title=Fake\n");
        data[..3].copy_from_slice(b"RIF");
        assert!(PsfTagReader::parse_bytes(&data).is_empty());
    }

    #[test]
    fn test_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&minigsf_bytes("artist=Motoi Sakuraba\n")).unwrap();
        file.flush().unwrap();

        let tags = PsfTagReader.read_tags(file.path()).unwrap();
        assert_eq!(tags.get("artist").as_deref(), Some("Motoi Sakuraba"));
    }

    #[test]
    fn test_missing_file() {
        let result = PsfTagReader.read_tags(Path::new("/nonexistent/track.minigsf"));
        assert!(matches!(result, Err(GsfError::TagError(_))));
    }
}
