/// Tag reader implementation using lofty
use crate::error::{MetadataError, Result};
use lofty::{PictureType, Probe, TaggedFileExt};
use std::io::Cursor;
use tracing::{debug, warn};
use turntable_core::{LocalFile, MetadataReadError, Picture, TagReader, TrackTags};

/// Maximum embedded artwork size (5 MB)
pub const MAX_ARTWORK_SIZE: usize = 5 * 1024 * 1024;

/// Tag reader using the lofty library
pub struct LoftyTagReader {
    max_artwork_size: usize,
}

impl LoftyTagReader {
    /// Create a new tag reader
    pub fn new() -> Self {
        Self {
            max_artwork_size: MAX_ARTWORK_SIZE,
        }
    }

    /// Skip embedded pictures larger than `bytes`
    pub fn with_max_artwork_size(mut self, bytes: usize) -> Self {
        self.max_artwork_size = bytes;
        self
    }

    /// Read tags from in-memory file contents
    ///
    /// A file without tags yields empty [`TrackTags`]; only unreadable
    /// content is an error.
    pub fn read_bytes(&self, data: &[u8]) -> Result<TrackTags> {
        if data.is_empty() {
            return Err(MetadataError::EmptyFile);
        }

        let tagged_file = Probe::new(Cursor::new(data)).guess_file_type()?.read()?;

        // Get primary tag or first available tag
        let Some(tag) = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
        else {
            debug!("No tags found");
            return Ok(TrackTags::default());
        };

        let mut tags = TrackTags::default();
        for item in tag.items() {
            match item.key() {
                lofty::ItemKey::TrackTitle => tags.title = clean_text(item.value().text()),
                lofty::ItemKey::TrackArtist => tags.artist = clean_text(item.value().text()),
                _ => {}
            }
        }

        // Prefer front cover, otherwise use first picture
        let pictures = tag.pictures();
        let picture = pictures
            .iter()
            .find(|p| matches!(p.pic_type(), PictureType::CoverFront))
            .or_else(|| pictures.first());

        if let Some(picture) = picture {
            let data = picture.data();
            if data.len() > self.max_artwork_size {
                warn!(
                    "Artwork too large ({} bytes, max {} bytes), skipping",
                    data.len(),
                    self.max_artwork_size
                );
            } else {
                // Default to "image/jpeg" if not specified
                let mime_type = picture
                    .mime_type()
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| "image/jpeg".to_string());
                tags.picture = Some(Picture::new(data.to_vec(), mime_type));
            }
        }

        Ok(tags)
    }
}

impl Default for LoftyTagReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TagReader for LoftyTagReader {
    fn read(&self, file: &LocalFile) -> std::result::Result<TrackTags, MetadataReadError> {
        self.read_bytes(&file.data).map_err(|e| {
            warn!("Failed to read tags from {}: {}", file.name, e);
            e.for_file(&file.name)
        })
    }
}

/// Trim padding and drop blank values
fn clean_text(text: Option<&str>) -> Option<String> {
    let text = text?.trim_end_matches('\0').trim();
    (!text.is_empty()).then(|| text.to_string())
}
