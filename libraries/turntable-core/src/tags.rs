//! Embedded tag reading
//!
//! Tag decoding lives outside the core; implementors plug in through
//! [`TagReader`].

use crate::error::MetadataReadError;
use crate::types::LocalFile;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Embedded picture (cover art)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    /// Raw image bytes
    pub data: Vec<u8>,
    /// MIME type (e.g., "image/jpeg")
    pub mime_type: String,
}

impl Picture {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Encode as a `data:` URI usable as an image source
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

/// Tags extracted from a local file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub picture: Option<Picture>,
}

/// Reads embedded metadata from a local file
pub trait TagReader {
    fn read(&self, file: &LocalFile) -> Result<TrackTags, MetadataReadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picture_data_uri() {
        let picture = Picture::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg");
        assert_eq!(picture.to_data_uri(), "data:image/jpeg;base64,/9j/");
    }
}
