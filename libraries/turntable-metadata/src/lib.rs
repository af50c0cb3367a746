//! Turntable - Tag Reading
//!
//! Embedded tag extraction for local files added to the turntable widget.
//!
//! This crate provides:
//! - Title and artist from the file's primary (or first) tag
//! - Cover art, preferring the front cover, as a data URI source
//! - Reading straight from in-memory bytes (no filesystem access)
//!
//! # Example
//!
//! ```rust
//! use turntable_core::{LocalFile, TagReader};
//! use turntable_metadata::LoftyTagReader;
//!
//! let reader = LoftyTagReader::new();
//! let file = LocalFile::new("broken.mp3", "audio/mpeg", vec![0xde, 0xad, 0xbe, 0xef]);
//!
//! // Unreadable tags are an error the widget recovers from
//! assert!(reader.read(&file).is_err());
//! ```

mod error;
mod reader;

pub use error::{MetadataError, Result};
pub use reader::{LoftyTagReader, MAX_ARTWORK_SIZE};
