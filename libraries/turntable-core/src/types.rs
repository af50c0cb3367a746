//! Core types for the turntable player

use crate::error::{Result, TurntableError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Poem shown next to a track
///
/// Pure display data; missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Poem {
    pub title: String,
    pub author: String,
    pub content: String,
    pub date: String,
    pub location: String,
    pub tags: Vec<String>,
}

/// A user-selected audio file
///
/// The bytes are kept so a released handle can be re-acquired when the
/// track is loaded again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// File name as chosen by the user
    pub name: String,

    /// MIME type reported by the platform (may be empty)
    pub mime_type: String,

    /// Raw audio bytes
    pub data: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// File name without its final extension
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(dot) if dot > 0 => &self.name[..dot],
            _ => &self.name,
        }
    }
}

/// Where a track's audio comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Static URL
    Remote(String),

    /// Local file played through a resource handle
    Local(Arc<LocalFile>),
}

/// Playlist entry
///
/// Immutable once added to the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub source: AudioSource,

    /// Cover art URL or data URI
    pub album_art: Option<String>,

    pub poem: Option<Poem>,

    /// Name of the file a local track was created from
    pub original_file_name: Option<String>,
}

impl Track {
    /// Create a track streamed from a URL
    pub fn remote(
        title: impl Into<String>,
        artist: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            source: AudioSource::Remote(url.into()),
            album_art: None,
            poem: None,
            original_file_name: None,
        }
    }

    pub fn with_album_art(mut self, album_art: impl Into<String>) -> Self {
        self.album_art = Some(album_art.into());
        self
    }

    pub fn with_poem(mut self, poem: Poem) -> Self {
        self.poem = Some(poem);
        self
    }

    pub fn is_local(&self) -> bool {
        matches!(self.source, AudioSource::Local(_))
    }
}

/// Serialisable form of a seed playlist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTrack {
    pub title: String,
    pub artist: String,
    pub audio_src: String,
    #[serde(default)]
    pub album_art: Option<String>,
    #[serde(default)]
    pub poem: Option<Poem>,
}

impl From<RemoteTrack> for Track {
    fn from(track: RemoteTrack) -> Self {
        Self {
            title: track.title,
            artist: track.artist,
            source: AudioSource::Remote(track.audio_src),
            album_art: track.album_art,
            poem: track.poem,
            original_file_name: None,
        }
    }
}

/// Tonearm geometry and drag behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TonearmConfig {
    /// Angle when parked (default: 70°)
    pub resting_angle: f64,

    /// Angle over the record's lead-in (default: 100°)
    pub start_angle: f64,

    /// Lower drag limit (default: 65°)
    pub min_angle: f64,

    /// Upper drag limit (default: 110°)
    pub max_angle: f64,

    /// Minimum interval between applied moves (default: 50 ms, ~20 fps)
    pub throttle_ms: f64,
}

impl Default for TonearmConfig {
    fn default() -> Self {
        Self {
            resting_angle: 70.0,
            start_angle: 100.0,
            min_angle: 65.0,
            max_angle: 110.0,
            throttle_ms: 50.0,
        }
    }
}

/// Progress scrubbing behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubConfig {
    /// Minimum interval between applied moves (default: 30 ms, ~33 fps)
    pub throttle_ms: f64,

    /// Seeks smaller than this are skipped (default: 0.1 s)
    pub seek_epsilon_secs: f64,

    /// Delay before resuming playback after a scrub (default: 10 ms)
    pub resume_delay_ms: f64,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            throttle_ms: 30.0,
            seek_epsilon_secs: 0.1,
            resume_delay_ms: 10.0,
        }
    }
}

/// Art shown while the real cover is loading or unavailable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub loading: String,
    pub empty: String,
    pub local_file: String,
    pub no_cover: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            loading: "https://via.placeholder.com/200/eee/ccc?text=Loading".to_string(),
            empty: "https://via.placeholder.com/200/666/ccc?text=Empty".to_string(),
            local_file: "https://via.placeholder.com/200/ccc/888?text=Local+File".to_string(),
            no_cover: "https://via.placeholder.com/200/999/eee?text=No+Cover".to_string(),
        }
    }
}

/// Configuration for the turntable widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurntableConfig {
    pub tonearm: TonearmConfig,
    pub scrub: ScrubConfig,

    /// Delay between a ready signal and an autoplay command (default: 50 ms)
    pub autoplay_delay_ms: f64,

    /// Below this position "previous" restarts the track (default: 3 s)
    pub restart_threshold_secs: f64,

    /// Delay before a transient notice appears (default: 100 ms)
    pub notice_delay_ms: f64,

    /// How long a transient notice stays visible (default: 3000 ms)
    pub notice_duration_ms: f64,

    pub placeholders: Placeholders,

    /// Seed playlist
    pub playlist: Vec<RemoteTrack>,
}

impl Default for TurntableConfig {
    fn default() -> Self {
        Self {
            tonearm: TonearmConfig::default(),
            scrub: ScrubConfig::default(),
            autoplay_delay_ms: 50.0,
            restart_threshold_secs: 3.0,
            notice_delay_ms: 100.0,
            notice_duration_ms: 3000.0,
            placeholders: Placeholders::default(),
            playlist: Vec::new(),
        }
    }
}

impl TurntableConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(TurntableError::Config)
    }
}
