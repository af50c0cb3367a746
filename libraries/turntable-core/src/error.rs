//! Error types for the turntable player

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure categories reported by the transport or raised during ingestion.
///
/// Only [`ErrorKind::Aborted`] is silent; every other kind carries a message
/// shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Load was aborted (source replaced, user navigated away)
    Aborted,

    /// Network failure while fetching the media
    NetworkFailure,

    /// Media could not be decoded
    DecodeFailure,

    /// Media format or source is not supported
    FormatUnsupported,

    /// Unrecognised media error code
    Unknown(u16),

    /// Autoplay policy rejected `play()`; needs a user gesture
    PlaybackNotAllowed,

    /// Resource handle for a local file could not be created
    AllocationFailure,

    /// Embedded tags could not be read (non-fatal)
    MetadataReadFailure,
}

impl ErrorKind {
    /// Map an HTML `MediaError.code` to an error kind
    pub fn from_media_error_code(code: u16) -> Self {
        match code {
            1 => Self::Aborted,
            2 => Self::NetworkFailure,
            3 => Self::DecodeFailure,
            4 => Self::FormatUnsupported,
            other => Self::Unknown(other),
        }
    }

    /// Map the `DOMException` name of a rejected play promise
    pub fn from_play_rejection(name: &str) -> Self {
        match name {
            "NotAllowedError" => Self::PlaybackNotAllowed,
            "AbortError" => Self::Aborted,
            "NotSupportedError" => Self::FormatUnsupported,
            _ => Self::Unknown(0),
        }
    }

    /// Message to display, `None` for kinds that are not user-facing
    pub fn user_message(self) -> Option<String> {
        let message = match self {
            Self::Aborted => return None,
            Self::NetworkFailure => "Network error, the audio could not be loaded.".to_string(),
            Self::DecodeFailure => {
                "The audio file could not be decoded; it may be corrupted or unsupported."
                    .to_string()
            }
            Self::FormatUnsupported => "This audio format is not supported.".to_string(),
            Self::Unknown(code) => format!("An unknown audio error occurred (code: {code})."),
            Self::PlaybackNotAllowed => {
                "The browser blocked autoplay, press play to start.".to_string()
            }
            Self::AllocationFailure => "Failed to create a link to the local audio.".to_string(),
            Self::MetadataReadFailure => "Could not read the file's details.".to_string(),
        };
        Some(message)
    }

    /// Whether a user gesture (pressing play) clears this error
    pub fn needs_user_gesture(self) -> bool {
        matches!(self, Self::PlaybackNotAllowed)
    }
}

/// A handle provider could not allocate a resource handle
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to allocate resource handle for {file}: {reason}")]
pub struct AllocationError {
    pub file: String,
    pub reason: String,
}

/// A tag reader could not read embedded metadata
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to read tags from {file}: {reason}")]
pub struct MetadataReadError {
    pub file: String,
    pub reason: String,
}

/// Errors returned from widget operations
#[derive(Debug, Error)]
pub enum TurntableError {
    /// The transport cannot play the file's format
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Resource handle allocation failed
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for turntable operations
pub type Result<T> = std::result::Result<T, TurntableError>;
