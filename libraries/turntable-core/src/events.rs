//! Widget Events
//!
//! Event-based communication with the host. Events are queued while the
//! widget handles input and drained by the host afterwards:
//! - Status changes (playing, loading, error, empty)
//! - Track changes
//! - Cover art requests (the host loads the image and reports back)
//! - Playlist growth
//! - Errors and transient notices

use crate::error::ErrorKind;
use crate::loader::LoadEpoch;
use crate::state::StatusSnapshot;
use serde::Serialize;

/// Events emitted by the widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WidgetEvent {
    /// One of the status flags changed
    StateChanged {
        /// Flags after the change
        status: StatusSnapshot,
    },

    /// A different track was loaded
    TrackChanged {
        index: usize,
        title: String,
        artist: String,
    },

    /// Cover art should be loaded; report with `Turntable::art_resolved`
    ArtRequested {
        /// Load the request belongs to
        epoch: LoadEpoch,
        /// Image URL or data URI
        src: String,
    },

    /// A track was appended
    PlaylistChanged {
        /// New playlist length
        length: usize,
    },

    /// A user-facing error was entered
    Error { kind: ErrorKind, message: String },

    /// A transient notice became visible
    Notice { message: String },
}
