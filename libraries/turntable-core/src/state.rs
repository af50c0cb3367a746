//! Player state machine
//!
//! Status is kept as independent flags, but transitions only go through the
//! methods below, which keep the reachable combinations consistent:
//! - loading and error are never set together
//! - empty or error always imply not playing
//!
//! Transitions that need the outside world (pausing the transport, releasing
//! a handle, repainting placeholders) are returned as [`StateCommand`]s for
//! the caller to execute.

use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Message shown while the playlist is empty
pub const EMPTY_MESSAGE: &str = "The playlist is empty, add a file.";

/// Side effects requested by a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCommand {
    /// Ask the transport to pause
    PauseTransport,

    /// Release the resource handle of the loaded track
    ReleaseCurrentHandle,

    /// Replace displayed track info with the empty placeholders
    ShowEmptyPlaceholder,
}

/// Which controls accept input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlState {
    /// Also enabled during a `PlaybackNotAllowed` error, when
    /// `is_action_allowed()` is false: a press is the user gesture the
    /// browser asked for.
    pub play_pause: bool,
    pub prev: bool,
    pub next: bool,
    pub add_local: bool,
    pub progress: bool,
    pub tonearm: bool,
}

/// Snapshot of the status flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub is_playing: bool,
    pub is_loading: bool,
    pub has_error: bool,
    pub is_empty: bool,
}

/// Player state for the widget's lifetime
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    is_playing: bool,
    is_loading: bool,
    has_error: bool,
    is_empty: bool,
    error_kind: Option<ErrorKind>,
    message: Option<String>,

    pub current_track_index: usize,
    pub is_dragging_tonearm: bool,
    pub is_dragging_progress: bool,
    pub was_playing_before_drag: bool,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    /// Error or empty-playlist text currently shown
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging_tonearm || self.is_dragging_progress
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            is_playing: self.is_playing,
            is_loading: self.is_loading,
            has_error: self.has_error,
            is_empty: self.is_empty,
        }
    }

    /// Gate for play/pause/toggle, progress clicks and drag starts
    pub fn is_action_allowed(&self) -> bool {
        !self.is_loading && !self.has_error && !self.is_empty
    }

    /// Error that a press of the play button may clear
    pub fn has_remediable_error(&self) -> bool {
        self.has_error && self.error_kind.is_some_and(ErrorKind::needs_user_gesture)
    }

    pub fn set_loading(&mut self, loading: bool) -> Vec<StateCommand> {
        if self.is_loading == loading {
            return Vec::new();
        }
        debug!("Loading state: {}", loading);
        self.is_loading = loading;
        if loading && self.has_error {
            self.clear_error_flag();
        }
        Vec::new()
    }

    /// Enter (`Some`) or leave (`None`) the error state
    ///
    /// Entering is a no-op when the same message is already shown.
    pub fn set_error(&mut self, error: Option<(ErrorKind, String)>) -> Vec<StateCommand> {
        let mut commands = Vec::new();
        match error {
            Some((kind, message)) => {
                if self.has_error && self.message.as_deref() == Some(message.as_str()) {
                    return commands;
                }
                debug!("Error state: {:?} ({})", kind, message);
                self.has_error = true;
                self.error_kind = Some(kind);
                self.message = Some(message);
                self.is_loading = false;
                if self.is_playing {
                    self.is_playing = false;
                    commands.push(StateCommand::PauseTransport);
                }
            }
            None => {
                if !self.has_error {
                    return commands;
                }
                debug!("Error state cleared");
                self.clear_error_flag();
            }
        }
        commands
    }

    pub fn set_empty(&mut self, empty: bool) -> Vec<StateCommand> {
        let mut commands = Vec::new();
        if self.is_empty == empty {
            return commands;
        }
        self.is_empty = empty;
        if empty {
            debug!("Playlist is empty");
            self.message = Some(EMPTY_MESSAGE.to_string());
            commands.push(StateCommand::ShowEmptyPlaceholder);
            if self.is_playing {
                self.is_playing = false;
                commands.push(StateCommand::PauseTransport);
            }
            commands.push(StateCommand::ReleaseCurrentHandle);
        } else if self.message.as_deref() == Some(EMPTY_MESSAGE) {
            self.message = None;
        }
        commands
    }

    /// Transport reported that playback started
    ///
    /// Clears loading and error. Refused while empty; the caller should
    /// pause the transport in that case.
    pub fn start_playing(&mut self) -> bool {
        if self.is_empty {
            return false;
        }
        self.is_playing = true;
        self.is_loading = false;
        if self.has_error {
            self.clear_error_flag();
        }
        true
    }

    /// Transport reported that playback stopped
    pub fn stop_playing(&mut self) {
        self.is_playing = false;
    }

    fn clear_error_flag(&mut self) {
        self.has_error = false;
        self.error_kind = None;
        self.message = self.is_empty.then(|| EMPTY_MESSAGE.to_string());
    }

    pub fn controls(&self, playlist_len: usize) -> ControlState {
        let enabled = self.is_action_allowed();
        let navigable = !self.is_loading && !self.is_empty && playlist_len > 1;
        ControlState {
            play_pause: enabled || self.has_remediable_error(),
            prev: navigable,
            next: navigable,
            add_local: true,
            progress: enabled,
            tonearm: enabled,
        }
    }
}
