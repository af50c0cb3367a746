//! Platform-agnostic media transport
//!
//! Abstracts the platform's audio element. Commands go in through
//! [`Transport`]; everything the element reports comes back as a
//! [`TransportEvent`] fed to `Turntable::handle_transport_event`.

use crate::error::ErrorKind;
use crate::loader::LoadEpoch;
use serde::{Deserialize, Serialize};

/// Media transport (the browser's `<audio>` element or a native stand-in)
///
/// Commands are requests: the resulting state change is observed through
/// the events the transport emits, never assumed to be synchronous.
pub trait Transport {
    /// Replace the source and start loading it from position 0
    ///
    /// `Ready` and `Error` events for this source must carry `epoch`.
    fn load(&mut self, source: &str, epoch: LoadEpoch);

    /// Request playback of the source loaded for `epoch`
    ///
    /// A refusal arrives as [`TransportEvent::PlayRejected`] carrying the
    /// same epoch, however late the platform reports it.
    fn play(&mut self, epoch: LoadEpoch);

    /// Request pause; confirmed by [`TransportEvent::Pause`]
    fn pause(&mut self);

    /// Move the playback position
    fn seek(&mut self, seconds: f64);

    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Track duration, `None` while unknown
    fn duration(&self) -> Option<f64>;

    /// Whether the element is currently paused
    fn is_paused(&self) -> bool;

    /// Whether the platform can decode the given MIME type
    fn can_play_type(&self, _mime_type: &str) -> bool {
        true
    }
}

/// Normalise a reported duration: zero, negative and non-finite mean unknown
pub fn known_duration(duration: f64) -> Option<f64> {
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

/// Events emitted by the transport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransportEvent {
    Play,
    Pause,
    Ended,
    TimeUpdate,
    LoadedMetadata,
    Waiting,
    Playing,

    /// First frame of the source loaded for `epoch` is available
    Ready(LoadEpoch),

    /// Media error while loading or playing the source for `epoch`
    Error { epoch: LoadEpoch, kind: ErrorKind },

    /// A `play()` request issued during load `epoch` was refused
    PlayRejected { epoch: LoadEpoch, kind: ErrorKind },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_durations() {
        assert_eq!(known_duration(200.0), Some(200.0));
        assert_eq!(known_duration(0.0), None);
        assert_eq!(known_duration(-1.0), None);
        assert_eq!(known_duration(f64::NAN), None);
        assert_eq!(known_duration(f64::INFINITY), None);
    }
}
