//! Turntable - Player Widget Core
//!
//! Platform-agnostic core of a turntable-styled audio player widget.
//!
//! This crate provides:
//! - Playback state machine (playing, loading, error, empty)
//! - Track loading with stale-event suppression
//! - Tonearm drag gesture with anchor snapping
//! - Progress bar scrubbing with rate-limited seeks
//! - Resource handle registry for local files
//! - Local file ingestion with tag fallbacks
//!
//! # Architecture
//!
//! `turntable-core` owns no platform objects:
//! - Audio playback goes through the [`Transport`] trait
//! - Local file handles come from a [`HandleProvider`]
//! - Embedded tags are read by an optional [`TagReader`]
//! - Time is supplied by the host via [`Turntable::tick`]
//!
//! The host paints [`Turntable::view`] and drains [`Turntable::drain_events`]
//! after forwarding input. Browser bindings live behind the `wasm` feature.
//!
//! # Example
//!
//! ```rust
//! use turntable_core::{
//!     LoadEpoch, MemoryHandleProvider, Transport, TransportEvent, Turntable,
//!     TurntableConfig,
//! };
//!
//! #[derive(Default)]
//! struct SilentTransport {
//!     time: f64,
//!     paused: bool,
//! }
//!
//! impl Transport for SilentTransport {
//!     fn load(&mut self, _source: &str, _epoch: LoadEpoch) {
//!         self.time = 0.0;
//!     }
//!     fn play(&mut self, _epoch: LoadEpoch) {
//!         self.paused = false;
//!     }
//!     fn pause(&mut self) {
//!         self.paused = true;
//!     }
//!     fn seek(&mut self, seconds: f64) {
//!         self.time = seconds;
//!     }
//!     fn current_time(&self) -> f64 {
//!         self.time
//!     }
//!     fn duration(&self) -> Option<f64> {
//!         Some(180.0)
//!     }
//!     fn is_paused(&self) -> bool {
//!         self.paused
//!     }
//! }
//!
//! let config = TurntableConfig::from_json(
//!     r#"{"playlist": [{"title": "Song", "artist": "Band", "audio_src": "song.mp3"}]}"#,
//! )
//! .unwrap();
//!
//! let mut turntable = Turntable::new(config, SilentTransport::default(), MemoryHandleProvider::new());
//! turntable.init();
//! assert!(turntable.state().is_loading());
//!
//! let epoch = turntable.current_epoch();
//! turntable.handle_transport_event(TransportEvent::Ready(epoch));
//! assert!(turntable.is_action_allowed());
//! ```

mod error;
mod events;
mod geometry;
mod loader;
mod registry;
mod schedule;
mod scrub;
mod state;
mod tags;
mod throttle;
mod tonearm;
mod transport;
mod turntable;
pub mod types;
mod view;

// wasm-bindgen expands to unsafe glue
#[cfg(feature = "wasm")]
#[allow(unsafe_code)]
pub mod wasm;

// Public exports
pub use error::{AllocationError, ErrorKind, MetadataReadError, Result, TurntableError};
pub use events::WidgetEvent;
pub use geometry::{format_time, pointer_angle, MouseButton, Point, PointerInput, PointerSample, Rect};
pub use loader::{LoadEpoch, LoadTracker, PendingLoad};
pub use registry::{HandleProvider, HandleRegistry, MemoryHandleProvider, ResourceHandle};
pub use schedule::{Scheduler, Task};
pub use scrub::{scrub_target, ProgressScrub, ScrubUpdate};
pub use state::{ControlState, PlayerState, StateCommand, StatusSnapshot, EMPTY_MESSAGE};
pub use tags::{Picture, TagReader, TrackTags};
pub use throttle::RateLimiter;
pub use tonearm::{nearest_anchor, TonearmAnchor, TonearmGesture};
pub use transport::{known_duration, Transport, TransportEvent};
pub use turntable::Turntable;
pub use types::{
    AudioSource, LocalFile, Placeholders, Poem, RemoteTrack, ScrubConfig, TonearmConfig, Track,
    TurntableConfig,
};
pub use view::{ArtView, PoemView, ProgressView, TonearmView, WidgetView};
