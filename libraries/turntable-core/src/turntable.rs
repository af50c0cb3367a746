//! Turntable widget - core orchestration
//!
//! Coordinates the state machine, gestures, track loading, resource handles
//! and the transport.

use crate::{
    error::{ErrorKind, MetadataReadError, Result, TurntableError},
    events::WidgetEvent,
    geometry::{Point, PointerInput, Rect},
    loader::{LoadEpoch, LoadTracker},
    registry::{HandleProvider, HandleRegistry, ResourceHandle},
    schedule::{Scheduler, Task},
    scrub::ProgressScrub,
    state::{ControlState, PlayerState, StateCommand, StatusSnapshot},
    tags::{TagReader, TrackTags},
    tonearm::{TonearmAnchor, TonearmGesture},
    transport::{Transport, TransportEvent},
    types::{AudioSource, LocalFile, Poem, Track, TurntableConfig},
    view::{ArtView, PoemView, WidgetView},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

const UNKNOWN_TITLE: &str = "Unknown title";
const UNKNOWN_ARTIST: &str = "Unknown artist";
const LOCAL_ARTIST: &str = "Local file";

/// Turntable player widget
///
/// Owns all widget state for its lifetime. Platform pieces are injected:
/// - `T` plays audio and reports [`TransportEvent`]s
/// - `P` allocates resource handles for local files
/// - an optional [`TagReader`] extracts embedded tags
///
/// The host forwards input (transport events, pointer events, clock ticks),
/// paints [`Turntable::view`] and drains [`Turntable::drain_events`].
pub struct Turntable<T: Transport, P: HandleProvider> {
    config: TurntableConfig,
    transport: T,
    provider: P,
    tag_reader: Option<Box<dyn TagReader>>,

    playlist: Vec<Track>,
    state: PlayerState,
    handles: HandleRegistry,
    loader: LoadTracker,

    // Gestures
    tonearm: TonearmGesture,
    scrub: ProgressScrub,

    scheduler: Scheduler,
    progress_loop: bool,

    view: WidgetView,
    last_status: StatusSnapshot,
    pending_events: Vec<WidgetEvent>,
}

impl<T: Transport, P: HandleProvider> Turntable<T, P> {
    /// Create a widget with the config's seed playlist
    ///
    /// Nothing is loaded until [`Self::init`].
    pub fn new(config: TurntableConfig, transport: T, provider: P) -> Self {
        let playlist = config.playlist.iter().cloned().map(Track::from).collect();
        let view = WidgetView::new(
            config.tonearm.resting_angle,
            config.placeholders.loading.clone(),
        );

        Self {
            tonearm: TonearmGesture::new(config.tonearm.clone()),
            scrub: ProgressScrub::new(config.scrub.clone()),
            config,
            transport,
            provider,
            tag_reader: None,
            playlist,
            state: PlayerState::new(),
            handles: HandleRegistry::new(),
            loader: LoadTracker::new(),
            scheduler: Scheduler::new(),
            progress_loop: false,
            view,
            last_status: StatusSnapshot::default(),
            pending_events: Vec::new(),
        }
    }

    pub fn with_tag_reader(mut self, reader: Box<dyn TagReader>) -> Self {
        self.tag_reader = Some(reader);
        self
    }

    pub fn set_tag_reader(&mut self, reader: Option<Box<dyn TagReader>>) {
        self.tag_reader = reader;
    }

    /// Park the tonearm and load the first track without playing it
    pub fn init(&mut self) {
        self.view.tonearm.angle = self.config.tonearm.resting_angle;
        self.load_track_inner(0, false);
        self.update_button(false);
        self.sync();
    }

    // ===== Accessors =====

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn config(&self) -> &TurntableConfig {
        &self.config
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    pub fn view(&self) -> &WidgetView {
        &self.view
    }

    pub fn controls(&self) -> ControlState {
        self.state.controls(self.playlist.len())
    }

    pub fn is_action_allowed(&self) -> bool {
        self.state.is_action_allowed()
    }

    /// Epoch of the most recent load request
    pub fn current_epoch(&self) -> LoadEpoch {
        self.loader.current()
    }

    /// Whether the periodic progress refresh runs on each tick
    pub fn is_progress_loop_running(&self) -> bool {
        self.progress_loop
    }

    /// Handle of the loaded local track, if any
    pub fn current_handle(&self) -> Option<&ResourceHandle> {
        self.handles.current_handle()
    }

    pub fn live_handle_count(&self) -> usize {
        self.handles.live_count()
    }

    /// Track currently selected, `None` while the playlist is empty
    pub fn current_track_info(&self) -> Option<&Track> {
        if self.state.is_empty() {
            return None;
        }
        self.playlist.get(self.state.current_track_index)
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<WidgetEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Playback Control =====

    pub fn toggle_play_pause(&mut self) {
        if self.state.has_remediable_error() {
            self.set_error(None);
        }
        if self.state.is_action_allowed() {
            if self.state.is_playing() {
                self.pause_audio();
            } else {
                self.play_audio();
            }
        }
        self.sync();
    }

    /// Advance to the next track with autoplay
    ///
    /// A single-track playlist restarts its track instead of reloading.
    pub fn play_next(&mut self) {
        self.play_next_inner();
        self.sync();
    }

    /// Go back
    ///
    /// Below the restart threshold the current track restarts; past it the
    /// previous track is loaded with autoplay.
    pub fn play_prev(&mut self) {
        let len = self.playlist.len();
        if self.state.is_loading() || self.state.is_empty() || len <= 1 {
            return;
        }

        if self.transport.current_time() < self.config.restart_threshold_secs {
            self.transport.seek(0.0);
            self.update_progress();
            if self.state.is_playing() {
                self.start_progress_loop();
            } else {
                self.play_audio();
            }
        } else {
            let index = self.state.current_track_index as isize - 1;
            self.load_track_inner(index, true);
        }
        self.sync();
    }

    /// Load the track at `index` (wrapped into the playlist)
    pub fn load_track(&mut self, index: isize, autoplay: bool) {
        self.load_track_inner(index, autoplay);
        self.sync();
    }

    /// Space bar: toggles unless a text input has focus
    ///
    /// Returns whether the key was consumed.
    pub fn handle_space_key(&mut self, input_focused: bool) -> bool {
        if input_focused {
            return false;
        }
        self.toggle_play_pause();
        true
    }

    // ===== Local Files =====

    /// Add a user-selected file, reading tags with the configured reader
    pub fn add_local_track(&mut self, file: LocalFile) -> Result<usize> {
        let tags = self.tag_reader.as_ref().map(|reader| reader.read(&file));
        self.ingest(file, tags)
    }

    /// Add a user-selected file with tags read by the host
    pub fn add_local_track_with_tags(
        &mut self,
        file: LocalFile,
        tags: std::result::Result<TrackTags, MetadataReadError>,
    ) -> Result<usize> {
        self.ingest(file, Some(tags))
    }

    fn ingest(
        &mut self,
        file: LocalFile,
        tags: Option<std::result::Result<TrackTags, MetadataReadError>>,
    ) -> Result<usize> {
        if !file.mime_type.is_empty() && !self.transport.can_play_type(&file.mime_type) {
            warn!("Refusing {}: cannot play {}", file.name, file.mime_type);
            let message = format!("This browser cannot play the audio format: {}", file.mime_type);
            self.set_error(Some((ErrorKind::FormatUnsupported, message)));
            self.sync();
            return Err(TurntableError::UnsupportedFormat(file.mime_type));
        }

        let (tags, tags_failed) = match tags {
            Some(Ok(tags)) => (tags, false),
            Some(Err(err)) => {
                warn!("{}, using file name", err);
                (TrackTags::default(), true)
            }
            None => (TrackTags::default(), false),
        };

        let handle = match self.provider.acquire(&file) {
            Ok(handle) => handle,
            Err(err) => {
                warn!("{}", err);
                let message = ErrorKind::AllocationFailure.user_message().unwrap_or_default();
                self.set_error(Some((ErrorKind::AllocationFailure, message)));
                self.sync();
                return Err(err.into());
            }
        };

        let title = tags
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| file.stem().to_string());
        let artist = tags
            .artist
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| LOCAL_ARTIST.to_string());
        let album_art = tags.picture.map(|picture| picture.to_data_uri());
        let file_name = file.name.clone();

        let poem = Poem {
            title: "Local track".to_string(),
            author: artist.clone(),
            content: format!("Now listening: {}\nFrom: {}", title, file_name),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            location: "My device".to_string(),
            tags: vec!["local".to_string(), "custom".to_string()],
        };

        let track = Track {
            title,
            artist,
            source: AudioSource::Local(Arc::new(file)),
            album_art,
            poem: Some(poem),
            original_file_name: Some(file_name),
        };

        info!("Added local track \"{}\" ({})", track.title, handle);
        self.playlist.push(track);
        let index = self.playlist.len() - 1;
        self.handles.register(&mut self.provider, index, handle);
        self.emit(WidgetEvent::PlaylistChanged {
            length: self.playlist.len(),
        });

        if self.state.is_empty() {
            let commands = self.state.set_empty(false);
            self.apply(commands);
        }
        self.load_track_inner(index as isize, false);

        if tags_failed {
            if let Some(message) = ErrorKind::MetadataReadFailure.user_message() {
                self.scheduler
                    .schedule(self.config.notice_delay_ms, Task::ShowNotice(message));
            }
        }

        self.sync();
        Ok(index)
    }

    /// Release every live resource handle; returns how many were released
    pub fn cleanup_resources(&mut self) -> usize {
        self.handles.release_all(&mut self.provider)
    }

    // ===== Transport Events =====

    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Play | TransportEvent::Playing => {
                if event == TransportEvent::Playing && self.state.is_loading() {
                    self.set_loading(false);
                }
                if self.state.start_playing() {
                    self.update_button(true);
                    self.update_visuals(true);
                    self.start_progress_loop();
                } else {
                    debug!("Playback started while empty, pausing");
                    self.transport.pause();
                }
            }
            TransportEvent::Pause => {
                self.state.stop_playing();
                self.update_button(false);
                if !self.state.is_dragging_progress {
                    self.update_visuals(false);
                    self.stop_progress_loop();
                }
            }
            TransportEvent::Ended => {
                self.state.stop_playing();
                self.update_button(false);
                self.update_visuals(false);
                self.stop_progress_loop();
                self.play_next_inner();
            }
            TransportEvent::TimeUpdate => {
                if !self.state.is_dragging() {
                    self.update_progress();
                }
            }
            TransportEvent::LoadedMetadata => {
                self.update_progress();
            }
            TransportEvent::Waiting => {
                if self.state.is_playing() && !self.state.is_loading() {
                    self.set_loading(true);
                    self.stop_progress_loop();
                }
            }
            TransportEvent::Ready(epoch) => self.handle_ready(epoch),
            TransportEvent::Error { epoch, kind } => {
                if self.loader.take_error(epoch).is_some() {
                    self.handle_media_error(kind);
                } else {
                    debug!("Ignoring stale error {:?} for load {}", kind, epoch);
                }
            }
            TransportEvent::PlayRejected { epoch, kind } => {
                if self.loader.is_current(epoch) {
                    self.handle_play_rejected(kind);
                } else {
                    debug!("Ignoring stale play rejection {:?} for load {}", kind, epoch);
                }
            }
        }
        self.sync();
    }

    fn handle_ready(&mut self, epoch: LoadEpoch) {
        let Some(load) = self.loader.take_ready(epoch) else {
            debug!("Ignoring stale ready for load {}", epoch);
            return;
        };
        if !self.state.is_loading() {
            return;
        }
        self.set_loading(false);
        self.update_progress();
        if load.autoplay {
            self.scheduler
                .schedule(self.config.autoplay_delay_ms, Task::AutoPlay { epoch });
        }
    }

    fn handle_media_error(&mut self, kind: ErrorKind) {
        match kind.user_message() {
            Some(message) => self.set_error(Some((kind, message))),
            None => {
                debug!("Load aborted");
                self.set_loading(false);
                self.halt_local_playback();
            }
        }
    }

    fn handle_play_rejected(&mut self, kind: ErrorKind) {
        match kind {
            ErrorKind::PlaybackNotAllowed => {
                let message = kind.user_message().unwrap_or_default();
                self.set_error(Some((kind, message)));
                self.halt_local_playback();
            }
            ErrorKind::Aborted => {
                self.halt_local_playback();
                self.set_loading(false);
            }
            other => self.handle_media_error(other),
        }
    }

    fn halt_local_playback(&mut self) {
        if self.state.is_playing() {
            self.state.stop_playing();
            self.stop_progress_loop();
        }
        self.update_button(false);
        self.update_visuals(false);
    }

    // ===== Pointer Gestures =====

    /// Pointer pressed on the tonearm
    ///
    /// `pivot` is the tonearm base position, measured once for the gesture.
    /// Returns whether a drag started (the host should suppress defaults).
    pub fn tonearm_pointer_down(&mut self, input: &PointerInput, pivot: Point, now_ms: f64) -> bool {
        self.scheduler.advance(now_ms);
        if !self.state.is_action_allowed() || self.state.is_dragging_tonearm || !input.is_primary() {
            return false;
        }
        let Some(pointer) = input.sample() else {
            return false;
        };

        self.state.is_dragging_tonearm = true;
        self.view.text_selection_enabled = false;
        self.tonearm.start(pivot, pointer, Some(self.view.tonearm.angle));
        self.stop_progress_loop();
        self.view.tonearm.transition_enabled = false;
        self.sync();
        true
    }

    /// Pointer pressed on the progress container
    ///
    /// `bounds` is measured once for the gesture. Returns whether a scrub
    /// started.
    pub fn progress_pointer_down(&mut self, input: &PointerInput, bounds: Rect, now_ms: f64) -> bool {
        self.scheduler.advance(now_ms);
        if !self.state.is_action_allowed() || self.state.is_dragging_progress || !input.is_primary() {
            return false;
        }
        let Some(pointer) = input.sample() else {
            return false;
        };

        self.state.is_dragging_progress = true;
        self.view.text_selection_enabled = false;
        self.state.was_playing_before_drag = self.state.is_playing();
        self.stop_progress_loop();
        if self.state.was_playing_before_drag {
            self.transport.pause();
        }
        self.scrub.start(bounds);
        self.scrub_update(pointer);
        self.sync();
        true
    }

    /// Single click on the progress container: seek without dragging
    pub fn progress_click(&mut self, input: &PointerInput, bounds: Rect) -> bool {
        if !self.state.is_action_allowed() || self.state.is_dragging_progress {
            return false;
        }
        let Some(duration) = self.transport.duration() else {
            return false;
        };
        let Some(pointer) = input.sample() else {
            return false;
        };

        let fraction = bounds.fraction_at(pointer.x);
        self.transport.seek(fraction * duration);
        self.update_progress();
        self.sync();
        true
    }

    /// Pointer moved anywhere on the page
    pub fn pointer_move(&mut self, input: &PointerInput, now_ms: f64) {
        self.scheduler.advance(now_ms);
        let Some(pointer) = input.sample() else {
            return;
        };

        if self.state.is_dragging_tonearm {
            if let Some(angle) = self.tonearm.drag(now_ms, pointer) {
                self.view.tonearm.angle = angle;
            }
        }
        if self.state.is_dragging_progress {
            if let Some(pointer) = self.scrub.offer(now_ms, pointer) {
                self.scrub_update(pointer);
            }
        }
    }

    /// Pointer released anywhere on the page; never rate-limited
    pub fn pointer_up(&mut self, input: &PointerInput, now_ms: f64) {
        self.scheduler.advance(now_ms);
        self.finish_scrub(input);
        self.finish_tonearm_drag();
        self.sync();
    }

    /// Gesture interrupted by the platform; handled like a release
    pub fn pointer_cancel(&mut self, input: &PointerInput, now_ms: f64) {
        self.pointer_up(input, now_ms);
    }

    fn scrub_update(&mut self, pointer: Point) {
        let Some(update) = self.scrub.update(
            pointer,
            self.transport.duration(),
            self.transport.current_time(),
        ) else {
            return;
        };
        if let Some(position) = update.seek_to {
            self.transport.seek(position);
        }
        self.view.progress.percent = update.fraction * 100.0;
        self.view.progress.refresh(
            self.transport.current_time(),
            self.transport.duration(),
            true,
        );
    }

    fn finish_scrub(&mut self, input: &PointerInput) {
        if !self.state.is_dragging_progress {
            return;
        }
        self.state.is_dragging_progress = false;
        self.view.text_selection_enabled = !self.state.is_dragging_tonearm;
        if let Some(pointer) = input.sample() {
            self.scrub_update(pointer);
        }
        self.scrub.finish();

        if self.state.was_playing_before_drag {
            let delay = self.scrub.resume_delay_ms();
            let epoch = self.loader.current();
            self.scheduler
                .schedule(delay, Task::ResumeAfterScrub { epoch });
        } else {
            self.update_progress();
        }
        self.state.was_playing_before_drag = false;
    }

    fn finish_tonearm_drag(&mut self) {
        if !self.state.is_dragging_tonearm {
            return;
        }
        self.state.is_dragging_tonearm = false;
        self.view.text_selection_enabled = !self.state.is_dragging_progress;
        self.view.tonearm.transition_enabled = true;

        let Some(anchor) = self.tonearm.release() else {
            return;
        };
        self.view.tonearm.angle = self.tonearm.anchor_angle(anchor);
        debug!("Tonearm snapped to {:?}", anchor);

        // A refused command leaves the arm where playback actually is
        match anchor {
            TonearmAnchor::Start => {
                if !self.play_audio() {
                    self.update_visuals(self.state.is_playing());
                    self.start_progress_loop();
                }
            }
            TonearmAnchor::Resting => {
                if !self.pause_audio() {
                    self.update_visuals(self.state.is_playing());
                }
            }
        }
    }

    // ===== Clock =====

    /// Advance the host clock
    ///
    /// Runs due deferred tasks, applies rate-limited gesture moves whose
    /// window reopened, and refreshes progress while the loop runs. Call it
    /// once per animation frame.
    pub fn tick(&mut self, now_ms: f64) {
        self.scheduler.advance(now_ms);
        for task in self.scheduler.take_due() {
            self.run_task(task);
        }

        if self.state.is_dragging_tonearm {
            if let Some(angle) = self.tonearm.drag_due(now_ms) {
                self.view.tonearm.angle = angle;
            }
        }
        if self.state.is_dragging_progress {
            if let Some(pointer) = self.scrub.take_due(now_ms) {
                self.scrub_update(pointer);
            }
        }

        if self.progress_loop {
            self.update_progress();
            if !self.progress_loop_allowed() {
                self.stop_progress_loop();
            }
        }
        self.sync();
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::AutoPlay { epoch } => {
                if self.loader.is_current(epoch) {
                    self.play_audio();
                } else {
                    debug!("Skipping autoplay for stale load {}", epoch);
                }
            }
            Task::ResumeAfterScrub { epoch } => {
                if !self.loader.is_current(epoch) {
                    debug!("Skipping resume for stale load {}", epoch);
                } else if self.transport.is_paused()
                    && !self.state.has_error()
                    && !self.state.is_loading()
                    && !self.state.is_empty()
                {
                    self.transport.play(epoch);
                } else if self.state.is_playing() {
                    self.start_progress_loop();
                }
            }
            Task::ShowNotice(message) => {
                self.view.notice = Some(message.clone());
                self.emit(WidgetEvent::Notice {
                    message: message.clone(),
                });
                self.scheduler
                    .schedule(self.config.notice_duration_ms, Task::ClearNotice(message));
            }
            Task::ClearNotice(message) => {
                if self.view.notice.as_deref() == Some(message.as_str()) {
                    self.view.notice = None;
                }
            }
        }
    }

    // ===== Cover Art =====

    /// Host finished loading the art requested for `epoch`
    pub fn art_resolved(&mut self, epoch: LoadEpoch, loaded: bool) {
        if !self.loader.is_current(epoch) {
            debug!("Ignoring art for stale load {}", epoch);
            return;
        }
        let Some(track) = self.playlist.get(self.state.current_track_index) else {
            return;
        };
        self.view.art = match (&track.album_art, loaded) {
            (Some(src), true) => ArtView {
                src: src.clone(),
                alt: format!("Cover: {}", track.title),
            },
            _ => ArtView {
                src: self.fallback_art(track.is_local()),
                alt: "Cover failed to load".to_string(),
            },
        };
    }

    fn fallback_art(&self, local: bool) -> String {
        if local {
            self.config.placeholders.local_file.clone()
        } else {
            self.config.placeholders.no_cover.clone()
        }
    }

    // ===== Internal =====

    fn play_next_inner(&mut self) {
        let len = self.playlist.len();
        if self.state.is_loading() || self.state.is_empty() || len <= 1 {
            if !self.state.is_empty() && len == 1 {
                self.transport.seek(0.0);
                self.update_progress();
            }
            return;
        }
        let index = self.state.current_track_index as isize + 1;
        self.load_track_inner(index, true);
    }

    fn load_track_inner(&mut self, index: isize, autoplay: bool) {
        if self.playlist.is_empty() {
            let commands = self.state.set_empty(true);
            self.apply(commands);
            return;
        }
        let index = index.rem_euclid(self.playlist.len() as isize) as usize;

        self.stop_progress_loop();
        self.set_loading(true);
        self.set_error(None);

        if self.transport.is_paused() {
            // No pause event will follow, update directly
            self.state.stop_playing();
            self.update_button(false);
            self.update_visuals(false);
        } else {
            self.transport.pause();
        }

        if self.handles.current_slot() != Some(index) {
            self.handles.release_current(&mut self.provider);
        }
        self.handles.set_current(Some(index));
        self.state.current_track_index = index;

        let epoch = self.loader.begin(index, autoplay);
        self.scheduler.cancel(|task| {
            matches!(task, Task::AutoPlay { .. } | Task::ResumeAfterScrub { .. })
        });
        let track = self.playlist[index].clone();
        debug!("Loading track {} \"{}\" as load {}", index, track.title, epoch);

        self.view.title = non_empty_or(&track.title, UNKNOWN_TITLE);
        self.view.artist = non_empty_or(&track.artist, UNKNOWN_ARTIST);
        self.view.progress.refresh(0.0, None, false);
        match &track.album_art {
            Some(src) => {
                self.view.art = ArtView {
                    src: self.config.placeholders.loading.clone(),
                    alt: "Loading cover...".to_string(),
                };
                self.emit(WidgetEvent::ArtRequested {
                    epoch,
                    src: src.clone(),
                });
            }
            None => {
                self.view.art = ArtView {
                    src: self.fallback_art(track.is_local()),
                    alt: "No cover".to_string(),
                };
            }
        }
        self.view.poem = PoemView::from(&track.poem.clone().unwrap_or_else(|| default_poem(&track)));

        let source = match &track.source {
            AudioSource::Remote(url) => url.clone(),
            AudioSource::Local(file) => match self.local_handle(index, file) {
                Ok(handle) => handle.to_string(),
                Err(err) => {
                    warn!("{}", err);
                    let message = ErrorKind::AllocationFailure.user_message().unwrap_or_default();
                    self.set_error(Some((ErrorKind::AllocationFailure, message)));
                    self.loader.detach();
                    return;
                }
            },
        };
        self.transport.load(&source, epoch);

        self.emit(WidgetEvent::TrackChanged {
            index,
            title: track.title,
            artist: track.artist,
        });
    }

    /// Live handle of a local slot, re-acquired if it was released
    fn local_handle(&mut self, slot: usize, file: &LocalFile) -> Result<ResourceHandle> {
        if let Some(handle) = self.handles.handle_for(slot) {
            return Ok(handle.clone());
        }
        let handle = self.provider.acquire(file)?;
        debug!("Re-acquired handle {} for slot {}", handle, slot);
        self.handles.register(&mut self.provider, slot, handle.clone());
        Ok(handle)
    }

    /// Returns whether a play command was issued
    fn play_audio(&mut self) -> bool {
        if self.state.is_playing() || !self.state.is_action_allowed() {
            return false;
        }
        self.transport.play(self.loader.current());
        true
    }

    /// Returns whether a pause command was issued
    fn pause_audio(&mut self) -> bool {
        if !self.state.is_playing() || !self.state.is_action_allowed() {
            return false;
        }
        self.transport.pause();
        true
    }

    fn set_loading(&mut self, loading: bool) {
        let commands = self.state.set_loading(loading);
        self.apply(commands);
    }

    fn set_error(&mut self, error: Option<(ErrorKind, String)>) {
        if let Some((kind, message)) = &error {
            if !self.state.has_error() || self.state.message() != Some(message.as_str()) {
                warn!("Entering error state: {}", message);
                self.emit(WidgetEvent::Error {
                    kind: *kind,
                    message: message.clone(),
                });
            }
        }
        let commands = self.state.set_error(error);
        self.apply(commands);
    }

    fn apply(&mut self, commands: Vec<StateCommand>) {
        for command in commands {
            match command {
                StateCommand::PauseTransport => {
                    self.transport.pause();
                    self.stop_progress_loop();
                    self.update_button(false);
                    self.update_visuals(false);
                }
                StateCommand::ReleaseCurrentHandle => {
                    self.handles.release_current(&mut self.provider);
                }
                StateCommand::ShowEmptyPlaceholder => {
                    self.view.title = "No track".to_string();
                    self.view.artist = String::new();
                    self.view.art = ArtView {
                        src: self.config.placeholders.empty.clone(),
                        alt: "Playlist is empty".to_string(),
                    };
                    self.view.poem = PoemView::from(&Poem {
                        title: "No poem".to_string(),
                        content: "Add some music...".to_string(),
                        ..Poem::default()
                    });
                    self.view.progress.refresh(0.0, None, false);
                }
            }
        }
    }

    fn update_button(&mut self, playing: bool) {
        self.view.play_button_playing = playing;
    }

    fn update_visuals(&mut self, playing: bool) {
        self.view.record_spinning = playing;
        if !self.state.is_dragging_tonearm {
            self.view.tonearm.angle = if playing {
                self.config.tonearm.start_angle
            } else {
                self.config.tonearm.resting_angle
            };
        }
    }

    fn update_progress(&mut self) {
        self.view.progress.refresh(
            self.transport.current_time(),
            self.transport.duration(),
            self.state.is_dragging_progress,
        );
    }

    fn progress_loop_allowed(&self) -> bool {
        self.state.is_playing()
            && !self.state.is_dragging()
            && !self.state.is_loading()
            && !self.state.has_error()
    }

    fn start_progress_loop(&mut self) {
        self.progress_loop = self.progress_loop_allowed();
    }

    fn stop_progress_loop(&mut self) {
        self.progress_loop = false;
    }

    fn emit(&mut self, event: WidgetEvent) {
        self.pending_events.push(event);
    }

    /// Publish derived state to the view and report status changes
    fn sync(&mut self) {
        let status = self.state.snapshot();
        self.view.status = status;
        self.view.controls = self.state.controls(self.playlist.len());
        self.view.message = self.state.message().map(str::to_string);
        if status != self.last_status {
            self.last_status = status;
            self.emit(WidgetEvent::StateChanged { status });
        }
    }
}

impl<T: Transport, P: HandleProvider> Drop for Turntable<T, P> {
    fn drop(&mut self) {
        self.cleanup_resources();
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Poem shown for tracks that do not carry one
fn default_poem(track: &Track) -> Poem {
    if track.is_local() {
        Poem {
            title: "Local track".to_string(),
            author: if track.artist.is_empty() {
                track.original_file_name.clone().unwrap_or_default()
            } else {
                track.artist.clone()
            },
            content: format!("Now listening: {}", track.title),
            tags: vec!["local".to_string()],
            ..Poem::default()
        }
    } else {
        Poem {
            title: "No poem yet".to_string(),
            author: track.artist.clone(),
            content: "...".to_string(),
            ..Poem::default()
        }
    }
}
