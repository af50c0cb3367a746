//! Shared test infrastructure: fake transport, handle provider and tag reader

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use turntable_core::{
    AllocationError, ErrorKind, HandleProvider, LoadEpoch, LocalFile, MetadataReadError,
    RemoteTrack, ResourceHandle, TagReader, TrackTags, Transport, TransportEvent, Turntable,
    TurntableConfig,
};

/// Commands the widget issued to the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String, LoadEpoch),
    Play,
    Pause,
    Seek(f64),
}

/// Scriptable transport
///
/// Play and pause succeed immediately and queue the events a media element
/// would fire; tests deliver them with [`pump`].
pub struct FakeTransport {
    pub calls: Vec<Call>,
    pub time: f64,
    pub duration: Option<f64>,
    pub paused: bool,
    pub playable: bool,
    pub reject_play: Option<ErrorKind>,
    queued: VecDeque<TransportEvent>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            time: 0.0,
            duration: Some(200.0),
            paused: true,
            playable: true,
            reject_play: None,
            queued: VecDeque::new(),
        }
    }

    pub fn take_events(&mut self) -> Vec<TransportEvent> {
        self.queued.drain(..).collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn plays(&self) -> usize {
        self.count(&Call::Play)
    }

    pub fn loads(&self) -> Vec<(String, LoadEpoch)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Load(src, epoch) => Some((src.clone(), *epoch)),
                _ => None,
            })
            .collect()
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Seek(t) => Some(*t),
                _ => None,
            })
            .collect()
    }
}

impl Transport for FakeTransport {
    fn load(&mut self, source: &str, epoch: LoadEpoch) {
        self.calls.push(Call::Load(source.to_string(), epoch));
        self.time = 0.0;
        self.paused = true;
    }

    fn play(&mut self, epoch: LoadEpoch) {
        self.calls.push(Call::Play);
        if let Some(kind) = self.reject_play {
            self.queued
                .push_back(TransportEvent::PlayRejected { epoch, kind });
            return;
        }
        if self.paused {
            self.paused = false;
            self.queued.push_back(TransportEvent::Play);
            self.queued.push_back(TransportEvent::Playing);
        }
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
        if !self.paused {
            self.paused = true;
            self.queued.push_back(TransportEvent::Pause);
        }
    }

    fn seek(&mut self, seconds: f64) {
        self.calls.push(Call::Seek(seconds));
        self.time = seconds;
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn can_play_type(&self, _mime_type: &str) -> bool {
        self.playable
    }
}

/// Handle provider that records every acquire and release
#[derive(Default)]
pub struct FakeProvider {
    pub acquired: Vec<ResourceHandle>,
    pub released: Vec<ResourceHandle>,
    pub fail: bool,
}

impl FakeProvider {
    pub fn live(&self) -> usize {
        self.acquired.len() - self.released.len()
    }
}

impl HandleProvider for FakeProvider {
    fn acquire(&mut self, file: &LocalFile) -> Result<ResourceHandle, AllocationError> {
        if self.fail {
            return Err(AllocationError {
                file: file.name.clone(),
                reason: "quota exceeded".to_string(),
            });
        }
        let handle = ResourceHandle::new(format!("blob:test/{}", self.acquired.len() + 1));
        self.acquired.push(handle.clone());
        Ok(handle)
    }

    fn release(&mut self, handle: &ResourceHandle) {
        self.released.push(handle.clone());
    }
}

/// Provider handle that stays inspectable after the widget is dropped
#[derive(Clone, Default)]
pub struct SharedProvider(pub Rc<RefCell<FakeProvider>>);

impl HandleProvider for SharedProvider {
    fn acquire(&mut self, file: &LocalFile) -> Result<ResourceHandle, AllocationError> {
        self.0.borrow_mut().acquire(file)
    }

    fn release(&mut self, handle: &ResourceHandle) {
        self.0.borrow_mut().release(handle)
    }
}

/// Tag reader returning a fixed result
pub struct FakeTagReader(pub Result<TrackTags, MetadataReadError>);

impl TagReader for FakeTagReader {
    fn read(&self, _file: &LocalFile) -> Result<TrackTags, MetadataReadError> {
        self.0.clone()
    }
}

pub type TestTurntable = Turntable<FakeTransport, FakeProvider>;

/// Config with `tracks` remote entries, each with cover art
pub fn config(tracks: usize) -> TurntableConfig {
    TurntableConfig {
        playlist: (0..tracks)
            .map(|i| RemoteTrack {
                title: format!("Song {i}"),
                artist: format!("Artist {i}"),
                audio_src: format!("https://example.com/{i}.mp3"),
                album_art: Some(format!("https://example.com/{i}.jpg")),
                poem: None,
            })
            .collect(),
        ..TurntableConfig::default()
    }
}

/// Initialised widget; the first track is still loading
pub fn turntable(tracks: usize) -> TestTurntable {
    let mut tt = Turntable::new(config(tracks), FakeTransport::new(), FakeProvider::default());
    tt.init();
    tt
}

/// Initialised widget with the first track ready and paused
pub fn ready_turntable(tracks: usize) -> TestTurntable {
    let mut tt = turntable(tracks);
    ready(&mut tt);
    tt
}

/// Initialised widget playing the first track
pub fn playing_turntable(tracks: usize) -> TestTurntable {
    let mut tt = ready_turntable(tracks);
    tt.toggle_play_pause();
    pump(&mut tt);
    assert!(tt.state().is_playing());
    tt
}

/// Deliver the ready signal for the current load
pub fn ready(tt: &mut TestTurntable) {
    let epoch = tt.current_epoch();
    tt.handle_transport_event(TransportEvent::Ready(epoch));
    pump(tt);
}

/// Deliver queued transport events until none are left
pub fn pump(tt: &mut TestTurntable) {
    loop {
        let events = tt.transport_mut().take_events();
        if events.is_empty() {
            break;
        }
        for event in events {
            tt.handle_transport_event(event);
        }
    }
}

pub fn local_file(name: &str) -> LocalFile {
    LocalFile::new(name, "audio/mpeg", vec![1, 2, 3, 4])
}
