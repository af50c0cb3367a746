//! `<audio>` element transport
//!
//! Element events are queued as [`TransportEvent`]s and handed to the widget
//! by [`HtmlAudioTransport::take_events`]. Ready and error listeners are
//! registered per load so they carry the epoch of the load that created them;
//! only the current load's pair stays attached.

use crate::{known_duration, ErrorKind, LoadEpoch, Transport, TransportEvent};
use std::{cell::RefCell, collections::VecDeque, rc::Rc};
use tracing::warn;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AddEventListenerOptions, DomException, HtmlAudioElement, HtmlMediaElement};

type EventQueue = Rc<RefCell<VecDeque<TransportEvent>>>;
type Listener = (&'static str, Closure<dyn FnMut()>);

/// Element events forwarded as-is
const FORWARDED: [(&str, TransportEvent); 7] = [
    ("play", TransportEvent::Play),
    ("pause", TransportEvent::Pause),
    ("ended", TransportEvent::Ended),
    ("timeupdate", TransportEvent::TimeUpdate),
    ("loadedmetadata", TransportEvent::LoadedMetadata),
    ("waiting", TransportEvent::Waiting),
    ("playing", TransportEvent::Playing),
];

pub struct HtmlAudioTransport {
    element: HtmlAudioElement,
    queue: EventQueue,
    listeners: Vec<Listener>,
    load_listeners: Vec<Listener>,
}

impl HtmlAudioTransport {
    /// Transport over a detached `<audio>` element
    pub fn new() -> Result<Self, JsValue> {
        Self::from_element(HtmlAudioElement::new()?)
    }

    /// Transport over an element owned by the page
    pub fn from_element(element: HtmlAudioElement) -> Result<Self, JsValue> {
        let queue = EventQueue::default();
        let mut listeners = Vec::with_capacity(FORWARDED.len());

        for (name, event) in FORWARDED {
            let queue = Rc::clone(&queue);
            let listener = Closure::<dyn FnMut()>::new(move || {
                queue.borrow_mut().push_back(event);
            });
            element.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
            listeners.push((name, listener));
        }

        Ok(Self {
            element,
            queue,
            listeners,
            load_listeners: Vec::new(),
        })
    }

    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }

    /// Drain events queued since the last call
    pub fn take_events(&self) -> Vec<TransportEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    fn push(&self, event: TransportEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    fn listen_once(
        &mut self,
        name: &'static str,
        callback: impl FnMut() + 'static,
    ) -> Result<(), JsValue> {
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        let listener = Closure::<dyn FnMut()>::new(callback);
        self.element
            .add_event_listener_with_callback_and_add_event_listener_options(
                name,
                listener.as_ref().unchecked_ref(),
                &options,
            )?;
        self.load_listeners.push((name, listener));
        Ok(())
    }

    /// Detach the previous load's ready and error listeners
    fn detach_load_listeners(&mut self) {
        for (name, listener) in self.load_listeners.drain(..) {
            let _ = self
                .element
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
    }
}

/// Error kind reported by the element's `MediaError`
fn media_error_kind(element: &HtmlMediaElement) -> ErrorKind {
    element
        .error()
        .map_or(ErrorKind::Unknown(0), |error| ErrorKind::from_media_error_code(error.code()))
}

impl Transport for HtmlAudioTransport {
    fn load(&mut self, source: &str, epoch: LoadEpoch) {
        self.detach_load_listeners();

        let queue = Rc::clone(&self.queue);
        let ready = self.listen_once("canplay", move || {
            queue.borrow_mut().push_back(TransportEvent::Ready(epoch));
        });

        let queue = Rc::clone(&self.queue);
        let element: HtmlMediaElement = self.element.clone().into();
        let error = self.listen_once("error", move || {
            let kind = media_error_kind(&element);
            queue
                .borrow_mut()
                .push_back(TransportEvent::Error { epoch, kind });
        });

        if let Err(e) = ready.and(error) {
            warn!("Failed to attach load listeners for {}: {:?}", epoch, e);
        }

        self.element.set_src(source);
        self.element.load();
    }

    fn play(&mut self, epoch: LoadEpoch) {
        match self.element.play() {
            Ok(promise) => {
                let queue = Rc::clone(&self.queue);
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        let name = e
                            .dyn_ref::<DomException>()
                            .map(DomException::name)
                            .unwrap_or_default();
                        let kind = ErrorKind::from_play_rejection(&name);
                        queue
                            .borrow_mut()
                            .push_back(TransportEvent::PlayRejected { epoch, kind });
                    }
                });
            }
            Err(e) => {
                warn!("play() threw: {:?}", e);
                self.push(TransportEvent::PlayRejected {
                    epoch,
                    kind: ErrorKind::Unknown(0),
                });
            }
        }
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            warn!("pause() threw: {:?}", e);
        }
    }

    fn seek(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn duration(&self) -> Option<f64> {
        known_duration(self.element.duration())
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn can_play_type(&self, mime_type: &str) -> bool {
        !self.element.can_play_type(mime_type).is_empty()
    }
}

impl Drop for HtmlAudioTransport {
    fn drop(&mut self) {
        let _ = self.element.pause();
        self.detach_load_listeners();
        for (name, listener) in &self.listeners {
            let _ = self
                .element
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
        self.element.remove_attribute("src").ok();
    }
}
