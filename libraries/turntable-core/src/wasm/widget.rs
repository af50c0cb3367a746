//! JavaScript-facing turntable widget

use super::{BlobUrlProvider, HtmlAudioTransport};
use crate::{
    LoadEpoch, LocalFile, MetadataReadError, MouseButton, Picture, Point, PointerInput, Rect,
    TrackTags, Turntable, TurntableConfig,
};
use js_sys::Function;
use wasm_bindgen::prelude::*;

/// WASM-compatible turntable widget
///
/// The page forwards DOM input (pointer positions, key presses, animation
/// frames) and paints the object returned by `view()`.
#[wasm_bindgen]
pub struct WasmTurntable {
    inner: Turntable<HtmlAudioTransport, BlobUrlProvider>,

    // Receives each widget event; events queue for `drainEvents` otherwise
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl WasmTurntable {
    /// Create a widget from a config object (`undefined` for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmTurntable, JsValue> {
        console_error_panic_hook::set_once();

        let config = if config.is_undefined() || config.is_null() {
            TurntableConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };

        Ok(Self {
            inner: Turntable::new(config, HtmlAudioTransport::new()?, BlobUrlProvider::new()),
            on_event: None,
        })
    }

    pub fn init(&mut self) {
        self.inner.init();
        self.flush();
    }

    // ===== Playback Control =====

    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&mut self) {
        self.pump();
        self.inner.toggle_play_pause();
        self.flush();
    }

    #[wasm_bindgen(js_name = playNext)]
    pub fn play_next(&mut self) {
        self.pump();
        self.inner.play_next();
        self.flush();
    }

    #[wasm_bindgen(js_name = playPrev)]
    pub fn play_prev(&mut self) {
        self.pump();
        self.inner.play_prev();
        self.flush();
    }

    #[wasm_bindgen(js_name = loadTrack)]
    pub fn load_track(&mut self, index: i32, autoplay: bool) {
        self.pump();
        self.inner.load_track(index as isize, autoplay);
        self.flush();
    }

    /// Space bar pressed; returns whether the page should suppress scrolling
    #[wasm_bindgen(js_name = handleSpaceKey)]
    pub fn handle_space_key(&mut self, input_focused: bool) -> bool {
        self.pump();
        let consumed = self.inner.handle_space_key(input_focused);
        self.flush();
        consumed
    }

    #[wasm_bindgen(js_name = isActionAllowed)]
    pub fn is_action_allowed(&self) -> bool {
        self.inner.is_action_allowed()
    }

    // ===== Local Files =====

    /// Add a file without tags; the title falls back to the file name
    #[wasm_bindgen(js_name = addLocalFile)]
    pub fn add_local_file(&mut self, name: String, mime_type: String, data: Vec<u8>) -> Result<usize, JsValue> {
        self.pump();
        let result = self.inner.add_local_track(LocalFile::new(name, mime_type, data));
        self.flush();
        result.map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Add a file with tags read by the page
    #[wasm_bindgen(js_name = addLocalFileWithTags)]
    #[allow(clippy::too_many_arguments)]
    pub fn add_local_file_with_tags(
        &mut self,
        name: String,
        mime_type: String,
        data: Vec<u8>,
        title: Option<String>,
        artist: Option<String>,
        picture: Option<Vec<u8>>,
        picture_mime: Option<String>,
    ) -> Result<usize, JsValue> {
        self.pump();
        let tags = TrackTags {
            title,
            artist,
            picture: picture.map(|data| Picture::new(data, picture_mime.unwrap_or_default())),
        };
        let result = self
            .inner
            .add_local_track_with_tags(LocalFile::new(name, mime_type, data), Ok(tags));
        self.flush();
        result.map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Add a file whose tags the page failed to read
    #[wasm_bindgen(js_name = addLocalFileTagsFailed)]
    pub fn add_local_file_tags_failed(
        &mut self,
        name: String,
        mime_type: String,
        data: Vec<u8>,
        reason: String,
    ) -> Result<usize, JsValue> {
        self.pump();
        let error = MetadataReadError {
            file: name.clone(),
            reason,
        };
        let result = self
            .inner
            .add_local_track_with_tags(LocalFile::new(name, mime_type, data), Err(error));
        self.flush();
        result.map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Revoke every object URL; returns how many were revoked
    pub fn cleanup(&mut self) -> usize {
        self.inner.cleanup_resources()
    }

    // ===== Pointer Input =====

    /// `button` is the DOM mouse button, `undefined` for touch
    #[wasm_bindgen(js_name = tonearmPointerDown)]
    pub fn tonearm_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        button: Option<i16>,
        pivot_x: f64,
        pivot_y: f64,
        now_ms: f64,
    ) -> bool {
        self.pump();
        let started =
            self.inner
                .tonearm_pointer_down(&press(x, y, button), Point::new(pivot_x, pivot_y), now_ms);
        self.flush();
        started
    }

    #[wasm_bindgen(js_name = progressPointerDown)]
    #[allow(clippy::too_many_arguments)]
    pub fn progress_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        button: Option<i16>,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        now_ms: f64,
    ) -> bool {
        self.pump();
        let started = self.inner.progress_pointer_down(
            &press(x, y, button),
            Rect::new(left, top, width, height),
            now_ms,
        );
        self.flush();
        started
    }

    #[wasm_bindgen(js_name = progressClick)]
    pub fn progress_click(&mut self, x: f64, y: f64, left: f64, top: f64, width: f64, height: f64) -> bool {
        self.pump();
        let seeked = self
            .inner
            .progress_click(&PointerInput::mouse(x, y), Rect::new(left, top, width, height));
        self.flush();
        seeked
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64, is_touch: bool, now_ms: f64) {
        let input = if is_touch {
            PointerInput::touch(x, y)
        } else {
            PointerInput::mouse(x, y)
        };
        self.inner.pointer_move(&input, now_ms);
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64, is_touch: bool, now_ms: f64) {
        self.pump();
        self.inner.pointer_up(&release(x, y, is_touch), now_ms);
        self.flush();
    }

    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self, x: f64, y: f64, is_touch: bool, now_ms: f64) {
        self.pump();
        self.inner.pointer_cancel(&release(x, y, is_touch), now_ms);
        self.flush();
    }

    // ===== Clock & Rendering =====

    /// Call once per animation frame with `performance.now()`
    pub fn tick(&mut self, now_ms: f64) {
        self.pump();
        self.inner.tick(now_ms);
        self.flush();
    }

    /// Cover art requested by an `ArtRequested` event finished loading
    #[wasm_bindgen(js_name = artResolved)]
    pub fn art_resolved(&mut self, epoch: f64, loaded: bool) {
        self.inner.art_resolved(LoadEpoch::new(epoch as u64), loaded);
        self.flush();
    }

    /// Current display model
    pub fn view(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.inner.view()).unwrap_or(JsValue::NULL)
    }

    /// Events queued since the last drain (empty when a callback is set)
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> JsValue {
        let events = self.inner.drain_events();
        serde_wasm_bindgen::to_value(&events).unwrap_or(JsValue::NULL)
    }

    // ===== Event Listeners =====

    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
    }

    // ===== Internal =====

    /// Feed queued element events to the widget
    fn pump(&mut self) {
        for event in self.inner.transport().take_events() {
            self.inner.handle_transport_event(event);
        }
    }

    fn flush(&mut self) {
        let Some(ref cb) = self.on_event else {
            return;
        };
        for event in self.inner.drain_events() {
            if let Ok(value) = serde_wasm_bindgen::to_value(&event) {
                cb.call1(&JsValue::NULL, &value).ok();
            }
        }
    }
}

fn press(x: f64, y: f64, button: Option<i16>) -> PointerInput {
    match button {
        Some(button) => PointerInput::Mouse {
            position: Point::new(x, y),
            button: MouseButton::from_dom(button),
        },
        None => PointerInput::touch(x, y),
    }
}

fn release(x: f64, y: f64, is_touch: bool) -> PointerInput {
    if is_touch {
        PointerInput::touch_end(x, y)
    } else {
        PointerInput::mouse(x, y)
    }
}
