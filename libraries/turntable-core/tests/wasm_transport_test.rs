//! Browser tests for the `<audio>` element transport
//!
//! Run with `wasm-pack test --headless --firefox -- --features wasm`.

#![cfg(all(feature = "wasm", target_arch = "wasm32"))]

use turntable_core::wasm::HtmlAudioTransport;
use turntable_core::{ErrorKind, LoadEpoch, Transport, TransportEvent};
use wasm_bindgen_test::*;
use web_sys::Event;

wasm_bindgen_test_configure!(run_in_browser);

fn fire(transport: &HtmlAudioTransport, name: &str) {
    let event = Event::new(name).unwrap();
    transport.element().dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
fn only_latest_load_reports_errors() {
    let mut transport = HtmlAudioTransport::new().unwrap();
    for epoch in 1..=3 {
        transport.load("data:,", LoadEpoch::new(epoch));
    }

    fire(&transport, "error");

    let errors: Vec<_> = transport
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, TransportEvent::Error { .. }))
        .collect();
    assert_eq!(
        errors,
        vec![TransportEvent::Error {
            epoch: LoadEpoch::new(3),
            kind: ErrorKind::Unknown(0),
        }]
    );
}

#[wasm_bindgen_test]
fn ready_listener_fires_once() {
    let mut transport = HtmlAudioTransport::new().unwrap();
    transport.load("data:,", LoadEpoch::new(1));
    transport.load("data:,", LoadEpoch::new(2));

    fire(&transport, "canplay");
    fire(&transport, "canplay");

    let ready: Vec<_> = transport
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, TransportEvent::Ready(_)))
        .collect();
    assert_eq!(ready, vec![TransportEvent::Ready(LoadEpoch::new(2))]);
}
