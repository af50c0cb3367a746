//! WASM bindings for turntable-core
//!
//! Browser implementations of the platform traits plus a JavaScript-facing
//! wrapper around [`crate::Turntable`].

pub mod handles;
pub mod transport;
pub mod widget;

pub use handles::BlobUrlProvider;
pub use transport::HtmlAudioTransport;
pub use widget::WasmTurntable;
