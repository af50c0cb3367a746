//! Object URLs for local files

use crate::{AllocationError, HandleProvider, LocalFile, ResourceHandle};
use js_sys::{Array, Uint8Array};
use web_sys::{Blob, BlobPropertyBag, Url};

/// Hands out `blob:` URLs for local file bytes
#[derive(Debug, Default)]
pub struct BlobUrlProvider;

impl BlobUrlProvider {
    pub fn new() -> Self {
        Self
    }
}

impl HandleProvider for BlobUrlProvider {
    fn acquire(&mut self, file: &LocalFile) -> Result<ResourceHandle, AllocationError> {
        let failed = |reason: String| AllocationError {
            file: file.name.clone(),
            reason,
        };

        let bytes = Uint8Array::from(file.data.as_slice());
        let parts = Array::of1(&bytes);
        let options = BlobPropertyBag::new();
        if !file.mime_type.is_empty() {
            options.set_type(&file.mime_type);
        }

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| failed(format!("{:?}", e)))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|e| failed(format!("{:?}", e)))?;
        Ok(ResourceHandle::new(url))
    }

    fn release(&mut self, handle: &ResourceHandle) {
        if let Err(e) = Url::revoke_object_url(handle.as_str()) {
            tracing::warn!("Failed to revoke {}: {:?}", handle, e);
        }
    }
}
