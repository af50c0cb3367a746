//! Resource handles for local files
//!
//! A local track plays through a revocable handle (a `blob:` URL in the
//! browser). The registry records which playlist slot owns which live handle
//! and guarantees each handle is released exactly once.

use crate::error::AllocationError;
use crate::types::LocalFile;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, warn};

/// Opaque reference to in-memory audio data
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceHandle(String);

impl ResourceHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Platform allocator for resource handles
pub trait HandleProvider {
    /// Create a handle for the file's bytes
    fn acquire(&mut self, file: &LocalFile) -> Result<ResourceHandle, AllocationError>;

    /// Revoke a handle; called at most once per handle
    fn release(&mut self, handle: &ResourceHandle);
}

/// In-memory handle provider for native hosts
///
/// Handles look like `blob:turntable/<uuid>`.
#[derive(Debug, Default)]
pub struct MemoryHandleProvider {
    live: HashMap<ResourceHandle, usize>,
}

impl MemoryHandleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles acquired and not yet released
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Size in bytes of the data behind a live handle
    pub fn size_of(&self, handle: &ResourceHandle) -> Option<usize> {
        self.live.get(handle).copied()
    }
}

impl HandleProvider for MemoryHandleProvider {
    fn acquire(&mut self, file: &LocalFile) -> Result<ResourceHandle, AllocationError> {
        let handle = ResourceHandle::new(format!("blob:turntable/{}", uuid::Uuid::new_v4()));
        self.live.insert(handle.clone(), file.data.len());
        Ok(handle)
    }

    fn release(&mut self, handle: &ResourceHandle) {
        if self.live.remove(handle).is_none() {
            warn!("Released unknown handle {}", handle);
        }
    }
}

/// Live handles per playlist slot
#[derive(Debug, Default)]
pub struct HandleRegistry {
    live: BTreeMap<usize, ResourceHandle>,
    /// Slot currently loaded into the transport
    current: Option<usize>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly acquired handle for a slot
    ///
    /// A handle already registered for the slot is released first.
    pub fn register<P: HandleProvider + ?Sized>(
        &mut self,
        provider: &mut P,
        slot: usize,
        handle: ResourceHandle,
    ) {
        debug!("Registered handle {} for slot {}", handle, slot);
        if let Some(previous) = self.live.insert(slot, handle) {
            provider.release(&previous);
        }
    }

    pub fn handle_for(&self, slot: usize) -> Option<&ResourceHandle> {
        self.live.get(&slot)
    }

    pub fn is_live(&self, handle: &ResourceHandle) -> bool {
        self.live.values().any(|h| h == handle)
    }

    pub fn current_slot(&self) -> Option<usize> {
        self.current
    }

    pub fn set_current(&mut self, slot: Option<usize>) {
        self.current = slot;
    }

    pub fn current_handle(&self) -> Option<&ResourceHandle> {
        self.current.and_then(|slot| self.live.get(&slot))
    }

    /// Release the handle of the loaded slot, if it has one
    pub fn release_current<P: HandleProvider + ?Sized>(
        &mut self,
        provider: &mut P,
    ) -> Option<ResourceHandle> {
        let slot = self.current?;
        let handle = self.live.remove(&slot)?;
        debug!("Releasing handle {} of slot {}", handle, slot);
        provider.release(&handle);
        Some(handle)
    }

    /// Release every live handle; returns how many were released
    pub fn release_all<P: HandleProvider + ?Sized>(&mut self, provider: &mut P) -> usize {
        let live = std::mem::take(&mut self.live);
        let count = live.len();
        for handle in live.values() {
            provider.release(handle);
        }
        self.current = None;
        if count > 0 {
            debug!("Released {} remaining handles", count);
        }
        count
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> LocalFile {
        LocalFile::new(name, "audio/mpeg", vec![1, 2, 3])
    }

    #[test]
    fn memory_provider_tracks_live_handles() {
        let mut provider = MemoryHandleProvider::new();
        let a = provider.acquire(&file("a.mp3")).unwrap();
        let b = provider.acquire(&file("b.mp3")).unwrap();

        assert_ne!(a, b);
        assert!(a.as_str().starts_with("blob:"));
        assert_eq!(provider.live_count(), 2);
        assert_eq!(provider.size_of(&a), Some(3));

        provider.release(&a);
        assert_eq!(provider.live_count(), 1);
    }

    #[test]
    fn release_current_only_touches_loaded_slot() {
        let mut provider = MemoryHandleProvider::new();
        let mut registry = HandleRegistry::new();

        let a = provider.acquire(&file("a.mp3")).unwrap();
        let b = provider.acquire(&file("b.mp3")).unwrap();
        registry.register(&mut provider, 3, a.clone());
        registry.register(&mut provider, 4, b.clone());

        registry.set_current(Some(3));
        assert_eq!(registry.current_handle(), Some(&a));
        assert_eq!(registry.release_current(&mut provider), Some(a.clone()));
        assert!(!registry.is_live(&a));
        assert!(registry.is_live(&b));

        // Second release of the same slot is a no-op
        assert_eq!(registry.release_current(&mut provider), None);
        assert_eq!(provider.live_count(), 1);
    }

    #[test]
    fn release_all_empties_registry() {
        let mut provider = MemoryHandleProvider::new();
        let mut registry = HandleRegistry::new();
        for slot in 0..4 {
            let handle = provider.acquire(&file("x.mp3")).unwrap();
            registry.register(&mut provider, slot, handle);
        }
        registry.set_current(Some(2));

        assert_eq!(registry.release_all(&mut provider), 4);
        assert_eq!(registry.release_all(&mut provider), 0);
        assert_eq!(registry.current_slot(), None);
        assert_eq!(provider.live_count(), 0);
    }
}
