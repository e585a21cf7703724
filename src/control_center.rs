//! Control-center display adjustments
//!
//! The concrete instance of the persisted store: three numeric
//! parameters the UI's control center exposes as sliders, kept under a
//! single backend key so they survive restarts.

use serde::{Deserialize, Serialize};

use crate::persist::PersistedStore;
use crate::storage::StorageBackend;
use crate::store::Subscription;

/// Backend key owned by the control-center store. No other subsystem
/// may write to it.
pub const STORAGE_KEY: &str = "control-center";

/// Current display-adjustment values.
///
/// Always fully defined: hydration fills any field missing from a
/// persisted snapshot with its default. Serialized with the original
/// camelCase wire keys (`saturation`, `blur`, `noiseStrength`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlCenterState {
    /// Color saturation adjustment, typically [0, 1].
    pub saturation: f32,
    /// Blur radius in pixels.
    pub blur: u32,
    /// Overlay noise strength, typically [0, 1].
    pub noise_strength: f32,
}

/// Persisted store for [`ControlCenterState`] with one setter per
/// field. Each setter replaces only its own field and returns after
/// subscribers have run and the snapshot write has completed.
///
/// Values are not range-validated here; callers own clamping.
pub struct ControlCenterStore<B> {
    inner: PersistedStore<ControlCenterState, B>,
}

impl<B: StorageBackend + 'static> ControlCenterStore<B> {
    /// Open the store, hydrating from any snapshot under
    /// [`STORAGE_KEY`]. Never fails; a missing or unreadable snapshot
    /// means all-default values.
    pub fn open(backend: B) -> Self {
        Self {
            inner: PersistedStore::open(backend, STORAGE_KEY, ControlCenterState::default()),
        }
    }

    /// Snapshot of the current values.
    pub fn get(&self) -> ControlCenterState {
        self.inner.get()
    }

    pub fn saturation(&self) -> f32 {
        self.inner.get().saturation
    }

    pub fn blur(&self) -> u32 {
        self.inner.get().blur
    }

    pub fn noise_strength(&self) -> f32 {
        self.inner.get().noise_strength
    }

    pub fn set_saturation(&self, saturation: f32) {
        self.inner.update(|s| s.saturation = saturation);
    }

    pub fn set_blur(&self, blur: u32) {
        self.inner.update(|s| s.blur = blur);
    }

    pub fn set_noise_strength(&self, noise_strength: f32) {
        self.inner.update(|s| s.noise_strength = noise_strength);
    }

    /// Register a listener for every change. Consumers must
    /// [`Subscription::unsubscribe`] on teardown.
    pub fn subscribe(
        &self,
        listener: impl FnMut(&ControlCenterState) + 'static,
    ) -> Subscription<ControlCenterState> {
        self.inner.subscribe(listener)
    }

    /// Drop the persisted snapshot; current in-memory values stay.
    pub fn clear_storage(&self) {
        self.inner.clear()
    }
}
