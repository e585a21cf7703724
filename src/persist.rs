//! Persistence middleware
//!
//! Wraps a [`Store`] so its state survives process restarts:
//! - hydrates from the backend once, at construction
//! - writes a full snapshot through after every mutation
//!
//! Write policy is synchronous write-through: the backend write
//! completes before the setter returns, so two writes for the same key
//! can never reorder. Failures on either path degrade silently (the
//! caller keeps defaults, or keeps correct in-memory state and loses
//! one write's durability) and are logged rather than surfaced.

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::storage::StorageBackend;
use crate::store::{Store, Subscription};

/// Version tag written into every snapshot envelope.
///
/// No migration logic is attached to it; the field exists so a future
/// reader can tell snapshot generations apart. Hydration ignores it.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Snapshot wire format: the state object plus a version tag, e.g.
/// `{"state":{"saturation":0.0,"blur":0,"noiseStrength":0.0},"version":0}`.
#[derive(Debug, Deserialize)]
struct Envelope {
    state: serde_json::Value,
    #[serde(default)]
    #[allow(dead_code)]
    version: u32,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, S> {
    state: &'a S,
    version: u32,
}

/// A [`Store`] whose state is transparently persisted under a single
/// backend key.
pub struct PersistedStore<S, B> {
    store: Store<S>,
    backend: Rc<RefCell<B>>,
    key: String,
}

impl<S, B> PersistedStore<S, B>
where
    S: Clone + Serialize + DeserializeOwned + 'static,
    B: StorageBackend + 'static,
{
    /// Construct a persisted store.
    ///
    /// Reads any existing snapshot at `key` and merges it over
    /// `defaults` (snapshot fields override, missing fields keep their
    /// default). An absent or malformed snapshot means `defaults` are
    /// used unmodified; construction itself never fails.
    pub fn open(backend: B, key: impl Into<String>, defaults: S) -> Self {
        let key = key.into();
        let backend = Rc::new(RefCell::new(backend));

        let initial = hydrate(&*backend.borrow(), &key, &defaults);
        let store = Store::new(initial);

        // Internal subscriber: every mutation writes the full
        // post-mutation snapshot back to the backend before the setter
        // returns.
        let write_backend = Rc::clone(&backend);
        let write_key = key.clone();
        let _ = store.subscribe(move |state: &S| {
            write_snapshot(&mut *write_backend.borrow_mut(), &write_key, state);
        });

        Self {
            store,
            backend,
            key,
        }
    }

    /// The wrapped reactive store. Handles cloned from it share the
    /// persistence behavior, since the persister is itself a
    /// subscriber.
    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    /// Backend key this store owns.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> S {
        self.store.get()
    }

    pub fn set(&self, next: S) {
        self.store.set(next)
    }

    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.store.update(f)
    }

    pub fn subscribe(&self, listener: impl FnMut(&S) + 'static) -> Subscription<S> {
        self.store.subscribe(listener)
    }

    /// Delete the persisted snapshot. In-memory state is untouched; the
    /// next mutation writes a fresh snapshot.
    pub fn clear(&self) {
        if let Err(err) = self.backend.borrow_mut().delete(&self.key) {
            log::warn!("Failed to clear snapshot {:?}: {err}", self.key);
        }
    }
}

/// Load the initial state for `key`: the persisted snapshot merged
/// over `defaults`, or `defaults` alone if nothing usable is stored.
fn hydrate<S, B>(backend: &B, key: &str, defaults: &S) -> S
where
    S: Clone + Serialize + DeserializeOwned,
    B: StorageBackend,
{
    let payload = match backend.get(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            log::info!("No snapshot for {key:?}, using defaults");
            return defaults.clone();
        }
        Err(err) => {
            log::warn!("Failed to read snapshot {key:?}, using defaults: {err}");
            return defaults.clone();
        }
    };

    match serde_json::from_str::<Envelope>(&payload) {
        Ok(envelope) => match merge_over_defaults(defaults, envelope.state) {
            Some(state) => {
                log::info!("Hydrated state from snapshot {key:?}");
                state
            }
            None => {
                log::warn!("Snapshot {key:?} has incompatible fields, using defaults");
                defaults.clone()
            }
        },
        Err(err) => {
            log::warn!("Ignoring malformed snapshot {key:?}: {err}");
            defaults.clone()
        }
    }
}

/// Overlay the snapshot's fields onto the serialized defaults, then
/// deserialize the merged object. Fields absent from the snapshot keep
/// their default and unknown fields are ignored, which tolerates
/// schema drift in both directions when fields are added or removed
/// between versions.
fn merge_over_defaults<S>(defaults: &S, snapshot: serde_json::Value) -> Option<S>
where
    S: Serialize + DeserializeOwned,
{
    let mut base = serde_json::to_value(defaults).ok()?;
    let (serde_json::Value::Object(base_map), serde_json::Value::Object(snapshot_map)) =
        (&mut base, snapshot)
    else {
        return None;
    };
    for (field, value) in snapshot_map {
        base_map.insert(field, value);
    }
    serde_json::from_value(base).ok()
}

/// Serialize `state` into an envelope and write it through. Failures
/// are logged and swallowed; in-memory state stays authoritative.
fn write_snapshot<S, B>(backend: &mut B, key: &str, state: &S)
where
    S: Serialize,
    B: StorageBackend,
{
    let envelope = EnvelopeRef {
        state,
        version: SNAPSHOT_VERSION,
    };
    let payload = match serde_json::to_string(&envelope) {
        Ok(payload) => payload,
        Err(err) => {
            log::warn!("Failed to serialize snapshot {key:?}: {err}");
            return;
        }
    };
    if let Err(err) = backend.set(key, &payload) {
        log::warn!("Failed to write snapshot {key:?}: {err}");
    }
}
