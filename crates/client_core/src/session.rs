//! Session identity: one opaque id per store lifetime, created lazily.

use chrono::Utc;
use rand::{
    rngs::{OsRng, StdRng},
    Rng, RngCore, SeedableRng,
};
use shared::domain::SessionId;
use storage::{KeyValueStore, StorageError, SESSION_ID_KEY};
use tracing::{info, warn};
use uuid::Builder;

/// Returns the persisted session id, creating and persisting one if absent.
pub fn get_or_create_session_id(store: &dyn KeyValueStore) -> SessionId {
    if let Some(existing) = store.get(SESSION_ID_KEY).filter(|id| !id.is_empty()) {
        return SessionId::new(existing);
    }

    let session_id = generate_session_id();
    if let Err(err) = store.set(SESSION_ID_KEY, session_id.as_str()) {
        warn!(
            session = session_id.short(),
            "session id could not be persisted and will not survive a restart: {err}"
        );
    }
    info!(session = session_id.short(), "created chat session id");
    session_id
}

/// Forgets the persisted session id so the next lookup generates a new one.
pub fn reset_session(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(SESSION_ID_KEY)
}

/// Random v4 UUID from the OS entropy source, or a timestamp composite when
/// that source is unavailable.
pub fn generate_session_id() -> SessionId {
    let mut bytes = [0u8; 16];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => SessionId::new(Builder::from_random_bytes(bytes).into_uuid().to_string()),
        Err(err) => {
            warn!("secure random source unavailable, using timestamp session id: {err}");
            SessionId::new(fallback_session_id())
        }
    }
}

fn fallback_session_id() -> String {
    let now = Utc::now();
    let millis = now.timestamp_millis();
    let seed = (millis as u64).rotate_left(20) ^ u64::from(now.timestamp_subsec_nanos());
    let fraction: f64 = StdRng::seed_from_u64(seed).gen();
    format!("{millis}-{fraction}")
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
