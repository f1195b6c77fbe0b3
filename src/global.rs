//! Process-wide log client.
//!
//! The holder moves through `Uninitialised -> Live -> Closed`. The first
//! [`log`] call constructs the client under the write lock; racing first
//! callers re-check the phase after acquiring it, so exactly one client is
//! built. [`shutdown`] is terminal: later calls still serialise their item
//! but write nothing.

use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::Lazy;
use parking_lot::{RwLock, RwLockWriteGuard};
use serde::Serialize;

use crate::{client::LogClient, config::ClientConfig, error::LogError, serialise::serialise_item};

enum Phase {
    Uninitialised,
    Live(LogClient),
    Closed,
}

impl Phase {
    /// `None` while no client has been constructed.
    fn send<T: Serialize + ?Sized>(&self, item: &T) -> Option<Result<(), LogError>> {
        match self {
            Phase::Uninitialised => None,
            Phase::Live(client) => Some(client.send(item)),
            Phase::Closed => Some(serialise_item(item).map(drop)),
        }
    }
}

static HOLDER: Lazy<RwLock<Phase>> = Lazy::new(|| RwLock::new(Phase::Uninitialised));
static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

/// Serialise `item` to JSON and write it to `./log.sock`.
///
/// The first call connects the process-wide client; later calls reuse it.
/// Delivery is best effort: a missing listener, a full socket buffer, or a
/// partial write all drop the item without notice, and the call never
/// blocks.
///
/// # Errors
///
/// Returns [`LogError::Serialise`] when `item` cannot be represented as JSON.
/// No other error is ever returned.
///
/// # Examples
///
/// ```no_run
/// unixlog::log(&(1, "foo")).expect("tuples serialise");
/// ```
pub fn log<T: Serialize + ?Sized>(item: &T) -> Result<(), LogError> {
    if let Some(result) = HOLDER.read().send(item) {
        return result;
    }
    let mut phase = HOLDER.write();
    if matches!(*phase, Phase::Uninitialised) {
        *phase = Phase::Live(LogClient::connect(ClientConfig::default()));
        CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
    }
    RwLockWriteGuard::downgrade(phase)
        .send(item)
        .unwrap_or(Ok(()))
}

/// Whether a live process-wide client exists.
pub fn is_initialised() -> bool {
    matches!(*HOLDER.read(), Phase::Live(_))
}

/// How many process-wide clients have been constructed.
pub fn constructions() -> usize {
    CONSTRUCTIONS.load(Ordering::SeqCst)
}

/// Close the process-wide client's socket.
///
/// Later [`log`] calls are accepted and discarded. Calling `shutdown` again,
/// or before any client exists, only marks the facility closed.
pub fn shutdown() {
    let previous = std::mem::replace(&mut *HOLDER.write(), Phase::Closed);
    drop(previous);
}

/// Return the holder to its uninitialised state, closing any live socket.
///
/// Test support only: production code has no path back to uninitialised.
#[cfg(any(test, feature = "test-util"))]
pub fn reset() {
    let previous = std::mem::replace(&mut *HOLDER.write(), Phase::Uninitialised);
    CONSTRUCTIONS.store(0, Ordering::SeqCst);
    drop(previous);
}
