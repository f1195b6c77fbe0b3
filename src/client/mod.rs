//! The log client: one non-blocking socket, one write per item.
//!
//! `LogClient` connects once at construction and never reconnects. Every
//! [`send`](LogClient::send) serialises the item to JSON and hands the bytes
//! to a single `write` call. Would-block, partial writes, and missing peers
//! drop the payload silently; the caller only ever sees serialisation
//! failures. Dropped payloads are counted and reported through the `log`
//! facade at most once per warn interval.

use log::{debug, warn};
use parking_lot::Mutex;
use serde::Serialize;

use crate::{
    config::ClientConfig,
    error::LogError,
    rate_limited_warner::RateLimitedWarner,
    serialise::serialise_item,
    transport::{self, Connection, Endpoint},
};


/// Socket owner for the JSON log stream.
///
/// Neither `Clone` nor `Copy`: a client owns exactly
/// one socket, closed once when the client is dropped.
pub struct LogClient {
    endpoint: Endpoint,
    // Held across each write so concurrent sends cannot interleave bytes.
    connection: Mutex<Option<Connection>>,
    warner: RateLimitedWarner,
}

impl LogClient {
    /// Start connecting to the configured endpoint.
    ///
    /// Never waits on the peer: the socket is non-blocking before `connect`.
    /// A failed connection is not an error. The client keeps no socket and
    /// every later send is dropped.
    pub fn connect(config: ClientConfig) -> Self {
        let connection = match transport::connect(&config.endpoint) {
            Ok(conn) => Some(conn),
            Err(err) => {
                debug!("unixlog: cannot connect to {}: {err}", config.endpoint);
                None
            }
        };
        Self {
            endpoint: config.endpoint,
            connection: Mutex::new(connection),
            warner: RateLimitedWarner::new(config.warn_interval),
        }
    }

    /// Serialise `item` and write it to the socket in one attempt.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Serialise`] when `item` cannot be represented as
    /// JSON. Transport failures are never returned.
    pub fn send<T: Serialize + ?Sized>(&self, item: &T) -> Result<(), LogError> {
        let payload = serialise_item(item)?;
        self.write_once(&payload);
        Ok(())
    }

    /// Whether the initial connection attempt succeeded or is still pending.
    pub fn is_connected(&self) -> bool {
        self.connection.lock().is_some()
    }

    /// Endpoint this client was created for.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn write_once(&self, payload: &[u8]) {
        let outcome = match self.connection.lock().as_mut() {
            Some(conn) => conn.try_write(payload),
            None => {
                self.record_drop();
                return;
            }
        };
        match outcome {
            Ok(written) if written == payload.len() => return,
            Ok(written) => debug!(
                "unixlog: partial write to {} ({written} of {} bytes)",
                self.endpoint,
                payload.len()
            ),
            Err(err) => debug!("unixlog: write to {} failed: {err}", self.endpoint),
        }
        self.record_drop();
    }

    fn record_drop(&self) {
        self.warner.record_drop();
        self.warner.warn_if_due(|count| {
            warn!("unixlog: dropped {count} payloads for {}", self.endpoint);
        });
    }
}

impl Drop for LogClient {
    fn drop(&mut self) {
        self.warner.flush(|count| {
            warn!("unixlog: dropped {count} payloads for {} before close", self.endpoint);
        });
    }
}

impl std::fmt::Debug for LogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogClient")
            .field("endpoint", &self.endpoint)
            .field("connected", &self.is_connected())
            .finish()
    }
}
