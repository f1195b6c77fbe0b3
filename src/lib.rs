//! Fire-and-forget JSON logging over a local Unix domain socket.
//!
//! [`log`] serialises any `serde::Serialize` value to JSON and writes it to
//! `./log.sock` through a process-wide, lazily connected, non-blocking
//! socket. Delivery is best effort. The call never blocks, never retries,
//! and never reports transport failures; only an item that cannot be
//! serialised produces an error.
//!
//! Each call writes one bare JSON document with no delimiter or framing.
//! Consumers split the stream themselves, as [`Collector`] does with a
//! streaming JSON parser.
//!
//! Concurrent calls are safe: construction of the shared client happens once,
//! and each write holds the client's lock so documents never interleave.

mod client;
#[cfg(unix)]
mod collector;
mod config;
mod error;
mod global;
#[cfg(feature = "log-compat")]
mod log_compat;
mod rate_limited_warner;
mod serialise;
mod transport;

pub use client::LogClient;
#[cfg(unix)]
pub use collector::{Collector, SOCKET_MODE, read_documents};
pub use config::{ClientConfig, DEFAULT_SOCKET_PATH, DEFAULT_TCP_HOST, DEFAULT_TCP_PORT};
pub use error::LogError;
#[cfg(any(test, feature = "test-util"))]
pub use global::reset;
pub use global::{constructions, is_initialised, log, shutdown};
#[cfg(feature = "log-compat")]
pub use log_compat::{LogRecordPayload, SocketLogger, install_global_logger};
pub use serialise::serialise_item;
pub use transport::Endpoint;
