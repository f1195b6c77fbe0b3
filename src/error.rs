//! Error type shared by the client, the `log` bridge, and the collector.

use std::io;

use thiserror::Error;

/// Errors surfaced by the crate.
///
/// Transport failures on the sending side never appear here: the client
/// swallows them. The only error [`log`](crate::log) can return is
/// [`LogError::Serialise`], which points at a programming error at the call
/// site.
#[derive(Debug, Error)]
pub enum LogError {
    /// The item could not be represented as JSON.
    #[error("failed to serialise log item: {0}")]
    Serialise(#[source] serde_json::Error),
    /// A collector received bytes that are not a JSON document.
    #[error("failed to decode log document: {0}")]
    Decode(#[source] serde_json::Error),
    /// Underlying I/O error on the receiving side.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Another `log` crate logger was installed first.
    #[error("a global Rust logger is already set; the unixlog bridge cannot be installed")]
    LoggerAlreadySet,
}
