//! Configuration consumed by [`LogClient`](crate::LogClient).
//!
//! The process-wide client always uses [`ClientConfig::default`]: the
//! endpoint is fixed and is not read from the environment or arguments.
//! Explicit configurations exist for callers that own a client directly.

use std::time::Duration;

use crate::{rate_limited_warner::DEFAULT_WARN_INTERVAL, transport::Endpoint};

/// Socket path used by the process-wide client, relative to the working
/// directory at connect time.
pub const DEFAULT_SOCKET_PATH: &str = "./log.sock";
/// Loopback host used on platforms without Unix domain sockets.
pub const DEFAULT_TCP_HOST: &str = "127.0.0.1";
/// Loopback port used on platforms without Unix domain sockets.
pub const DEFAULT_TCP_PORT: u16 = 9020;

/// Settings for a single [`LogClient`](crate::LogClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub endpoint: Endpoint,
    pub warn_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            warn_interval: DEFAULT_WARN_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Override the endpoint.
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Override how often dropped payloads are reported.
    pub fn with_warn_interval(mut self, interval: Duration) -> Self {
        self.warn_interval = interval;
        self
    }
}
