//! Receiving end of the log socket.
//!
//! A `Collector` owns the socket file: binding removes any stale file at the
//! path, makes the new one writable by every local user, and dropping the
//! collector removes it again. Clients write bare JSON documents with no
//! delimiter, and one connection may carry many of them, so each connection
//! is decoded with a streaming JSON parser until EOF.

use std::{
    fs,
    io::{self, BufReader, Read},
    os::unix::{fs::PermissionsExt, net::UnixListener},
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde_json::{Deserializer, Value};

use crate::error::LogError;

/// Permission bits applied to the bound socket file.
pub const SOCKET_MODE: u32 = 0o666;

/// Listener bound to a socket path, decoding JSON documents from clients.
#[derive(Debug)]
pub struct Collector {
    listener: UnixListener,
    path: PathBuf,
}

impl Collector {
    /// Bind a listener at `path`, replacing any file already there.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] if the stale file cannot be removed, the
    /// socket cannot be bound, or its permissions cannot be changed.
    pub fn bind(path: impl Into<PathBuf>) -> Result<Self, LogError> {
        let path = path.into();
        match fs::remove_file(&path) {
            Ok(()) => debug!("unixlog: removed stale socket {}", path.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        let listener = UnixListener::bind(&path)?;
        let collector = Self { listener, path };
        fs::set_permissions(&collector.path, fs::Permissions::from_mode(SOCKET_MODE))?;
        Ok(collector)
    }

    /// Path of the bound socket file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accept one connection and pass each document on it to `sink`.
    ///
    /// Blocks until a client connects and then until that client closes its
    /// end. Returns the number of documents decoded.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] if accepting fails and [`LogError::Decode`]
    /// if the connection carries malformed JSON. Documents decoded before a
    /// malformed one have already reached `sink`.
    pub fn accept_one(&self, mut sink: impl FnMut(Value)) -> Result<usize, LogError> {
        let (stream, _) = self.listener.accept()?;
        read_documents(stream, &mut sink)
    }

    /// Accept connections until accepting fails.
    ///
    /// A connection that carries malformed JSON is logged and abandoned;
    /// the loop moves on to the next client.
    ///
    /// # Errors
    ///
    /// Returns the accept failure that ended the loop.
    pub fn serve(&self, mut sink: impl FnMut(Value)) -> Result<(), LogError> {
        loop {
            let (stream, _) = self.listener.accept().map_err(|err| {
                warn!("unixlog: accept on {} failed: {err}", self.path.display());
                err
            })?;
            match read_documents(stream, &mut sink) {
                Ok(count) => debug!("unixlog: connection closed after {count} documents"),
                Err(err) => warn!("unixlog: abandoning connection: {err}"),
            }
        }
    }
}

impl Drop for Collector {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                warn!("unixlog: cannot remove {}: {err}", self.path.display());
            }
        }
    }
}

/// Decode concatenated JSON documents from `reader` until EOF.
///
/// # Errors
///
/// Returns [`LogError::Decode`] on the first malformed document.
pub fn read_documents<R: Read>(
    reader: R,
    sink: &mut impl FnMut(Value),
) -> Result<usize, LogError> {
    let mut count = 0;
    for document in Deserializer::from_reader(BufReader::new(reader)).into_iter::<Value>() {
        sink(document.map_err(LogError::Decode)?);
        count += 1;
    }
    Ok(count)
}
