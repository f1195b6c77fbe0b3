//! Transport primitives for the log client.
//!
//! Sockets are made non-blocking before `connect`, so neither a slow nor an
//! absent peer can stall the caller. Each write is a single `write` call.
//! Nothing here retries.

use std::{
    fmt,
    io::{self, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    path::PathBuf,
};

#[cfg(unix)]
use std::os::unix::net::UnixStream;

use log::debug;
use socket2::{Domain, SockAddr, Socket, Type};

use crate::config::{DEFAULT_SOCKET_PATH, DEFAULT_TCP_HOST, DEFAULT_TCP_PORT};

/// Address the client writes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Unix domain stream socket at a filesystem path.
    Unix(PathBuf),
    /// Loopback TCP, used where Unix domain sockets are unavailable.
    Tcp { host: String, port: u16 },
}

impl Endpoint {
    /// Unix socket endpoint at `path`.
    pub fn unix(path: impl Into<PathBuf>) -> Self {
        Self::Unix(path.into())
    }

    /// TCP endpoint at `host:port`.
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::Tcp {
            host: host.into(),
            port,
        }
    }

    fn socket_addrs(host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        (host, port).to_socket_addrs().map(|iter| iter.collect())
    }
}

/// `./log.sock` where Unix sockets exist, loopback TCP elsewhere.
impl Default for Endpoint {
    fn default() -> Self {
        if cfg!(unix) {
            Self::unix(DEFAULT_SOCKET_PATH)
        } else {
            Self::tcp(DEFAULT_TCP_HOST, DEFAULT_TCP_PORT)
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Unix(path) => write!(f, "unix:{}", path.display()),
            Endpoint::Tcp { host, port } => write!(f, "tcp:{host}:{port}"),
        }
    }
}

/// Connected, non-blocking socket.
#[derive(Debug)]
pub enum Connection {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Connection {
    /// Perform exactly one `write` call.
    ///
    /// Returns the number of bytes the kernel accepted, which may be fewer
    /// than `buf.len()`. `WouldBlock` is returned as an error when the socket
    /// buffer is full.
    pub fn try_write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Connection::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.write(buf),
        }
    }
}

/// Whether a non-blocking `connect` reported a pending handshake.
///
/// TCP reports `EINPROGRESS`. A Unix socket whose listener backlog is full
/// reports `EAGAIN`; that attempt never completes, so later writes drop.
fn is_pending(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }
    #[cfg(unix)]
    {
        err.raw_os_error() == Some(libc::EINPROGRESS)
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// Create a socket, switch it to non-blocking, then start connecting.
fn connect_nonblocking(domain: Domain, addr: &SockAddr) -> io::Result<Socket> {
    let socket = Socket::new(domain, Type::STREAM, None)?;
    socket.set_nonblocking(true)?;
    match socket.connect(addr) {
        Ok(()) => Ok(socket),
        Err(err) if is_pending(&err) => {
            debug!("unixlog: connect in progress: {err}");
            Ok(socket)
        }
        Err(err) => Err(err),
    }
}

fn connect_tcp(host: &str, port: u16) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in Endpoint::socket_addrs(host, port)? {
        match connect_nonblocking(Domain::for_address(addr), &SockAddr::from(addr)) {
            Ok(socket) => return Ok(socket.into()),
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no addresses resolved for {host}:{port}"),
        )
    }))
}

/// Start a non-blocking connection to `endpoint`.
///
/// The socket is non-blocking before `connect` runs, so this never waits on
/// the peer. A handshake still in progress, or a Unix listener whose backlog
/// is full, yields a `Connection` whose writes may fail; immediate refusals
/// such as a missing socket file are returned as errors.
pub fn connect(endpoint: &Endpoint) -> io::Result<Connection> {
    match endpoint {
        Endpoint::Tcp { host, port } => connect_tcp(host, *port).map(Connection::Tcp),
        Endpoint::Unix(path) => {
            #[cfg(unix)]
            {
                let socket = connect_nonblocking(Domain::UNIX, &SockAddr::unix(path)?)?;
                Ok(Connection::Unix(std::os::fd::OwnedFd::from(socket).into()))
            }
            #[cfg(not(unix))]
            {
                let _ = path;
                Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "unix domain sockets are not supported on this platform",
                ))
            }
        }
    }
}
