//! Unconnected sockets and the targets they connect to.

use crate::base::{context::IoResultExt, neterror::NetError};
use crate::dns::{Name, Resolve};
use crate::socket::client::SocketType;
use futures::future::BoxFuture;
use std::{
    fmt,
    net::SocketAddr,
    sync::Arc,
    time::Duration,
};
use tokio::net::TcpStream;
#[cfg(unix)]
use {std::path::PathBuf, tokio::net::UnixStream};

/// Where a socket connects to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// A host name or IP literal plus port.
    Inet { host: String, port: u16 },
    /// A filesystem path naming a local stream socket.
    #[cfg(unix)]
    Unix(PathBuf),
}

impl Target {
    pub fn inet(host: impl Into<String>, port: u16) -> Self {
        Target::Inet {
            host: host.into(),
            port,
        }
    }

    #[cfg(unix)]
    pub fn unix(path: impl Into<PathBuf>) -> Self {
        Target::Unix(path.into())
    }

    /// The host part, for network targets.
    pub fn host(&self) -> Option<&str> {
        match self {
            Target::Inet { host, .. } => Some(host),
            #[cfg(unix)]
            Target::Unix(_) => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Inet { host, port } => write!(f, "{host}:{port}"),
            #[cfg(unix)]
            Target::Unix(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Future returned by [`Transport::connect`].
pub type Connecting<'a> = BoxFuture<'a, Result<(), NetError>>;

/// A socket that can be connected once.
///
/// Mirrors the two connect flavours of a BSD socket: [`connect`](Self::connect)
/// reports failure as an error, [`connect_ex`](Self::connect_ex) as an error
/// code (`0` on success, a negative [`NetError`] code otherwise).
pub trait Transport: Send {
    fn connect<'a>(&'a mut self, target: &'a Target) -> Connecting<'a>;

    fn connect_ex<'a>(&'a mut self, target: &'a Target) -> BoxFuture<'a, i32> {
        Box::pin(async move {
            match self.connect(target).await {
                Ok(()) => 0,
                Err(e) => e.as_i32(),
            }
        })
    }

    /// The connected stream, if `connect` succeeded.
    fn stream_mut(&mut self) -> Option<&mut SocketType>;

    /// Take ownership of the connected stream.
    fn take_stream(&mut self) -> Option<SocketType>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect<'a>(&'a mut self, target: &'a Target) -> Connecting<'a> {
        (**self).connect(target)
    }

    fn connect_ex<'a>(&'a mut self, target: &'a Target) -> BoxFuture<'a, i32> {
        (**self).connect_ex(target)
    }

    fn stream_mut(&mut self) -> Option<&mut SocketType> {
        (**self).stream_mut()
    }

    fn take_stream(&mut self) -> Option<SocketType> {
        (**self).take_stream()
    }
}

/// Plain socket: resolves host names with the genuine resolver and opens a
/// TCP (or unix) stream.
pub struct SystemSocket {
    resolver: Arc<dyn Resolve>,
    stream: Option<SocketType>,
}

impl SystemSocket {
    pub fn new(resolver: Arc<dyn Resolve>) -> Self {
        Self {
            resolver,
            stream: None,
        }
    }

    async fn open(&self, target: &Target) -> Result<SocketType, NetError> {
        match target {
            Target::Inet { host, port } => {
                let addrs = self
                    .resolver
                    .lookup_ip(Name::new(host.as_str()))
                    .await?
                    .into_iter()
                    .map(|ip| SocketAddr::new(ip, *port))
                    .collect();
                let stream = connect_first(host, *port, addrs, None).await?;
                Ok(SocketType::Tcp(stream))
            }
            #[cfg(unix)]
            Target::Unix(path) => {
                let stream = UnixStream::connect(path).await.map_err(|e| {
                    tracing::debug!(path = %path.display(), error = %e, "unix connect failed");
                    NetError::from(e)
                })?;
                Ok(SocketType::Unix(stream))
            }
        }
    }
}

impl fmt::Debug for SystemSocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemSocket")
            .field("stream", &self.stream)
            .finish_non_exhaustive()
    }
}

impl Transport for SystemSocket {
    fn connect<'a>(&'a mut self, target: &'a Target) -> Connecting<'a> {
        Box::pin(async move {
            if self.stream.is_some() {
                return Err(NetError::SocketIsConnected);
            }
            let stream = self.open(target).await?;
            self.stream = Some(stream);
            Ok(())
        })
    }

    fn stream_mut(&mut self) -> Option<&mut SocketType> {
        self.stream.as_mut()
    }

    fn take_stream(&mut self) -> Option<SocketType> {
        self.stream.take()
    }
}

/// Try each address in order and return the first stream that connects.
///
/// The error of the last attempt is reported, tagged with `host:port`.
pub(crate) async fn connect_first(
    host: &str,
    port: u16,
    addrs: Vec<SocketAddr>,
    timeout: Option<Duration>,
) -> Result<TcpStream, NetError> {
    let mut last_err = None;
    for addr in addrs {
        let attempt = match timeout {
            Some(limit) => match tokio::time::timeout(limit, TcpStream::connect(addr)).await {
                Ok(result) => result,
                Err(_) => Err(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("connect to {addr} timed out"),
                )),
            },
            None => TcpStream::connect(addr).await,
        };
        match attempt {
            Ok(stream) => {
                tracing::debug!(host = %host, %addr, "connected");
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!(host = %host, %addr, error = %e, "connect attempt failed");
                last_err = Some(e);
            }
        }
    }

    match last_err {
        Some(e) if e.kind() == std::io::ErrorKind::TimedOut => Err(NetError::ConnectionTimedOut),
        Some(e) => Err(e).connection_context(host, port),
        None => Err(NetError::no_addresses(host, "No addresses to connect to")),
    }
}
