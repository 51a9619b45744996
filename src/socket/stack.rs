//! The resolution and connection primitives a process uses.
//!
//! [`NetStack`] bundles the four entry points that the interception layer
//! captures and replaces. [`SystemStack`] is the genuine implementation.

use crate::base::neterror::NetError;
use crate::dns::{GaiResolver, Name, Resolve};
use crate::socket::transport::{connect_first, SystemSocket, Transport};
use futures::future::BoxFuture;
use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tokio::net::TcpStream;

/// Address family filter for [`NetStack::addr_info`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Family {
    #[default]
    Any,
    Ipv4,
    Ipv6,
}

/// Extra arguments to an address-info lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AddrInfoHints {
    pub family: Family,
}

impl AddrInfoHints {
    pub fn family(family: Family) -> Self {
        Self { family }
    }

    fn accepts(&self, addr: &SocketAddr) -> bool {
        match self.family {
            Family::Any => true,
            Family::Ipv4 => addr.is_ipv4(),
            Family::Ipv6 => addr.is_ipv6(),
        }
    }
}

/// Name-resolution and connection-establishment entry points.
pub trait NetStack: Send + Sync {
    /// First IPv4 address of `host`.
    fn host_by_name<'a>(&'a self, host: &'a str) -> BoxFuture<'a, Result<Ipv4Addr, NetError>>;

    /// Every address of `host`, with `port` filled in and filtered by `hints`.
    fn addr_info<'a>(
        &'a self,
        host: &'a str,
        port: u16,
        hints: AddrInfoHints,
    ) -> BoxFuture<'a, Result<Vec<SocketAddr>, NetError>>;

    /// Resolve `host` and connect to each of its addresses in turn.
    ///
    /// `timeout` bounds every individual attempt.
    fn create_connection<'a>(
        &'a self,
        host: &'a str,
        port: u16,
        timeout: Option<Duration>,
    ) -> BoxFuture<'a, Result<TcpStream, NetError>>;

    /// A new, unconnected socket.
    fn socket(&self) -> Box<dyn Transport>;
}

impl<S: NetStack + ?Sized> NetStack for Arc<S> {
    fn host_by_name<'a>(&'a self, host: &'a str) -> BoxFuture<'a, Result<Ipv4Addr, NetError>> {
        (**self).host_by_name(host)
    }

    fn addr_info<'a>(
        &'a self,
        host: &'a str,
        port: u16,
        hints: AddrInfoHints,
    ) -> BoxFuture<'a, Result<Vec<SocketAddr>, NetError>> {
        (**self).addr_info(host, port, hints)
    }

    fn create_connection<'a>(
        &'a self,
        host: &'a str,
        port: u16,
        timeout: Option<Duration>,
    ) -> BoxFuture<'a, Result<TcpStream, NetError>> {
        (**self).create_connection(host, port, timeout)
    }

    fn socket(&self) -> Box<dyn Transport> {
        (**self).socket()
    }
}

/// The genuine primitives, backed by a [`Resolve`] implementation.
#[derive(Clone)]
pub struct SystemStack {
    resolver: Arc<dyn Resolve>,
}

impl SystemStack {
    pub fn new(resolver: impl Resolve + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    pub fn with_resolver(resolver: Arc<dyn Resolve>) -> Self {
        Self { resolver }
    }

    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, NetError> {
        self.resolver.lookup_ip(Name::new(host)).await
    }
}

impl Default for SystemStack {
    fn default() -> Self {
        Self::new(GaiResolver::new())
    }
}

impl fmt::Debug for SystemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemStack").finish_non_exhaustive()
    }
}

impl NetStack for SystemStack {
    fn host_by_name<'a>(&'a self, host: &'a str) -> BoxFuture<'a, Result<Ipv4Addr, NetError>> {
        Box::pin(async move {
            self.lookup(host)
                .await?
                .into_iter()
                .find_map(|ip| match ip {
                    IpAddr::V4(v4) => Some(v4),
                    IpAddr::V6(_) => None,
                })
                .ok_or_else(|| NetError::no_addresses(host, "No IPv4 address"))
        })
    }

    fn addr_info<'a>(
        &'a self,
        host: &'a str,
        port: u16,
        hints: AddrInfoHints,
    ) -> BoxFuture<'a, Result<Vec<SocketAddr>, NetError>> {
        Box::pin(async move {
            let addrs: Vec<SocketAddr> = self
                .lookup(host)
                .await?
                .into_iter()
                .map(|ip| SocketAddr::new(ip, port))
                .filter(|addr| hints.accepts(addr))
                .collect();

            if addrs.is_empty() {
                return Err(NetError::no_addresses(host, "No address for requested family"));
            }
            Ok(addrs)
        })
    }

    fn create_connection<'a>(
        &'a self,
        host: &'a str,
        port: u16,
        timeout: Option<Duration>,
    ) -> BoxFuture<'a, Result<TcpStream, NetError>> {
        Box::pin(async move {
            let addrs = self.addr_info(host, port, AddrInfoHints::default()).await?;
            connect_first(host, port, addrs, timeout).await
        })
    }

    fn socket(&self) -> Box<dyn Transport> {
        Box::new(SystemSocket::new(self.resolver.clone()))
    }
}
