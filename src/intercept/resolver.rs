//! Table-first versions of the resolution primitives.

use crate::base::neterror::NetError;
use crate::dns::{Addrs, AddressTable, Name, Resolve, Resolving};
use crate::intercept::socket::ResolvingSocket;
use crate::socket::{AddrInfoHints, NetStack, Transport};
use futures::future::BoxFuture;
use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tokio::net::TcpStream;

/// A [`NetStack`] that answers from an [`AddressTable`] before delegating to
/// the original primitives.
///
/// Every host the original resolves successfully is written back into the
/// table and served from there afterwards. Failures are not cached.
///
/// # Example
///
/// ```rust,ignore
/// use hostsresolver::dns::AddressTable;
/// use hostsresolver::intercept::HostsResolver;
/// use hostsresolver::socket::{NetStack, SystemStack};
///
/// let table = Arc::new(AddressTable::new());
/// table.update([("web.vm", "192.168.56.10".parse()?)]);
///
/// let resolver = HostsResolver::new(table, Arc::new(SystemStack::default()));
/// let stream = resolver.create_connection("web.vm", 80, None).await?;
/// ```
#[derive(Clone)]
pub struct HostsResolver {
    table: Arc<AddressTable>,
    original: Arc<dyn NetStack>,
}

impl HostsResolver {
    pub fn new(table: Arc<AddressTable>, original: Arc<dyn NetStack>) -> Self {
        Self { table, original }
    }

    pub fn table(&self) -> &Arc<AddressTable> {
        &self.table
    }

    /// The primitives this resolver delegates to.
    pub fn original(&self) -> &Arc<dyn NetStack> {
        &self.original
    }

    /// Resolve `host` through the table, falling back to the original.
    pub async fn resolve_host(&self, host: &str) -> Result<Ipv4Addr, NetError> {
        if let Some(addr) = self.table.lookup(host) {
            tracing::debug!(host = %host, %addr, "address table hit");
            return Ok(addr);
        }

        let addr = self.original.host_by_name(host).await?;
        tracing::debug!(host = %host, %addr, "caching passthrough resolution");
        self.table.insert(host, addr);
        Ok(addr)
    }
}

impl fmt::Debug for HostsResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostsResolver")
            .field("entries", &self.table.len())
            .finish_non_exhaustive()
    }
}

impl NetStack for HostsResolver {
    fn host_by_name<'a>(&'a self, host: &'a str) -> BoxFuture<'a, Result<Ipv4Addr, NetError>> {
        Box::pin(self.resolve_host(host))
    }

    // The literal handed to the original is always IPv4, so this only ever
    // yields IPv4 results, even for hosts that also have IPv6 records.
    fn addr_info<'a>(
        &'a self,
        host: &'a str,
        port: u16,
        hints: AddrInfoHints,
    ) -> BoxFuture<'a, Result<Vec<SocketAddr>, NetError>> {
        Box::pin(async move {
            let literal = self.resolve_host(host).await?.to_string();
            self.original.addr_info(&literal, port, hints).await
        })
    }

    fn create_connection<'a>(
        &'a self,
        host: &'a str,
        port: u16,
        timeout: Option<Duration>,
    ) -> BoxFuture<'a, Result<TcpStream, NetError>> {
        Box::pin(async move {
            let literal = self.resolve_host(host).await?.to_string();
            self.original.create_connection(&literal, port, timeout).await
        })
    }

    fn socket(&self) -> Box<dyn Transport> {
        Box::new(ResolvingSocket::new(self.original.socket(), self.clone()))
    }
}

impl Resolve for HostsResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let addr = resolver.resolve_host(name.as_str()).await?;
            let addr = SocketAddr::new(IpAddr::V4(addr), 0);
            Ok(Box::new(std::iter::once(addr)) as Addrs)
        })
    }
}
