//! The genuine name-resolution primitive.
//!
//! [`Resolve`] is what the interception layer ultimately falls back to for
//! hosts missing from the address table.

use crate::base::neterror::NetError;
use crate::dns::parse_literal;
use futures::future::BoxFuture;
use std::{
    fmt,
    future::Future,
    net::{IpAddr, SocketAddr},
    pin::Pin,
    sync::Arc,
};

/// A host name handed to a resolver.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Arc<str>,
}

impl Name {
    #[inline]
    pub fn new(host: impl Into<Arc<str>>) -> Self {
        Self { host: host.into() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }

    /// The address itself when the name is already an IP literal.
    pub fn literal(&self) -> Option<IpAddr> {
        parse_literal(&self.host)
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)
    }
}

/// Addresses produced by a resolver, all with port 0.
pub type Addrs = Box<dyn Iterator<Item = SocketAddr> + Send>;

pub type Resolving = Pin<Box<dyn Future<Output = Result<Addrs, NetError>> + Send>>;

/// Genuine host name resolution.
///
/// Resolution takes `&self` so one resolver can serve concurrent lookups.
pub trait Resolve: Send + Sync {
    fn resolve(&self, name: Name) -> Resolving;

    /// IP addresses for `name`, in resolver order.
    ///
    /// IP literals are returned as-is without consulting the resolver.
    fn lookup_ip(&self, name: Name) -> BoxFuture<'_, Result<Vec<IpAddr>, NetError>> {
        Box::pin(async move {
            if let Some(ip) = name.literal() {
                return Ok(vec![ip]);
            }
            let addrs = self.resolve(name).await?;
            Ok(addrs.map(|addr| addr.ip()).collect())
        })
    }
}

impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: Name) -> Resolving {
        (**self).resolve(name)
    }

    fn lookup_ip(&self, name: Name) -> BoxFuture<'_, Result<Vec<IpAddr>, NetError>> {
        (**self).lookup_ip(name)
    }
}
