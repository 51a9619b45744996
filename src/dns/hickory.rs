//! Async DNS resolver using hickory-dns.
//!
//! An alternative genuine resolver for processes that should not tie up
//! blocking threads on `getaddrinfo`. Plug it into
//! [`SystemStack::new`](crate::socket::SystemStack::new) in place of
//! [`GaiResolver`](super::GaiResolver).

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::neterror::NetError;
use hickory_resolver::{
    config::{LookupIpStrategy, ResolverConfig},
    name_server::TokioConnectionProvider,
    TokioResolver,
};
use std::{fmt, net::SocketAddr, sync::Arc};

/// Async DNS resolver backed by hickory-dns.
///
/// Follows the system DNS settings when they can be read, hickory's
/// defaults otherwise. Clones share one resolver and its cache.
#[derive(Clone)]
pub struct HickoryResolver {
    inner: Arc<TokioResolver>,
    strategy: LookupIpStrategy,
}

impl HickoryResolver {
    /// Query both address families.
    pub fn new() -> Self {
        Self::with_strategy(LookupIpStrategy::Ipv4AndIpv6)
    }

    /// Query A records only, which is all host-by-name lookups use.
    pub fn ipv4_only() -> Self {
        Self::with_strategy(LookupIpStrategy::Ipv4Only)
    }

    fn with_strategy(strategy: LookupIpStrategy) -> Self {
        let mut builder = TokioResolver::builder_tokio().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "cannot read system DNS config, using defaults");
            TokioResolver::builder_with_config(
                ResolverConfig::default(),
                TokioConnectionProvider::default(),
            )
        });
        builder.options_mut().ip_strategy = strategy;

        Self {
            inner: Arc::new(builder.build()),
            strategy,
        }
    }

    pub fn strategy(&self) -> LookupIpStrategy {
        self.strategy
    }
}

impl Default for HickoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HickoryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HickoryResolver")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl Resolve for HickoryResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let inner = self.inner.clone();
        Box::pin(async move {
            tracing::debug!(domain = %name, "resolving via hickory-dns");
            let lookup = inner.lookup_ip(name.as_str()).await.map_err(|e| {
                tracing::debug!(domain = %name, error = %e, "hickory-dns lookup failed");
                NetError::no_addresses(name.as_str(), &e.to_string())
            })?;

            let addrs: Vec<SocketAddr> = lookup.iter().map(|ip| SocketAddr::new(ip, 0)).collect();
            if addrs.is_empty() {
                return Err(NetError::no_addresses(name.as_str(), "empty answer"));
            }
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}
