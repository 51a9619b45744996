//! The system resolver, and IP literal parsing.
//!
//! [`GaiResolver`] is the genuine resolver [`SystemStack`](crate::socket::SystemStack)
//! uses by default. `getaddrinfo` blocks, so every lookup runs on tokio's
//! blocking pool.

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::{context::IoResultExt, neterror::NetError};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs};

/// `getaddrinfo` on a blocking thread.
///
/// There is no timeout beyond the one the system resolver applies.
#[derive(Clone, Debug, Default)]
pub struct GaiResolver;

impl GaiResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let lookup = name.clone();
            let joined = tokio::task::spawn_blocking(move || {
                (lookup.as_str(), 0u16)
                    .to_socket_addrs()
                    .map(|addrs| addrs.collect::<Vec<_>>())
            })
            .await;

            // A join error means the blocking task panicked or was cancelled.
            let addrs = joined
                .map_err(|e| {
                    tracing::error!(domain = %name, error = %e, "getaddrinfo task failed");
                    NetError::NameResolutionFailed
                })?
                .inspect_err(|e| tracing::debug!(domain = %name, error = %e, "getaddrinfo failed"))
                .dns_context(name.as_str())?;

            if addrs.is_empty() {
                return Err(NetError::no_addresses(name.as_str(), "empty getaddrinfo answer"));
            }

            tracing::debug!(domain = %name, count = addrs.len(), "getaddrinfo answered");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

/// Parses a host string that is already an IP literal.
///
/// Returns `None` for anything that needs real resolution. Literals never
/// reach a resolver, the same way `getaddrinfo` answers them locally.
pub fn parse_literal(host: &str) -> Option<IpAddr> {
    if let Ok(addr) = host.parse::<Ipv4Addr>() {
        return Some(IpAddr::V4(addr));
    }
    // Bracketed form as found in URLs.
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    bare.parse::<Ipv6Addr>().ok().map(IpAddr::V6)
}
