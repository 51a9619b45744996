//! Static hosts-file source.
//!
//! Reads `<ipv4-address> <name> [name...]` lines. Comments, IPv6 entries and
//! loopback (`127.x.x.x`) entries are ignored.

use crate::base::{context::IoResultExt, neterror::NetError};
use crate::intercept::Interceptor;
use std::{collections::HashMap, net::Ipv4Addr, path::Path};

/// Parse hosts-file text into a name to address map.
///
/// Later lines win when a name appears more than once. Lines that do not
/// describe a usable IPv4 entry are skipped silently.
pub fn parse_content(content: &str) -> HashMap<String, Ipv4Addr> {
    let mut hosts = HashMap::new();

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or_default();
        let mut tokens = line.split_whitespace();
        let (Some(address), Some(first)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        let Some(addr) = parse_ipv4(address) else {
            continue;
        };
        if addr.octets()[0] == 127 {
            continue;
        }

        for name in std::iter::once(first).chain(tokens) {
            hosts.insert(name.to_string(), addr);
        }
    }

    tracing::debug!(count = hosts.len(), "parsed hosts entries");
    hosts
}

/// Four dot-separated decimal components, each an octet.
fn parse_ipv4(address: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = address.split('.');
    for octet in &mut octets {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Ipv4Addr::from(octets))
}

/// Read and parse the hosts file at `path`.
pub fn known_hosts(path: impl AsRef<Path>) -> Result<HashMap<String, Ipv4Addr>, NetError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).hosts_file_context(path)?;
    Ok(parse_content(&content))
}

/// Load the hosts file at `path` into `interceptor` and install it.
///
/// The table is left untouched when the file cannot be read.
pub fn install(interceptor: &Interceptor, path: impl AsRef<Path>) -> Result<(), NetError> {
    let hosts = known_hosts(path)?;
    interceptor.update(hosts);
    interceptor.install();
    Ok(())
}
