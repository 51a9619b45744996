//! DNS Module Tests
//!
//! Covers:
//! - `Name` struct
//! - `HostsResolver` used as a plain `Resolve`
//! - `GaiResolver` (Basic System Resolver)
//! - Literal address parsing

mod common;

use common::{ip, MockResolver};
use hostsresolver::dns::{parse_literal, AddressTable, GaiResolver, Name, Resolve};
use hostsresolver::intercept::HostsResolver;
use hostsresolver::socket::SystemStack;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

#[test]
fn test_name_api() {
    let name = Name::new("example.com");
    assert_eq!(name.as_str(), "example.com");
    assert_eq!(name.to_string(), "example.com");
}

#[tokio::test]
async fn test_hosts_resolver_as_resolve() {
    let mock = MockResolver::new().with("other.com", &["2001:db8::1", "8.8.8.8"]);
    let table = Arc::new(AddressTable::new());
    table.update([("local.override", ip("10.1.2.3"))]);
    let resolver: Arc<dyn Resolve> =
        Arc::new(HostsResolver::new(table.clone(), Arc::new(SystemStack::new(mock))));

    // Test override hit
    let addrs: Vec<_> = resolver.resolve(Name::new("local.override")).await.unwrap().collect();
    assert_eq!(addrs, vec![SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)), 0)]);

    // Test passthrough (miss), narrowed to IPv4 and cached
    let addrs: Vec<_> = resolver.resolve(Name::new("other.com")).await.unwrap().collect();
    assert_eq!(addrs, vec![SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 0)]);
    assert_eq!(table.lookup("other.com"), Some(ip("8.8.8.8")));

    assert!(resolver.resolve(Name::new("missing.com")).await.is_err());
}

#[tokio::test]
async fn test_gai_resolver_localhost() {
    let resolver = GaiResolver::new();
    // localhost should always resolve, usually to 127.0.0.1 or ::1
    let result = resolver.resolve(Name::new("localhost")).await;

    match result {
        Ok(addrs) => {
            let list: Vec<_> = addrs.collect();
            assert!(!list.is_empty());
        }
        // Soft fail if the system resolver is unavailable
        Err(e) => eprintln!("localhost did not resolve: {e}"),
    }
}

#[test]
fn test_parse_literal() {
    assert_eq!(parse_literal("10.0.0.1"), Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
    assert_eq!(parse_literal("::1"), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    assert_eq!(parse_literal("[::1]"), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    assert_eq!(parse_literal("web.vm"), None);
}
