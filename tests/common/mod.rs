//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use hostsresolver::base::neterror::NetError;
use hostsresolver::dns::{Addrs, Name, Resolve, Resolving};
use hostsresolver::intercept::Interceptor;
use hostsresolver::socket::{Connecting, SocketType, SystemStack, Target, Transport};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn ip(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

/// Resolver with a fixed set of answers that counts every lookup.
#[derive(Default)]
pub struct MockResolver {
    records: HashMap<String, Result<Vec<IpAddr>, NetError>>,
    calls: AtomicUsize,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, host: &str, addrs: &[&str]) -> Self {
        let addrs = addrs.iter().map(|a| a.parse().unwrap()).collect();
        self.records.insert(host.to_string(), Ok(addrs));
        self
    }

    pub fn failing(mut self, host: &str, err: NetError) -> Self {
        self.records.insert(host.to_string(), Err(err));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Resolve for MockResolver {
    fn resolve(&self, name: Name) -> Resolving {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = match self.records.get(name.as_str()) {
            Some(Ok(addrs)) => Ok(addrs.clone()),
            Some(Err(e)) => Err(e.clone()),
            None => Err(NetError::no_addresses(name.as_str(), "unknown host")),
        };
        Box::pin(async move {
            let addrs = result?;
            Ok(Box::new(addrs.into_iter().map(|ip| SocketAddr::new(ip, 0))) as Addrs)
        })
    }
}

/// An interceptor whose genuine primitives answer from `resolver`.
pub fn interceptor_over(resolver: &Arc<MockResolver>) -> Interceptor {
    let resolver: Arc<dyn Resolve> = resolver.clone();
    Interceptor::new(Arc::new(SystemStack::with_resolver(resolver)))
}

/// Transport that records the targets it is asked to connect to.
#[derive(Default)]
pub struct MockTransport {
    pub targets: Arc<Mutex<Vec<Target>>>,
    pub fail_with: Option<NetError>,
}

impl Transport for MockTransport {
    fn connect<'a>(&'a mut self, target: &'a Target) -> Connecting<'a> {
        Box::pin(async move {
            self.targets.lock().unwrap().push(target.clone());
            match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        })
    }

    fn stream_mut(&mut self) -> Option<&mut SocketType> {
        None
    }

    fn take_stream(&mut self) -> Option<SocketType> {
        None
    }
}
