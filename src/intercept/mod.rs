//! Resolution interception.
//!
//! While installed, an [`Interceptor`] serves the [`HostsResolver`]
//! primitives: every host name is looked up in the address table first and
//! only then handed to the genuine resolver, whose answers are cached.
//!
//! Interception is explicit. Connection code has to take its primitives from
//! [`Interceptor::stack`] (or be handed a [`HostsResolver`]); anything that
//! talks to the system resolver directly is not affected.
//!
//! The free functions operate on the process-wide [`global`] interceptor.

mod resolver;
mod socket;
mod state;

pub use resolver::HostsResolver;
pub use socket::ResolvingSocket;
pub use state::{global, Interceptor, Mode};

use std::net::Ipv4Addr;

/// Merge `mapping` into the process-wide address table.
pub fn update<I, K>(mapping: I)
where
    I: IntoIterator<Item = (K, Ipv4Addr)>,
    K: Into<String>,
{
    global().update(mapping);
}

/// Empty the process-wide address table.
pub fn clear() {
    global().clear();
}

/// Install interception on the process-wide interceptor.
pub fn install() {
    global().install();
}

/// Remove interception from the process-wide interceptor.
pub fn uninstall() {
    global().uninstall();
}
