//! Sockets and the connection primitives.
//!
//! - [`stack`]: the [`NetStack`] entry points and their genuine implementation
//! - [`transport`]: connectable sockets and [`Target`] addresses
//! - [`client`]: the connected stream type

pub mod client;
pub mod stack;
pub mod transport;

pub use client::SocketType;
pub use stack::{AddrInfoHints, Family, NetStack, SystemStack};
pub use transport::{Connecting, SystemSocket, Target, Transport};
