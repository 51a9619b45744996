//! DNS Resolution Module
//!
//! Provides the name-resolution building blocks:
//! - System resolver (getaddrinfo via thread pool)
//! - Async hickory-dns resolver
//! - The process-local [`AddressTable`] consulted before either of them
//!
//! The `Resolve` trait is the core abstraction that lets different resolver
//! implementations be used interchangeably, including the table-first
//! [`HostsResolver`](crate::intercept::HostsResolver).
//!
//! # Example
//!
//! ```rust,ignore
//! use hostsresolver::dns::{GaiResolver, Name, Resolve};
//!
//! let resolver = GaiResolver::new();
//! let addrs = resolver.resolve(Name::new("example.com")).await?;
//! for addr in addrs {
//!     println!("Resolved: {}", addr);
//! }
//! ```

mod gai;
mod hickory;
mod resolve;
mod table;

pub use gai::{parse_literal, GaiResolver};
pub use hickory::HickoryResolver;
pub use resolve::{Addrs, Name, Resolve, Resolving};
pub use table::AddressTable;
