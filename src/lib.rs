//! # hostsresolver
//!
//! Resolve short-lived, locally known host names (ephemeral virtual
//! machines, for instance) without a DNS server.
//!
//! An address table maps host names to IPv4 addresses. While interception is
//! installed, every lookup and connection made through the active primitives
//! consults the table first and only then falls back to genuine name
//! resolution, caching what it finds.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hostsresolver::{intercept, sources::hostsfile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hostsresolver::base::neterror::NetError> {
//!     let interceptor = intercept::global();
//!     hostsfile::install(interceptor, "tests/fixtures/hosts")?;
//!
//!     let stream = interceptor
//!         .stack()
//!         .create_connection("first.machine.example.org", 22, None)
//!         .await?;
//!     println!("connected to {:?}", stream.peer_addr());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types
//! - [`dns`] - Resolvers and the address table
//! - [`socket`] - Resolution/connection primitives and sockets
//! - [`intercept`] - Table-first primitives and install/uninstall
//! - [`sources`] - Hosts-file and Vagrant table sources

pub mod base;
pub mod dns;
pub mod intercept;
pub mod socket;
pub mod sources;
