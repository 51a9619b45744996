//! Base types and error handling.
//!
//! - [`NetError`](neterror::NetError): error codes shared by resolution,
//!   connection and host discovery
//! - [`IoResultExt`](context::IoResultExt): context helpers for IO results

pub mod context;
pub mod neterror;
