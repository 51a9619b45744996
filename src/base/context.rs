//! Attach the host, domain or file an IO error is about.

use crate::base::neterror::NetError;
use std::{io, path::Path, sync::Arc};

/// Converts `io::Result` into `NetError` variants that carry context.
pub trait IoResultExt<T> {
    /// Tag a failed connection with its destination.
    ///
    /// ```ignore
    /// use hostsresolver::base::context::IoResultExt;
    ///
    /// let stream = TcpStream::connect(addr).await.connection_context("web.vm", 22)?;
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// Tag a failed lookup with the name being resolved.
    fn dns_context(self, domain: &str) -> Result<T, NetError>;

    /// Tag a failed hosts-file read with its path.
    fn hosts_file_context(self, path: &Path) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| NetError::connection_failed_to(host, port, e))
    }

    fn dns_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::dns_failed(domain, e))
    }

    fn hosts_file_context(self, path: &Path) -> Result<T, NetError> {
        self.map_err(|e| NetError::HostsFileUnreadable {
            path: path.display().to_string(),
            source: Arc::new(e),
        })
    }
}
