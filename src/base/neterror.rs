use std::{io, sync::Arc};
use thiserror::Error;

/// Error codes for resolution, connection and host-discovery failures.
///
/// Codes follow Chromium's `net_error_list.h` where a matching entry exists;
/// discovery errors use a custom range starting at -900.
#[derive(Debug, Error, Clone)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection aborted")]
    ConnectionAborted,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Connection to {host}:{port} failed: {source}")]
    ConnectionFailedTo {
        host: String,
        port: u16,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("Socket not connected")]
    SocketNotConnected,
    #[error("Socket is already connected")]
    SocketIsConnected,
    #[error("Address invalid")]
    AddressInvalid,
    #[error("Address unreachable")]
    AddressUnreachable,
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("Address in use")]
    AddressInUse,

    // Name Resolution Errors
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Name not resolved: {domain}: {source}")]
    NameNotResolvedFor {
        domain: String,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("Name resolution failed")]
    NameResolutionFailed,

    // Host Discovery Errors
    #[error("Cannot read hosts file {path}: {source}")]
    HostsFileUnreadable {
        path: String,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("No provisioned machines under {root}")]
    NoMachines { root: String },
    #[error("`vagrant {command}` failed: {message}")]
    VagrantCommandFailed { command: String, message: String },

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::SocketIsConnected => -23,
            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionAborted => -103,
            NetError::ConnectionFailed | NetError::ConnectionFailedTo { .. } => -104,
            NetError::NameNotResolved | NetError::NameNotResolvedFor { .. } => -105,
            NetError::AddressInvalid => -108,
            NetError::AddressUnreachable => -109,
            NetError::SocketNotConnected => -112,
            NetError::ConnectionTimedOut => -118,
            NetError::NameResolutionFailed => -137,
            NetError::AddressInUse => -147,
            // Host discovery errors (custom codes starting at -900)
            NetError::HostsFileUnreadable { .. } => -900,
            NetError::NoMachines { .. } => -901,
            NetError::VagrantCommandFailed { .. } => -902,
            NetError::Unknown(code) => *code,
        }
    }

    /// Returns true for the "host not found" class of errors.
    ///
    /// Connect-style calls use this to decide whether a target simply is not
    /// a resolvable hostname and should be handed through untouched.
    pub fn is_name_not_resolved(&self) -> bool {
        matches!(
            self,
            NetError::NameNotResolved
                | NetError::NameNotResolvedFor { .. }
                | NetError::NameResolutionFailed
        )
    }

    /// Resolution of `domain` failed with an IO error.
    pub fn dns_failed(domain: impl Into<String>, source: io::Error) -> Self {
        NetError::NameNotResolvedFor {
            domain: domain.into(),
            source: Arc::new(source),
        }
    }

    /// Resolution of `domain` produced nothing usable.
    pub fn no_addresses(domain: impl Into<String>, reason: &str) -> Self {
        Self::dns_failed(domain, io::Error::new(io::ErrorKind::NotFound, reason.to_string()))
    }

    /// Connecting to `host:port` failed with an IO error.
    pub fn connection_failed_to(host: impl Into<String>, port: u16, source: io::Error) -> Self {
        NetError::ConnectionFailedTo {
            host: host.into(),
            port,
            source: Arc::new(source),
        }
    }

    pub fn vagrant_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        NetError::VagrantCommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -23 => NetError::SocketIsConnected,
            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -103 => NetError::ConnectionAborted,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -108 => NetError::AddressInvalid,
            -109 => NetError::AddressUnreachable,
            -112 => NetError::SocketNotConnected,
            -118 => NetError::ConnectionTimedOut,
            -137 => NetError::NameResolutionFailed,
            -147 => NetError::AddressInUse,
            _ => NetError::Unknown(code),
        }
    }
}

impl From<io::Error> for NetError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => NetError::ConnectionRefused,
            io::ErrorKind::ConnectionReset => NetError::ConnectionReset,
            io::ErrorKind::ConnectionAborted => NetError::ConnectionAborted,
            io::ErrorKind::NotConnected => NetError::SocketNotConnected,
            io::ErrorKind::AddrInUse => NetError::AddressInUse,
            io::ErrorKind::AddrNotAvailable => NetError::AddressUnreachable,
            io::ErrorKind::TimedOut => NetError::ConnectionTimedOut,
            io::ErrorKind::InvalidInput => NetError::AddressInvalid,
            _ => NetError::ConnectionFailed,
        }
    }
}
