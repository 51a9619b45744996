//! Process-local host name to IPv4 address table.

use std::{
    collections::HashMap,
    net::Ipv4Addr,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Thread-safe map from host name to IPv4 address.
///
/// Entries are never evicted: they stay until [`clear`](Self::clear). A batch
/// passed to [`update`](Self::update) is applied under a single write lock,
/// so concurrent readers see either none or all of it.
#[derive(Debug, Default)]
pub struct AddressTable {
    entries: RwLock<HashMap<String, Ipv4Addr>>,
}

impl AddressTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoning is ignored: the map is valid after every single insert.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Ipv4Addr>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Ipv4Addr>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merge `mapping` into the table.
    ///
    /// Hosts already present are overwritten; hosts missing from `mapping`
    /// are kept.
    pub fn update<I, K>(&self, mapping: I)
    where
        I: IntoIterator<Item = (K, Ipv4Addr)>,
        K: Into<String>,
    {
        // Collect first so the lock is not held while the caller's iterator runs.
        let batch: Vec<(String, Ipv4Addr)> =
            mapping.into_iter().map(|(host, addr)| (host.into(), addr)).collect();
        let count = batch.len();

        self.write().extend(batch);
        tracing::debug!(count, "address table updated");
    }

    /// Store a single entry.
    pub fn insert(&self, host: impl Into<String>, addr: Ipv4Addr) {
        self.write().insert(host.into(), addr);
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Look up the cached address for `host`.
    pub fn lookup(&self, host: &str) -> Option<Ipv4Addr> {
        self.read().get(host).copied()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> HashMap<String, Ipv4Addr> {
        self.read().clone()
    }
}
