use crate::dns::AddressTable;
use crate::intercept::resolver::HostsResolver;
use crate::socket::{NetStack, SystemStack};
use std::{
    fmt,
    net::Ipv4Addr,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

/// Whether the table-first primitives are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Uninstalled,
    Installed,
}

struct State {
    mode: Mode,
    current: Arc<dyn NetStack>,
    /// Captured by the latest `install`, put back by `uninstall`.
    originals: Option<Arc<dyn NetStack>>,
}

/// Owner of the address table and of the active set of primitives.
///
/// Code that should see interception obtains its primitives from
/// [`stack`](Self::stack) on every use instead of holding on to a
/// particular implementation.
///
/// ```rust,ignore
/// let interceptor = Interceptor::default();
/// interceptor.update([("web.vm", "192.168.56.10".parse()?)]);
/// interceptor.install();
///
/// let stream = interceptor.stack().create_connection("web.vm", 80, None).await?;
/// ```
pub struct Interceptor {
    table: Arc<AddressTable>,
    state: RwLock<State>,
}

impl Interceptor {
    /// Start uninstalled, with `system` as the active primitives.
    pub fn new(system: Arc<dyn NetStack>) -> Self {
        Self::with_table(Arc::new(AddressTable::new()), system)
    }

    pub fn with_table(table: Arc<AddressTable>, system: Arc<dyn NetStack>) -> Self {
        Self {
            table,
            state: RwLock::new(State {
                mode: Mode::Uninstalled,
                current: system,
                originals: None,
            }),
        }
    }

    pub fn table(&self) -> &Arc<AddressTable> {
        &self.table
    }

    /// Merge `mapping` into the address table.
    pub fn update<I, K>(&self, mapping: I)
    where
        I: IntoIterator<Item = (K, Ipv4Addr)>,
        K: Into<String>,
    {
        self.table.update(mapping);
    }

    /// Empty the address table.
    pub fn clear(&self) {
        self.table.clear();
    }

    pub fn mode(&self) -> Mode {
        self.state.read().unwrap_or_else(PoisonError::into_inner).mode
    }

    pub fn is_installed(&self) -> bool {
        self.mode() == Mode::Installed
    }

    /// The primitives currently in effect.
    pub fn stack(&self) -> Arc<dyn NetStack> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    /// Route every lookup through the address table.
    ///
    /// Does nothing when already installed; the primitives captured by the
    /// first call stay the ones `uninstall` restores.
    pub fn install(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.mode == Mode::Installed {
            tracing::debug!("interception already installed");
            return;
        }

        let originals = state.current.clone();
        state.current = Arc::new(HostsResolver::new(self.table.clone(), originals.clone()));
        state.originals = Some(originals);
        state.mode = Mode::Installed;
        tracing::debug!(entries = self.table.len(), "interception installed");
    }

    /// Put back the primitives captured by the latest `install`.
    ///
    /// Table entries are kept; they are just no longer consulted.
    pub fn uninstall(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(originals) = state.originals.take() {
            state.current = originals;
            tracing::debug!("interception uninstalled");
        }
        state.mode = Mode::Uninstalled;
    }
}

impl Default for Interceptor {
    fn default() -> Self {
        Self::new(Arc::new(SystemStack::default()))
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("mode", &self.mode())
            .field("entries", &self.table.len())
            .finish_non_exhaustive()
    }
}

/// The process-wide interceptor, over the system resolver.
pub fn global() -> &'static Interceptor {
    static GLOBAL: LazyLock<Interceptor> = LazyLock::new(Interceptor::default);
    &GLOBAL
}
