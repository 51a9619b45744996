use crate::base::neterror::NetError;
use crate::intercept::resolver::HostsResolver;
use crate::socket::{Connecting, SocketType, Target, Transport};
use futures::future::BoxFuture;
use std::borrow::Cow;

/// Socket decorator that rewrites host names through a [`HostsResolver`]
/// before handing the target to the wrapped transport.
///
/// Targets that cannot be resolved as a host name reach the inner transport
/// unchanged, so non-network addresses keep working.
pub struct ResolvingSocket<T> {
    inner: T,
    resolver: HostsResolver,
}

impl<T: Transport> ResolvingSocket<T> {
    pub fn new(inner: T, resolver: HostsResolver) -> Self {
        Self { inner, resolver }
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// Replace the host of a network target by its resolved address.
///
/// A "not found" answer keeps the original target; other errors propagate.
async fn rewrite<'t>(
    resolver: &HostsResolver,
    target: &'t Target,
) -> Result<Cow<'t, Target>, NetError> {
    let Target::Inet { host, port } = target else {
        return Ok(Cow::Borrowed(target));
    };
    match resolver.resolve_host(host).await {
        Ok(addr) => Ok(Cow::Owned(Target::inet(addr.to_string(), *port))),
        Err(e) if e.is_name_not_resolved() => {
            tracing::debug!(addr = %target, error = %e, "not a known host, passing through");
            Ok(Cow::Borrowed(target))
        }
        Err(e) => Err(e),
    }
}

impl<T: Transport> Transport for ResolvingSocket<T> {
    fn connect<'a>(&'a mut self, target: &'a Target) -> Connecting<'a> {
        Box::pin(async move {
            let target = rewrite(&self.resolver, target).await?;
            self.inner.connect(&target).await
        })
    }

    fn connect_ex<'a>(&'a mut self, target: &'a Target) -> BoxFuture<'a, i32> {
        Box::pin(async move {
            match rewrite(&self.resolver, target).await {
                Ok(target) => self.inner.connect_ex(&target).await,
                Err(e) => e.as_i32(),
            }
        })
    }

    fn stream_mut(&mut self) -> Option<&mut SocketType> {
        self.inner.stream_mut()
    }

    fn take_stream(&mut self) -> Option<SocketType> {
        self.inner.take_stream()
    }
}
