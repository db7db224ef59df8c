//! Filter callback for conditional event processing.

use switchyard_core::{BoxError, Callback, Event};

/// A callback that only runs its inner callback for events matching a
/// predicate.
pub struct Filtered<P, C> {
    predicate: P,
    inner: C,
}

impl<P, C> Filtered<P, C> {
    /// Create a new filtered callback.
    pub fn new(predicate: P, inner: C) -> Self {
        Self { predicate, inner }
    }
}

impl<P, C> Callback for Filtered<P, C>
where
    P: Fn(&Event) -> bool + Send + Sync + 'static,
    C: Callback,
{
    fn invoke(&self, event: &mut Event) -> Result<(), BoxError> {
        if (self.predicate)(&*event) {
            self.inner.invoke(event)
        } else {
            Ok(())
        }
    }
}
