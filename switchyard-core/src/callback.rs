//! Listener callbacks.
//!
//! A [`Callback`] is what a listener runs when an event of its type is
//! dispatched. It may mutate or replace `event.data` and may stop propagation.

use crate::{error::BoxError, event::Event};

/// The listener callback capability.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a listener `Callback`",
    label = "missing `Callback` implementation",
    note = "Implement `Callback::invoke`, or wrap a closure with `callback_fn`."
)]
pub trait Callback: Send + Sync + 'static {
    /// Observe or rewrite the event.
    fn invoke(&self, event: &mut Event) -> Result<(), BoxError>;
}

/// A [`Callback`] built from a closure. See [`callback_fn`].
#[derive(Clone, Copy)]
pub struct CallbackFn<F> {
    f: F,
}

/// Wrap a closure as a [`Callback`].
pub fn callback_fn<F>(f: F) -> CallbackFn<F>
where
    F: Fn(&mut Event) -> Result<(), BoxError> + Send + Sync + 'static,
{
    CallbackFn { f }
}

impl<F> Callback for CallbackFn<F>
where
    F: Fn(&mut Event) -> Result<(), BoxError> + Send + Sync + 'static,
{
    fn invoke(&self, event: &mut Event) -> Result<(), BoxError> {
        (self.f)(event)
    }
}

impl<F> std::fmt::Debug for CallbackFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackFn").finish_non_exhaustive()
    }
}
