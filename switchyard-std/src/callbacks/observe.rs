//! Read-only observer callback.

use switchyard_core::{BoxError, Callback, Event};

/// A callback that looks at events without being able to change them.
pub struct Observe<F> {
    observer: F,
}

impl<F> Observe<F> {
    /// Create a new observer.
    pub fn new(observer: F) -> Self {
        Self { observer }
    }
}

impl<F> Callback for Observe<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn invoke(&self, event: &mut Event) -> Result<(), BoxError> {
        (self.observer)(&*event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[test]
    fn test_observe() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let observe = Observe::new(move |event: &Event| {
            if event.kind() == "tick" {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        let mut event = Event::empty("tick");
        observe.invoke(&mut event).unwrap();
        observe.invoke(&mut Event::empty("tock")).unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(!event.is_propagation_stopped());
    }
}
