//! Observer pattern for circuit primitives
//!
//! Primitives publish an event whenever something is lost or completed:
//! a clock wraps, a shift register drops its tail, a ring buffer overwrites
//! its oldest entry. Subscribers are notified synchronously, in
//! subscription order, from inside the mutating call.

use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Event emitted by a circuit primitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CircuitEvent {
    /// A clock completed a cycle.
    Pulse {
        interval: usize,
        /// Cycles completed including this one.
        cycles: u64,
    },
    /// A shift register push dropped a present tail value.
    Evicted { stages: usize },
    /// A ring buffer write discarded the oldest entry.
    Overwritten { capacity: usize },
}

/// Observer that receives circuit events
pub trait CircuitObserver: Send + Sync {
    /// Called when a circuit event occurs
    fn on_event(&self, event: CircuitEvent);
}

/// Function-based observer for simple cases
pub struct FnObserver<F: Fn(CircuitEvent) + Send + Sync>(pub F);

impl<F: Fn(CircuitEvent) + Send + Sync> CircuitObserver for FnObserver<F> {
    fn on_event(&self, event: CircuitEvent) {
        (self.0)(event);
    }
}

/// Channel-based observer - sends events to a channel
pub struct ChannelObserver {
    sender: Sender<CircuitEvent>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<CircuitEvent>) -> Self {
        Self { sender }
    }
}

impl CircuitObserver for ChannelObserver {
    fn on_event(&self, event: CircuitEvent) {
        // Receiver hung up: nothing left to notify.
        let _ = self.sender.send(event);
    }
}

/// Subscriber list embedded in each primitive.
///
/// Cloning a primitive shares its subscribers.
#[derive(Clone, Default)]
pub(crate) struct Observers(Vec<Arc<dyn CircuitObserver>>);

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: Arc<dyn CircuitObserver>) {
        self.0.push(observer);
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    pub(crate) fn notify(&self, event: CircuitEvent) {
        for observer in &self.0 {
            observer.on_event(event.clone());
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.0.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notify_in_order() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut observers = Observers::default();

        for id in 0..3 {
            let seen = Arc::clone(&seen);
            observers.subscribe(Arc::new(FnObserver(move |_| {
                seen.lock().unwrap().push(id);
            })));
        }
        observers.notify(CircuitEvent::Evicted { stages: 2 });

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(observers.len(), 3);
    }

    #[test]
    fn test_channel_observer() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut observers = Observers::default();
        observers.subscribe(Arc::new(ChannelObserver::new(tx)));

        observers.notify(CircuitEvent::Overwritten { capacity: 4 });
        assert_eq!(rx.recv().unwrap(), CircuitEvent::Overwritten { capacity: 4 });

        // Dropped receiver is not an error.
        drop(rx);
        observers.notify(CircuitEvent::Overwritten { capacity: 4 });
    }

    #[test]
    fn test_clear() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut observers = Observers::default();
        let c = Arc::clone(&count);
        observers.subscribe(Arc::new(FnObserver(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        })));

        observers.notify(CircuitEvent::Evicted { stages: 1 });
        observers.clear();
        observers.notify(CircuitEvent::Evicted { stages: 1 });

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(observers.len(), 0);
    }
}
