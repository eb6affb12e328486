use std::{
    collections::VecDeque,
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::{self, ThreadId},
};

use tracing::{debug, trace};

use crate::{
    lock_unpoisoned,
    observer::Observer,
    subscription::subscribe::{Subscribeable, Subscriber, Subscription, UnsubscribeLogic},
};

const DEFAULT_CAPACITY: usize = 16;

struct Registration<T> {
    key: u64,
    active: Arc<AtomicBool>,
    subscriber: Arc<Mutex<Subscriber<T>>>,
}

impl<T> Clone for Registration<T> {
    fn clone(&self) -> Self {
        Registration {
            key: self.key,
            active: Arc::clone(&self.active),
            subscriber: Arc::clone(&self.subscriber),
        }
    }
}

impl<T> Registration<T> {
    fn deliver(&self, value: T) {
        let mut subscriber = lock_unpoisoned(&self.subscriber);
        // Disposed by an earlier observer of this same push.
        if !self.active.load(Ordering::SeqCst) {
            return;
        }
        subscriber.on_value(value);
    }
}

struct Registry<T> {
    observers: Vec<Registration<T>>,
    next_key: u64,
    // Thread running the current delivery pass, if any.
    delivering: Option<ThreadId>,
    // Values pushed from inside a callback of the current pass.
    pending: VecDeque<T>,
}

// Marks the registry as being delivered by one thread; cleared even if an
// observer panics.
struct DeliveryPass<'a, T> {
    registry: &'a Mutex<Registry<T>>,
}

impl<'a, T> DeliveryPass<'a, T> {
    fn enter(registry: &'a Mutex<Registry<T>>, thread: ThreadId) -> Self {
        lock_unpoisoned(registry).delivering = Some(thread);
        DeliveryPass { registry }
    }
}

impl<T> Drop for DeliveryPass<'_, T> {
    fn drop(&mut self) {
        let mut registry = lock_unpoisoned(self.registry);
        registry.delivering = None;
        // Only non-empty when a callback panicked mid-pass.
        registry.pending.clear();
    }
}

/// The origin of a value stream.
///
/// A `Source` multicasts every pushed value to all currently registered observers,
/// synchronously and in subscription order. It keeps no history: values pushed
/// while nobody is subscribed are lost and late subscribers only see future pushes.
///
/// Cloning a `Source` is shallow: clones share the same observer list.
///
/// # Re-entrancy
///
/// Every push iterates over a snapshot of the observer list taken when the push
/// starts. Observers may subscribe, dispose (themselves or each other) or push
/// from inside [`on_value`](Observer::on_value):
///
/// - an observer registered during a push first sees the next push;
/// - an observer disposed during a push receives nothing more, not even the
///   value currently being delivered if it has not reached it yet;
/// - a value pushed into the same source from a callback is queued and delivered
///   to every observer once the current value has reached all of them, before the
///   outer `push` returns.
///
/// Pushes from different threads are delivered one at a time; a push made while
/// another thread is delivering waits for that pass to finish.
///
/// # Panics
///
/// A panic raised by an observer propagates out of [`push`](Source::push). The
/// remaining observers of that push are skipped and values queued by callbacks
/// during it are dropped. The source stays usable; its observer list is never
/// locked while callbacks run.
///
/// # Examples
///
///```
/// use std::sync::{Arc, Mutex};
///
/// use pipe::{Source, Subscribeable, Subscriber};
///
/// let source = Source::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let seen_c = Arc::clone(&seen);
///
/// source.push(0); // Nobody is subscribed, the value is lost.
///
/// source.subscribe(Subscriber::new(move |v| seen_c.lock().unwrap().push(v)));
/// source.push(1);
/// source.push(2);
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
///```
pub struct Source<T> {
    registry: Arc<Mutex<Registry<T>>>,
    delivery: Arc<Mutex<()>>,
}

impl<T> Source<T> {
    /// Creates a new `Source` with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a new `Source` with room for `capacity` observers before the
    /// observer list reallocates.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Source {
            registry: Arc::new(Mutex::new(Registry {
                observers: Vec::with_capacity(capacity),
                next_key: 0,
                delivering: None,
                pending: VecDeque::new(),
            })),
            delivery: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the number of active registrations.
    pub fn len(&self) -> usize {
        lock_unpoisoned(&self.registry).observers.len()
    }

    /// Returns `true` if no observers are registered, `false` otherwise.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Source<T> {
    /// Delivers `value` to every currently registered observer, in the order they
    /// subscribed. Returns after all of them have processed it.
    pub fn push(&self, value: T) {
        let current = thread::current().id();
        {
            let mut registry = lock_unpoisoned(&self.registry);
            if registry.delivering == Some(current) {
                registry.pending.push_back(value);
                trace!(pending = registry.pending.len(), "queued push from callback");
                return;
            }
        }

        let _gate = lock_unpoisoned(&self.delivery);
        let _pass = DeliveryPass::enter(&self.registry, current);

        let mut next = Some(value);
        while let Some(value) = next {
            self.deliver(value);
            next = lock_unpoisoned(&self.registry).pending.pop_front();
        }
    }

    fn deliver(&self, value: T) {
        let snapshot = lock_unpoisoned(&self.registry).observers.clone();
        trace!(observers = snapshot.len(), "pushing value");

        let Some((last, rest)) = snapshot.split_last() else {
            return;
        };
        for registration in rest {
            registration.deliver(value.clone());
        }
        last.deliver(value);
    }
}

impl<T: Send + 'static> Subscribeable for Source<T> {
    type ObsType = T;

    fn subscribe(&self, s: Subscriber<Self::ObsType>) -> Subscription {
        let active = Arc::new(AtomicBool::new(true));

        let key = {
            let mut registry = lock_unpoisoned(&self.registry);
            let key = registry.next_key;
            registry.next_key += 1;
            registry.observers.push(Registration {
                key,
                active: Arc::clone(&active),
                subscriber: Arc::new(Mutex::new(s)),
            });
            trace!(key, observers = registry.observers.len(), "observer subscribed");
            key
        };

        let registry = Arc::downgrade(&self.registry);

        Subscription::new(UnsubscribeLogic::Logic(Box::new(move || {
            active.store(false, Ordering::SeqCst);

            if let Some(registry) = registry.upgrade() {
                let mut registry = lock_unpoisoned(&registry);
                registry.observers.retain(|o| o.key != key);
                trace!(key, observers = registry.observers.len(), "observer disposed");
            } else {
                debug!(key, "disposed after its source was dropped");
            }
        })))
    }
}

impl<T> Default for Source<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        Source {
            registry: Arc::clone(&self.registry),
            delivery: Arc::clone(&self.delivery),
        }
    }
}

impl<T> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("observers", &self.len())
            .finish()
    }
}
