use std::{fmt, mem};

use crate::observer::Observer;

/// A trait for types that can be subscribed to, allowing consumers to receive
/// values pushed through a stream.
///
/// Both [`Source`] and [`Pipe`] implement it with the same calling convention, so a
/// consumer cannot tell a `Pipe` backed directly by a `Source` from one that sits
/// behind any number of stages.
///
/// [`Source`]: crate::Source
/// [`Pipe`]: crate::Pipe
pub trait Subscribeable {
    /// The type of items delivered by the stream.
    type ObsType;

    /// Registers `s` and returns the [`Subscription`] that detaches exactly this
    /// registration.
    ///
    /// Every call wires a new, independent registration. Subscribing twice delivers
    /// every value twice; there is no de-duplication.
    fn subscribe(&self, s: Subscriber<Self::ObsType>) -> Subscription;
}

/// A trait for one-shot handles that detach an observer from its stream.
pub trait Disposable {
    /// Detaches the registration this handle represents.
    ///
    /// Idempotent: only the first call has an effect. When called on the thread
    /// that pushes (including from inside a callback), no further values reach the
    /// associated observer once it returns, including values of a push that is
    /// still delivering to other observers. A dispose racing a push on another
    /// thread may let the value of that one push through.
    fn dispose(&mut self);

    /// Returns `true` once [`dispose`](Disposable::dispose) has been called.
    fn is_disposed(&self) -> bool;
}

type NextFn<T> = Box<dyn FnMut(T) + Send>;

/// A closure-backed [`Observer`], the unit of registration accepted by
/// [`Subscribeable::subscribe`].
pub struct Subscriber<T> {
    next_fn: NextFn<T>,
}

impl<T> Subscriber<T> {
    /// Creates a new `Subscriber` that calls `next_fn` for every delivered value.
    pub fn new(next_fn: impl FnMut(T) + Send + 'static) -> Self {
        Subscriber {
            next_fn: Box::new(next_fn),
        }
    }

    /// Wraps any `Observer` implementation so it can be registered with a stream.
    pub fn from_observer(mut observer: impl Observer<T> + Send + 'static) -> Self
    where
        T: 'static,
    {
        Subscriber::new(move |v| observer.on_value(v))
    }
}

impl<T> Observer<T> for Subscriber<T> {
    fn on_value(&mut self, value: T) {
        (self.next_fn)(value);
    }
}

impl<T> fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber").finish_non_exhaustive()
    }
}

/// Enumerates the detach strategies a [`Subscription`] can carry.
pub enum UnsubscribeLogic {
    /// Nothing to detach.
    Nil,

    /// The subscription depends on another one, which is disposed along with it.
    /// Used by stages that subscribe to an upstream on behalf of their own observer.
    Wrapped(Box<Subscription>),

    /// Detach logic defined by a function, called at most once.
    Logic(Box<dyn FnOnce() + Send>),
}

impl UnsubscribeLogic {
    fn run(self) {
        match self {
            UnsubscribeLogic::Nil => (),
            UnsubscribeLogic::Logic(fnc) => fnc(),
            UnsubscribeLogic::Wrapped(mut subscription) => subscription.dispose(),
        }
    }
}

/// Represents one observer's registration with a stream.
///
/// Dropping a `Subscription` does not detach the observer; call
/// [`dispose`](Disposable::dispose) for that. Disposing stays safe after the
/// originating [`Source`](crate::Source) has been dropped.
pub struct Subscription {
    unsubscribe_logic: UnsubscribeLogic,
    disposed: bool,
}

impl Subscription {
    /// Creates a new `Subscription` that runs `unsubscribe_logic` on first dispose.
    #[must_use]
    pub fn new(unsubscribe_logic: UnsubscribeLogic) -> Self {
        Subscription {
            unsubscribe_logic,
            disposed: false,
        }
    }

    /// A subscription with nothing to detach.
    #[must_use]
    pub fn empty() -> Self {
        Subscription::new(UnsubscribeLogic::Nil)
    }
}

impl Disposable for Subscription {
    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        // Flag first so detach logic that re-enters this handle sees it closed.
        self.disposed = true;
        mem::replace(&mut self.unsubscribe_logic, UnsubscribeLogic::Nil).run();
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use super::*;

    #[test]
    fn dispose_runs_logic_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_c = Arc::clone(&calls);

        let mut s = Subscription::new(UnsubscribeLogic::Logic(Box::new(move || {
            calls_c.fetch_add(1, Ordering::SeqCst);
        })));

        assert!(!s.is_disposed());
        s.dispose();
        s.dispose();
        s.dispose();

        assert!(s.is_disposed());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn wrapped_subscription_is_disposed_with_outer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_c = Arc::clone(&calls);

        let inner = Subscription::new(UnsubscribeLogic::Logic(Box::new(move || {
            calls_c.fetch_add(1, Ordering::SeqCst);
        })));
        let mut outer = Subscription::new(UnsubscribeLogic::Wrapped(Box::new(inner)));

        outer.dispose();
        outer.dispose();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_subscription_disposes_quietly() {
        let mut s = Subscription::empty();
        s.dispose();
        assert!(s.is_disposed());
    }

    #[test]
    fn observer_wrapped_into_subscriber() {
        struct Collect(Arc<Mutex<Vec<u8>>>);

        impl Observer<u8> for Collect {
            fn on_value(&mut self, value: u8) {
                self.0.lock().unwrap().push(value);
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut s = Subscriber::from_observer(Collect(Arc::clone(&seen)));

        s.on_value(1);
        s.on_value(2);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }
}
