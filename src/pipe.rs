use std::{fmt, sync::Arc};

use crate::{
    source::Source,
    subscription::subscribe::{Subscribeable, Subscriber, Subscription},
};

type SubscribeFn<T> = Arc<dyn Fn(Subscriber<T>) -> Subscription + Send + Sync>;

/// A subscribable stream view.
///
/// A `Pipe` is a wrapper around a subscribe function. It holds no values and no
/// observers of its own: every call to [`subscribe`](Subscribeable::subscribe)
/// independently wires a new observer to the upstream and returns its own
/// [`Subscription`].
///
/// Use [`Pipe::from_source`] for a view that delegates straight to a [`Source`],
/// or [`Pipe::new`] to put a stage between an upstream and the observer. Both
/// present the same calling convention. A stage should keep delivery synchronous
/// and in order, and should only change how many values pass through if that is
/// the point of the stage.
///
/// Cloning a `Pipe` shares its subscribe function.
///
/// # Examples
///
/// A stage that forwards values unchanged while counting them:
///
///```
/// use std::sync::{
///     atomic::{AtomicUsize, Ordering},
///     Arc,
/// };
///
/// use pipe::{Observer, Pipe, Source, Subscribeable, Subscriber, Subscription, Tester, UnsubscribeLogic};
///
/// let source = Source::new();
/// let upstream = Pipe::from_source(&source);
/// let seen = Arc::new(AtomicUsize::new(0));
/// let seen_c = Arc::clone(&seen);
///
/// let counted = Pipe::new(move |mut downstream: Subscriber<i32>| {
///     let seen = Arc::clone(&seen_c);
///     let inner = upstream.subscribe(Subscriber::new(move |v| {
///         seen.fetch_add(1, Ordering::SeqCst);
///         downstream.on_value(v);
///     }));
///     Subscription::new(UnsubscribeLogic::Wrapped(Box::new(inner)))
/// });
///
/// let tester = Tester::test(&counted);
/// source.push(7);
/// source.push(8);
///
/// tester.assert_values(&[7, 8]);
/// assert_eq!(seen.load(Ordering::SeqCst), 2);
///```
pub struct Pipe<T> {
    subscribe_fn: SubscribeFn<T>,
}

impl<T: 'static> Pipe<T> {
    /// Creates a `Pipe` from its subscribe function.
    ///
    /// `sf` receives each new observer and must return the `Subscription` that
    /// detaches it, usually wrapping the upstream subscription it created.
    pub fn new(sf: impl Fn(Subscriber<T>) -> Subscription + Send + Sync + 'static) -> Self {
        Pipe {
            subscribe_fn: Arc::new(sf),
        }
    }

    /// Creates a `Pipe` whose `subscribe` delegates directly to `source`.
    ///
    /// The pipe refers to the same observer list as `source`; it cannot push.
    pub fn from_source(source: &Source<T>) -> Self
    where
        T: Send,
    {
        let source = source.clone();
        Pipe::new(move |s| source.subscribe(s))
    }
}

impl<T: 'static> Subscribeable for Pipe<T> {
    type ObsType = T;

    fn subscribe(&self, s: Subscriber<Self::ObsType>) -> Subscription {
        (self.subscribe_fn)(s)
    }
}

impl<T: Send + 'static> From<Source<T>> for Pipe<T> {
    fn from(source: Source<T>) -> Self {
        Pipe::new(move |s| source.subscribe(s))
    }
}

impl<T> Clone for Pipe<T> {
    fn clone(&self) -> Self {
        Pipe {
            subscribe_fn: Arc::clone(&self.subscribe_fn),
        }
    }
}

impl<T> fmt::Debug for Pipe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipe").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::subscription::subscribe::Disposable;

    #[test]
    fn from_source_delegates_subscribe() {
        let source = Source::new();
        let pipe = Pipe::from_source(&source);
        let values = Arc::new(Mutex::new(Vec::new()));
        let values_c = Arc::clone(&values);

        let mut subscription = pipe.subscribe(Subscriber::new(move |v| {
            values_c.lock().unwrap().push(v);
        }));
        assert_eq!(source.len(), 1);

        source.push(1);
        subscription.dispose();
        source.push(2);

        assert!(source.is_empty());
        assert_eq!(*values.lock().unwrap(), vec![1]);
    }

    #[test]
    fn subscriptions_through_one_pipe_are_isolated() {
        let source = Source::new();
        let pipe = Pipe::from_source(&source);
        let a = Arc::new(Mutex::new(Vec::new()));
        let b = Arc::new(Mutex::new(Vec::new()));
        let a_c = Arc::clone(&a);
        let b_c = Arc::clone(&b);

        let mut sa = pipe.subscribe(Subscriber::new(move |v| a_c.lock().unwrap().push(v)));
        pipe.clone()
            .subscribe(Subscriber::new(move |v| b_c.lock().unwrap().push(v)));

        source.push("x");
        sa.dispose();
        source.push("y");

        assert_eq!(*a.lock().unwrap(), vec!["x"]);
        assert_eq!(*b.lock().unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn from_owned_source() {
        let source = Source::new();
        let pipe: Pipe<u32> = source.clone().into();
        let values = Arc::new(Mutex::new(Vec::new()));
        let values_c = Arc::clone(&values);

        pipe.subscribe(Subscriber::new(move |v| values_c.lock().unwrap().push(v)));
        source.push(3);

        assert_eq!(*values.lock().unwrap(), vec![3]);
    }
}
