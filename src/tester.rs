use std::{
    fmt::{self, Debug},
    sync::{Arc, Mutex},
};

use tracing::debug;

use crate::{
    errors::AssertionError,
    lock_unpoisoned,
    subscription::subscribe::{Disposable, Subscribeable, Subscriber, Subscription},
};

/// A deterministic recording test subscriber for a stream.
///
/// `Tester` subscribes on construction and records every value delivered
/// afterwards, in order. Delivery is synchronous, so by the time a
/// [`push`](crate::Source::push) returns the value is already recorded and can be
/// asserted on without polling. Values pushed before the tester was created are
/// never seen.
///
/// Recording stops when the tester is [disposed](Tester::dispose) or dropped.
/// Assertions never change what was recorded.
///
/// # Examples
///
///```
/// use pipe::{AssertionError, Pipe, Source, Tester};
///
/// let source = Source::new();
/// let tester = Tester::test(&Pipe::from_source(&source));
///
/// source.push("A");
/// source.push("B");
/// source.push("C");
///
/// assert!(matches!(
///     tester.try_assert_values(&["A", "B"]),
///     Err(AssertionError::CountMismatch { expected_len: 2, actual_len: 3, .. })
/// ));
/// tester.assert_values(&["A", "B", "C"]);
///```
pub struct Tester<T> {
    values: Arc<Mutex<Vec<T>>>,
    subscription: Subscription,
}

impl<T: Send + 'static> Tester<T> {
    /// Subscribes to `stream` immediately and starts with an empty record.
    pub fn test<S>(stream: &S) -> Self
    where
        S: Subscribeable<ObsType = T> + ?Sized,
    {
        let values = Arc::new(Mutex::new(Vec::new()));
        let values_c = Arc::clone(&values);

        let subscription = stream.subscribe(Subscriber::new(move |v| {
            lock_unpoisoned(&values_c).push(v);
        }));

        Tester {
            values,
            subscription,
        }
    }
}

impl<T> Tester<T> {
    /// Returns the number of values recorded so far.
    pub fn value_count(&self) -> usize {
        lock_unpoisoned(&self.values).len()
    }

    /// Stops recording. Values already recorded are kept. Idempotent.
    pub fn dispose(&mut self) {
        self.subscription.dispose();
    }

    /// Returns `true` once the tester no longer records.
    pub fn is_disposed(&self) -> bool {
        self.subscription.is_disposed()
    }
}

impl<T: Clone> Tester<T> {
    /// Returns a copy of the recorded values.
    pub fn values(&self) -> Vec<T> {
        lock_unpoisoned(&self.values).clone()
    }
}

impl<T: PartialEq + Debug> Tester<T> {
    /// Checks that exactly `expected` was recorded, in that order.
    ///
    /// # Errors
    ///
    /// [`AssertionError::CountMismatch`] if the number of recorded values differs,
    /// [`AssertionError::ValueMismatch`] if any recorded value differs from the
    /// expected one at the same position.
    pub fn try_assert_values(&self, expected: &[T]) -> Result<(), AssertionError> {
        let values = lock_unpoisoned(&self.values);
        AssertionError::check_values(expected, &values).map_err(|e| {
            debug!(label = e.as_label(), "{e}");
            e
        })
    }

    /// Checks that nothing was recorded.
    ///
    /// # Errors
    ///
    /// [`AssertionError::NotEmpty`] if at least one value was recorded.
    pub fn try_assert_empty(&self) -> Result<(), AssertionError> {
        let values = lock_unpoisoned(&self.values);
        AssertionError::check_empty(&values).map_err(|e| {
            debug!(label = e.as_label(), "{e}");
            e
        })
    }

    /// Asserts that exactly `expected` was recorded, in that order.
    ///
    /// # Panics
    ///
    /// Panics with the [`AssertionError`] message if the recorded values differ
    /// in count or at any position.
    #[track_caller]
    pub fn assert_values(&self, expected: &[T]) {
        if let Err(e) = self.try_assert_values(expected) {
            panic!("{e}");
        }
    }

    /// Asserts that nothing was recorded.
    ///
    /// # Panics
    ///
    /// Panics with the [`AssertionError`] message if any value was recorded.
    #[track_caller]
    pub fn assert_empty(&self) {
        if let Err(e) = self.try_assert_empty() {
            panic!("{e}");
        }
    }
}

impl<T> Drop for Tester<T> {
    fn drop(&mut self) {
        self.subscription.dispose();
    }
}

impl<T> Debug for Tester<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tester")
            .field("recorded", &self.value_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
