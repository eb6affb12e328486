use std::fmt::Debug;

use thiserror::Error;

/// # Assertion failures reported by [`Tester`](crate::Tester).
///
/// Sequences and values are captured as their `Debug` renderings so the error
/// names what was expected and what was actually recorded.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssertionError {
    /// The number of recorded values differs from the number expected.
    #[error("expected {expected_len} values {expected} but recorded {actual_len} values {actual}")]
    CountMismatch {
        expected_len: usize,
        actual_len: usize,
        /// The expected sequence.
        expected: String,
        /// The recorded sequence.
        actual: String,
    },

    /// Both sequences have the same length but differ at `index`.
    #[error(
        "value at index {index} differs: expected {expected_value} but recorded {actual_value}; \
         expected {expected}, recorded {actual}"
    )]
    ValueMismatch {
        index: usize,
        expected_value: String,
        actual_value: String,
        /// The expected sequence.
        expected: String,
        /// The recorded sequence.
        actual: String,
    },

    /// Values were recorded where none were expected.
    #[error("expected no values but recorded {actual_len} values {actual}")]
    NotEmpty {
        actual_len: usize,
        /// The recorded sequence.
        actual: String,
    },
}

impl AssertionError {
    /// Compares `actual` against `expected` positionally.
    pub(crate) fn check_values<T: PartialEq + Debug>(
        expected: &[T],
        actual: &[T],
    ) -> Result<(), AssertionError> {
        if expected.len() != actual.len() {
            return Err(AssertionError::CountMismatch {
                expected_len: expected.len(),
                actual_len: actual.len(),
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
            });
        }

        match expected.iter().zip(actual).position(|(e, a)| e != a) {
            Some(index) => Err(AssertionError::ValueMismatch {
                index,
                expected_value: format!("{:?}", expected[index]),
                actual_value: format!("{:?}", actual[index]),
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn check_empty<T: Debug>(actual: &[T]) -> Result<(), AssertionError> {
        if actual.is_empty() {
            return Ok(());
        }
        Err(AssertionError::NotEmpty {
            actual_len: actual.len(),
            actual: format!("{actual:?}"),
        })
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            AssertionError::CountMismatch { .. } => "assert_count_mismatch",
            AssertionError::ValueMismatch { .. } => "assert_value_mismatch",
            AssertionError::NotEmpty { .. } => "assert_not_empty",
        }
    }
}
