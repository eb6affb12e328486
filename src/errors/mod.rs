//! Error types raised by [`Tester`](crate::Tester) assertions.
mod assertion_error;

pub use assertion_error::AssertionError;
