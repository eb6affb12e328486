//! `pipe` is a minimal synchronous push-stream library with a deterministic test
//! recorder.
//!
//! A [`Source`] is the origin of values; every value pushed into it is delivered,
//! synchronously and in subscription order, to each observer registered at that
//! moment. A [`Pipe`] is a subscribable view over a `Source` (or over another
//! `Pipe` plus a stage) that exposes the same `subscribe` contract regardless of
//! what sits upstream. Every registration yields a [`Subscription`] whose
//! [`dispose`](Disposable::dispose) detaches it.
//!
//! [`Tester`] subscribes to a stream on construction and records every value it
//! receives, so assertions made right after a sequence of pushes are deterministic.
//!
//! # Example
//!
//!```
//! use pipe::{Pipe, Source, Tester};
//!
//! let source = Source::new();
//! let pipe = Pipe::from_source(&source);
//!
//! source.push("lost"); // Nobody listens yet.
//!
//! let tester = Tester::test(&pipe);
//! tester.assert_empty();
//!
//! source.push("A");
//! source.push("B");
//! tester.assert_values(&["A", "B"]);
//!```
//!
//! The [`image_search`] module holds the view-layer contracts of an image search
//! screen that consumes streams of [`Item`](image_search::Item) values.

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod errors;
pub mod image_search;
mod observer;
mod pipe;
mod source;
pub mod subscription;
mod tester;

pub use errors::*;
pub use observer::Observer;
pub use pipe::Pipe;
pub use source::Source;
pub use subscription::subscribe::{
    self, Disposable, Subscribeable, Subscriber, Subscription, UnsubscribeLogic,
};
pub use tester::Tester;

// A panicking observer poisons its lock; the protected data is still consistent.
pub(crate) fn lock_unpoisoned<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
